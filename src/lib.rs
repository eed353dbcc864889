//! # Cupid Core
//!
//! Core ticket-sorting engine for the Valentine's-Day delivery event.
//!
//! Given a batch of tickets (each with four candidate classrooms) and a
//! `SortRequest`, [`sort`] locks every ticket to one classroom and
//! partitions the survivors across serenading and non-serenading delivery
//! groups. The engine has no dependency on storage, timetable parsing, or
//! any UI implementation — those remain external collaborators.

pub mod domain;
pub mod engine;
pub mod error;
pub mod storage;

pub use domain::{
    Classroom, ClassroomHandle, ClassroomValidity, DeliveryGroup, DeliveryPlan, Diagnostic, ItemType, RawTicket,
    RecipientId, SortRequest, Ticket, TicketHandle, TicketId,
};
pub use engine::sort;
pub use error::{CupidError, Result};
pub use storage::Storage;
