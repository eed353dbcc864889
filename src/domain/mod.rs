pub mod arena;
pub mod classroom;
pub mod item_type;
pub mod request;
pub mod ticket;

pub use arena::{RawTicket, SortArena};
pub use classroom::{Classroom, ClassroomHandle, ClassroomValidity, CLASSROOM_GEOGRAPHIC_ORDER};
pub use item_type::ItemType;
pub use request::{DeliveryGroup, DeliveryPlan, Diagnostic, SortRequest};
pub use ticket::{RecipientId, Ticket, TicketHandle, TicketId};
