use thiserror::Error;

pub type Result<T> = std::result::Result<T, CupidError>;

/// Errors the engine and its ambient storage layer can raise.
///
/// Per-ticket problems that the sort can route around (`InvalidTicket`,
/// `InsufficientCapacity` in spec terms) are not part of this enum — they
/// are data, carried as `Diagnostic`s on a successfully-returned
/// `DeliveryPlan`. Only conditions that prevent a `DeliveryPlan` from being
/// produced at all live here.
#[derive(Debug, Error)]
pub enum CupidError {
    #[error("sort request rejected: {0}")]
    InvalidSortRequest(String),

    #[error("invariant violated for ticket {ticket}: {detail}")]
    InvariantViolation { ticket: String, detail: String },

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("ticket batch not found: {0}")]
    TicketBatchNotFound(String),

    #[error("plan not found: {0}")]
    PlanNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
