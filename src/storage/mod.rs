use async_trait::async_trait;

use crate::{
    domain::{DeliveryPlan, RawTicket},
    error::Result,
};

pub mod file_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

/// Persistence for ticket batches and the plans produced from them.
///
/// The sort algorithm itself never touches this trait (§5) — it is a pure
/// function over in-memory values. This exists so the surrounding admin
/// system has somewhere concrete to read tickets from and write a
/// `DeliveryPlan` to around a call to [`crate::sort`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Saves a named batch of tickets
    async fn save_tickets(&self, batch_id: &str, tickets: &[RawTicket]) -> Result<()>;

    /// Loads a named batch of tickets
    async fn load_tickets(&self, batch_id: &str) -> Result<Vec<RawTicket>>;

    /// Lists all saved ticket batch ids
    async fn list_ticket_batches(&self) -> Result<Vec<String>>;

    /// Deletes a ticket batch
    async fn delete_tickets(&self, batch_id: &str) -> Result<()>;

    /// Saves a delivery plan under the given id
    async fn save_plan(&self, plan_id: &str, plan: &DeliveryPlan) -> Result<()>;

    /// Loads a delivery plan by id
    async fn load_plan(&self, plan_id: &str) -> Result<DeliveryPlan>;

    /// Checks whether the storage backend has been initialized
    async fn is_initialized(&self) -> bool;
}
