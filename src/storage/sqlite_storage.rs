use async_trait::async_trait;

use crate::{
    domain::{DeliveryPlan, RawTicket},
    error::{CupidError, Result},
    storage::Storage,
};

/// SQLite-based storage backend for ticket batches and delivery plans
pub struct SqliteStorage {
    _connection: (), // Placeholder for future implementation
}

impl SqliteStorage {
    /// Creates a new SQLite storage instance
    pub fn new(_database_path: &str) -> Result<Self> {
        // TODO: implement SQLite storage
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }

    async fn save_tickets(&self, _batch_id: &str, _tickets: &[RawTicket]) -> Result<()> {
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }

    async fn load_tickets(&self, _batch_id: &str) -> Result<Vec<RawTicket>> {
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }

    async fn list_ticket_batches(&self) -> Result<Vec<String>> {
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }

    async fn delete_tickets(&self, _batch_id: &str) -> Result<()> {
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }

    async fn save_plan(&self, _plan_id: &str, _plan: &DeliveryPlan) -> Result<()> {
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }

    async fn load_plan(&self, _plan_id: &str) -> Result<DeliveryPlan> {
        Err(CupidError::StorageError("SQLite storage not yet implemented".to_string()))
    }

    async fn is_initialized(&self) -> bool {
        false
    }
}
