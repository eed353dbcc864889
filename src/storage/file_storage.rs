use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{
    domain::{DeliveryPlan, RawTicket},
    error::{CupidError, Result},
    storage::Storage,
};

/// File-based storage implementation
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const CUPID_DIR: &'static str = ".cupid";
    const TICKETS_DIR: &'static str = "tickets";
    const PLANS_DIR: &'static str = "plans";

    /// Creates a new FileStorage instance rooted at the given project directory
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::CUPID_DIR),
        }
    }

    fn tickets_dir(&self) -> PathBuf {
        self.root_path.join(Self::TICKETS_DIR)
    }

    fn plans_dir(&self) -> PathBuf {
        self.root_path.join(Self::PLANS_DIR)
    }

    fn tickets_file(&self, batch_id: &str) -> PathBuf {
        self.tickets_dir().join(format!("{batch_id}.json"))
    }

    fn plan_file(&self, plan_id: &str) -> PathBuf {
        self.plans_dir().join(format!("{plan_id}.json"))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.tickets_dir()).await?;
        self.ensure_directory_exists(&self.plans_dir()).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Local caches\n*.db\n*.db-*\n").await?;
        }

        Ok(())
    }

    async fn save_tickets(&self, batch_id: &str, tickets: &[RawTicket]) -> Result<()> {
        self.ensure_directory_exists(&self.tickets_dir()).await?;

        let json = serde_json::to_string_pretty(tickets)?;
        fs::write(self.tickets_file(batch_id), json).await?;
        Ok(())
    }

    async fn load_tickets(&self, batch_id: &str) -> Result<Vec<RawTicket>> {
        let file_path = self.tickets_file(batch_id);

        if !file_path.exists() {
            return Err(CupidError::TicketBatchNotFound(batch_id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        let tickets: Vec<RawTicket> = serde_json::from_str(&contents)?;
        Ok(tickets)
    }

    async fn list_ticket_batches(&self) -> Result<Vec<String>> {
        let tickets_dir = self.tickets_dir();

        if !tickets_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&tickets_dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    async fn delete_tickets(&self, batch_id: &str) -> Result<()> {
        let file_path = self.tickets_file(batch_id);

        if !file_path.exists() {
            return Err(CupidError::TicketBatchNotFound(batch_id.to_string()));
        }

        fs::remove_file(file_path).await?;
        Ok(())
    }

    async fn save_plan(&self, plan_id: &str, plan: &DeliveryPlan) -> Result<()> {
        self.ensure_directory_exists(&self.plans_dir()).await?;

        let json = serde_json::to_string_pretty(plan)?;
        fs::write(self.plan_file(plan_id), json).await?;
        Ok(())
    }

    async fn load_plan(&self, plan_id: &str) -> Result<DeliveryPlan> {
        let file_path = self.plan_file(plan_id);

        if !file_path.exists() {
            return Err(CupidError::PlanNotFound(plan_id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        let plan: DeliveryPlan = serde_json::from_str(&contents)?;
        Ok(plan)
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.tickets_dir().exists() && self.plans_dir().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item_type::ItemType;
    use crate::domain::ticket::{RecipientId, TicketId};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_ticket() -> RawTicket {
        RawTicket {
            id: TicketId::new("T1"),
            recipient: RecipientId::new("R1"),
            item_type: ItemType::Rose,
            rooms: ["A101", "B102", "C103", "D104"].map(|s| s.to_string()),
            ss_period: None,
        }
    }

    fn empty_plan() -> DeliveryPlan {
        DeliveryPlan {
            serenading_groups: Vec::new(),
            non_serenading_groups: Vec::new(),
            diagnostics: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn initialization_creates_expected_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.is_initialized().await);
        storage.initialize().await.unwrap();
        assert!(storage.is_initialized().await);
    }

    #[tokio::test]
    async fn tickets_round_trip_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let tickets = vec![sample_ticket()];
        storage.save_tickets("batch-1", &tickets).await.unwrap();

        let loaded = storage.load_tickets("batch-1").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, tickets[0].id);
    }

    #[tokio::test]
    async fn loading_missing_batch_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let err = storage.load_tickets("nope").await.unwrap_err();
        assert!(matches!(err, CupidError::TicketBatchNotFound(_)));
    }

    #[tokio::test]
    async fn list_ticket_batches_returns_sorted_ids() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        storage.save_tickets("b", &[sample_ticket()]).await.unwrap();
        storage.save_tickets("a", &[sample_ticket()]).await.unwrap();

        let ids = storage.list_ticket_batches().await.unwrap();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn plan_round_trips_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        storage.save_plan("plan-1", &empty_plan()).await.unwrap();
        let loaded = storage.load_plan("plan-1").await.unwrap();
        assert!(loaded.serenading_groups.is_empty());
    }

    #[tokio::test]
    async fn delete_tickets_removes_the_batch() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        storage.save_tickets("batch-1", &[sample_ticket()]).await.unwrap();
        storage.delete_tickets("batch-1").await.unwrap();

        assert!(storage.load_tickets("batch-1").await.is_err());
    }
}
