use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::ticket::{Ticket, TicketDraft, TicketKey};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<Ticket>;
    async fn transition_ticket(&self, key: &TicketKey, transition_id: u32) -> AppResult<()>;
    /// Links `key` to `execution` so that the execution "tests" `key`.
    async fn link_to_execution(&self, key: &TicketKey, execution: &TicketKey) -> AppResult<()>;
    async fn add_attachment(&self, key: &TicketKey, file: &Path) -> AppResult<String>;
    async fn add_comment(&self, key: &TicketKey, body: &str) -> AppResult<()>;
    async fn list_projects(&self) -> AppResult<HashSet<String>>;
    fn browse_url(&self, key: &TicketKey) -> Option<String>;
}
