use async_trait::async_trait;

use crate::domain::ticket::TicketKey;
use crate::error::AppResult;

#[async_trait]
pub trait TestManagementService: Send + Sync {
    /// Exchanges client credentials for a bearer token.
    async fn authenticate(&self) -> AppResult<String>;
    async fn import_junit(
        &self,
        token: &str,
        project_key: &str,
        execution: &TicketKey,
        report: Vec<u8>,
    ) -> AppResult<()>;
}
