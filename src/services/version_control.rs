use async_trait::async_trait;

use crate::domain::branch::BranchRef;
use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// One-line summaries of the non-merge commits on `head` that are not on `base`.
    async fn commit_log(&self, base: &BranchRef, head: &BranchRef) -> AppResult<String>;
}
