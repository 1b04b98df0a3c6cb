use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::branch::BranchRef;
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    fn log_args(base: &BranchRef, head: &BranchRef) -> Vec<String> {
        vec![
            "log".to_string(),
            "--pretty=oneline".to_string(),
            "--no-merges".to_string(),
            BranchRef::range(base, head),
        ]
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn commit_log(&self, base: &BranchRef, head: &BranchRef) -> AppResult<String> {
        if base.as_str().is_empty() || head.as_str().is_empty() {
            return Err(AppError::VersionControl(
                "branch name cannot be empty".to_string(),
            ));
        }

        let args = Self::log_args(base, head);
        debug!(args = ?args, root = %self.workspace_root.display(), "Running git");

        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git log exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
