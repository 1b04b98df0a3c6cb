//! In-memory service doubles for workflow tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::branch::BranchRef;
use crate::domain::ticket::{Ticket, TicketDraft, TicketKey};
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, TestManagementService, VersionControlService};

/// A recorded import call.
#[derive(Debug, Clone)]
pub struct RecordedImport {
    pub token: String,
    pub project_key: String,
    pub execution: TicketKey,
    pub report: Vec<u8>,
}

#[derive(Default)]
pub struct MockIssueTracker {
    pub projects: Mutex<HashSet<String>>,
    pub fail_create: Mutex<bool>,
    pub fail_projects: Mutex<bool>,
    /// Tickets for which every per-ticket call fails.
    pub failing_tickets: Mutex<HashSet<String>>,
    pub fail_attachments: Mutex<bool>,
    pub created: Mutex<Vec<TicketDraft>>,
    pub transitions: Mutex<Vec<(TicketKey, u32)>>,
    pub links: Mutex<Vec<(TicketKey, TicketKey)>>,
    pub attachments: Mutex<Vec<(TicketKey, PathBuf)>>,
    pub comments: Mutex<Vec<(TicketKey, String)>>,
}

impl MockIssueTracker {
    pub fn with_projects(keys: &[&str]) -> Self {
        let tracker = Self::default();
        *tracker.projects.lock().unwrap() = keys.iter().map(|k| k.to_string()).collect();
        tracker
    }

    pub fn fail_for(&self, key: &str) {
        self.failing_tickets.lock().unwrap().insert(key.to_string());
    }

    fn check(&self, key: &TicketKey) -> AppResult<()> {
        if self.failing_tickets.lock().unwrap().contains(key.as_str()) {
            return Err(AppError::IssueTracker(format!("{key} rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl IssueTrackerService for MockIssueTracker {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<Ticket> {
        if *self.fail_create.lock().unwrap() {
            return Err(AppError::IssueTracker("create rejected".to_string()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(draft.clone());
        let key = TicketKey(format!("{}-{}", draft.project_key, 100 + created.len()));
        Ok(Ticket {
            url: self.browse_url(&key),
            key,
        })
    }

    async fn transition_ticket(&self, key: &TicketKey, transition_id: u32) -> AppResult<()> {
        self.check(key)?;
        self.transitions
            .lock()
            .unwrap()
            .push((key.clone(), transition_id));
        Ok(())
    }

    async fn link_to_execution(&self, key: &TicketKey, execution: &TicketKey) -> AppResult<()> {
        self.links
            .lock()
            .unwrap()
            .push((key.clone(), execution.clone()));
        self.check(key)
    }

    async fn add_attachment(&self, key: &TicketKey, file: &Path) -> AppResult<String> {
        self.attachments
            .lock()
            .unwrap()
            .push((key.clone(), file.to_path_buf()));
        self.check(key)?;
        if *self.fail_attachments.lock().unwrap() {
            return Err(AppError::IssueTracker("attachment rejected".to_string()));
        }
        Ok(file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    async fn add_comment(&self, key: &TicketKey, body: &str) -> AppResult<()> {
        self.comments
            .lock()
            .unwrap()
            .push((key.clone(), body.to_string()));
        self.check(key)
    }

    async fn list_projects(&self) -> AppResult<HashSet<String>> {
        if *self.fail_projects.lock().unwrap() {
            return Err(AppError::IssueTracker("projects unavailable".to_string()));
        }
        Ok(self.projects.lock().unwrap().clone())
    }

    fn browse_url(&self, key: &TicketKey) -> Option<String> {
        Some(format!("https://jira.test/browse/{key}"))
    }
}

#[derive(Default)]
pub struct MockTestManagement {
    pub fail_auth: Mutex<bool>,
    /// Imports whose body equals one of these payloads fail.
    pub failing_payloads: Mutex<Vec<Vec<u8>>>,
    pub auth_calls: Mutex<usize>,
    pub imports: Mutex<Vec<RecordedImport>>,
}

#[async_trait]
impl TestManagementService for MockTestManagement {
    async fn authenticate(&self) -> AppResult<String> {
        *self.auth_calls.lock().unwrap() += 1;
        if *self.fail_auth.lock().unwrap() {
            return Err(AppError::TestManagement("bad credentials".to_string()));
        }
        Ok("token-123".to_string())
    }

    async fn import_junit(
        &self,
        token: &str,
        project_key: &str,
        execution: &TicketKey,
        report: Vec<u8>,
    ) -> AppResult<()> {
        let failing = self.failing_payloads.lock().unwrap().contains(&report);
        self.imports.lock().unwrap().push(RecordedImport {
            token: token.to_string(),
            project_key: project_key.to_string(),
            execution: execution.clone(),
            report,
        });
        if failing {
            return Err(AppError::TestManagement("import rejected".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockVersionControl {
    pub log: Mutex<String>,
    pub ranges: Mutex<Vec<(BranchRef, BranchRef)>>,
}

impl MockVersionControl {
    pub fn with_log(log: &str) -> Self {
        let vcs = Self::default();
        *vcs.log.lock().unwrap() = log.to_string();
        vcs
    }
}

#[async_trait]
impl VersionControlService for MockVersionControl {
    async fn commit_log(&self, base: &BranchRef, head: &BranchRef) -> AppResult<String> {
        self.ranges
            .lock()
            .unwrap()
            .push((base.clone(), head.clone()));
        Ok(self.log.lock().unwrap().clone())
    }
}

pub struct TestHarness {
    pub context: AppContext,
    pub tracker: Arc<MockIssueTracker>,
    pub xray: Arc<MockTestManagement>,
    pub vcs: Arc<MockVersionControl>,
}

pub fn harness(tracker: MockIssueTracker, vcs: MockVersionControl) -> TestHarness {
    let config = AppConfig::from_figment(figment::Figment::new(), Path::new("."))
        .unwrap_or_else(|err| panic!("default config: {err}"));
    let tracker = Arc::new(tracker);
    let xray = Arc::new(MockTestManagement::default());
    let vcs = Arc::new(vcs);
    let context = AppContext::new(config, vcs.clone(), tracker.clone(), xray.clone());
    TestHarness {
        context,
        tracker,
        xray,
        vcs,
    }
}
