use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, TestManagementService, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub test_management: Arc<dyn TestManagementService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
        test_management: Arc<dyn TestManagementService>,
    ) -> Self {
        Self {
            config,
            version_control,
            issue_tracker,
            test_management,
        }
    }
}
