pub mod issue_tracker;
pub mod test_management;
pub mod version_control;

pub use issue_tracker::IssueTrackerService;
pub use test_management::TestManagementService;
pub use version_control::VersionControlService;
