use std::path::Path;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::report::list_report_files;
use crate::domain::ticket::TicketKey;
use crate::error::AppResult;
use crate::workflow::ItemOutcome;

/// Uploads every JUnit file in `dir` to the test-management add-on under the
/// execution ticket.
///
/// Listing errors and authentication failures abort the call. Once
/// authenticated, each file is imported concurrently and independently.
pub async fn import_results(
    ctx: &AppContext,
    dir: &Path,
    execution: &TicketKey,
) -> AppResult<Vec<ItemOutcome>> {
    let files = list_report_files(dir)?;
    if files.is_empty() {
        warn!(dir = %dir.display(), "No report files to import");
        return Ok(Vec::new());
    }
    info!(dir = %dir.display(), count = files.len(), "Found report files");

    let token = match ctx.test_management.authenticate().await {
        Ok(token) => token,
        Err(err) => {
            error!(error = %err, "Test management authentication failed; skipping import");
            return Err(err);
        }
    };

    let project_key = ctx.config.jira_project_key.as_str();
    let imports = files.into_iter().map(|name| {
        let token = token.as_str();
        async move {
            let result = import_file(ctx, token, project_key, execution, &dir.join(&name)).await;
            match &result {
                Ok(()) => info!(file = %name, execution = %execution, "Imported results"),
                Err(err) => error!(file = %name, execution = %execution, error = %err, "Failed to import results"),
            }
            ItemOutcome::new(name, result)
        }
    });

    Ok(join_all(imports).await)
}

async fn import_file(
    ctx: &AppContext,
    token: &str,
    project_key: &str,
    execution: &TicketKey,
    path: &Path,
) -> AppResult<()> {
    let report = tokio::fs::read(path).await?;
    ctx.test_management
        .import_junit(token, project_key, execution, report)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::{MockIssueTracker, MockVersionControl, harness};
    use std::fs;

    fn report_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn imports_each_matching_file_once() {
        let h = harness(MockIssueTracker::default(), MockVersionControl::default());
        let dir = report_dir(&[
            ("unit.xml", "<unit/>"),
            ("e2e.xml", "<e2e/>"),
            ("api.xml", "<api/>"),
            ("notes.txt", "skip"),
        ]);
        let execution = TicketKey::new("DEMO-77");

        let outcomes = import_results(&h.context, dir.path(), &execution)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(ItemOutcome::is_ok));
        let imports = h.xray.imports.lock().unwrap();
        assert_eq!(imports.len(), 3);
        for import in imports.iter() {
            assert_eq!(import.execution, execution);
            assert_eq!(import.project_key, "DEMO");
            assert_eq!(import.token, "token-123");
        }
        let mut bodies: Vec<Vec<u8>> = imports.iter().map(|i| i.report.clone()).collect();
        bodies.sort();
        assert_eq!(
            bodies,
            vec![b"<api/>".to_vec(), b"<e2e/>".to_vec(), b"<unit/>".to_vec()]
        );
        assert_eq!(*h.xray.auth_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn one_failed_import_does_not_stop_the_others() {
        let h = harness(MockIssueTracker::default(), MockVersionControl::default());
        h.xray
            .failing_payloads
            .lock()
            .unwrap()
            .push(b"<broken/>".to_vec());
        let dir = report_dir(&[("good.xml", "<good/>"), ("bad.xml", "<broken/>")]);

        let outcomes = import_results(&h.context, dir.path(), &TicketKey::new("DEMO-1"))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(crate::workflow::count_failures(&outcomes), 1);
        let failed = outcomes.iter().find(|o| !o.is_ok()).unwrap();
        assert_eq!(failed.item, "bad.xml");
        assert_eq!(h.xray.imports.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn authentication_failure_skips_imports() {
        let h = harness(MockIssueTracker::default(), MockVersionControl::default());
        *h.xray.fail_auth.lock().unwrap() = true;
        let dir = report_dir(&[("unit.xml", "<unit/>")]);

        let result = import_results(&h.context, dir.path(), &TicketKey::new("DEMO-1")).await;

        assert!(matches!(result, Err(AppError::TestManagement(_))));
        assert!(h.xray.imports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_directory_propagates_io_error() {
        let h = harness(MockIssueTracker::default(), MockVersionControl::default());

        let result = import_results(
            &h.context,
            Path::new("/nonexistent/results"),
            &TicketKey::new("DEMO-1"),
        )
        .await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert_eq!(*h.xray.auth_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_directory_does_not_authenticate() {
        let h = harness(MockIssueTracker::default(), MockVersionControl::default());
        let dir = report_dir(&[("readme.md", "none")]);

        let outcomes = import_results(&h.context, dir.path(), &TicketKey::new("DEMO-1"))
            .await
            .unwrap();

        assert!(outcomes.is_empty());
        assert_eq!(*h.xray.auth_calls.lock().unwrap(), 0);
    }
}
