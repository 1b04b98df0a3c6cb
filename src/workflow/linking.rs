use std::path::Path;

use futures::future::join_all;
use tracing::{error, info};

use crate::context::AppContext;
use crate::domain::execution::ExecutionRecord;
use crate::domain::ticket::TicketKey;
use crate::workflow::ItemOutcome;

#[derive(Debug, Default)]
pub struct AnnotationReport {
    pub attachments: Vec<ItemOutcome>,
    pub comments: Vec<ItemOutcome>,
}

/// Links every related ticket to the execution ticket.
pub async fn link_results(
    ctx: &AppContext,
    tickets: &[TicketKey],
    execution: &TicketKey,
) -> Vec<ItemOutcome> {
    if tickets.is_empty() {
        let target = ctx
            .issue_tracker
            .browse_url(execution)
            .unwrap_or_else(|| execution.to_string());
        info!(execution = %execution, "No related tickets to link; see results at {target}");
    }

    let links = tickets.iter().map(|ticket| async move {
        let result = ctx
            .issue_tracker
            .link_to_execution(ticket, execution)
            .await;
        match &result {
            Ok(()) => info!(ticket = %ticket, execution = %execution, "Linked ticket to execution"),
            Err(err) => error!(ticket = %ticket, execution = %execution, error = %err, "Failed to link ticket"),
        }
        ItemOutcome::new(ticket.as_str(), result)
    });

    join_all(links).await
}

/// Attaches the report to each ticket and comments with a run summary.
///
/// The attachment and comment passes run side by side and never short-circuit
/// each other.
pub async fn annotate_execution(
    ctx: &AppContext,
    tickets: &[TicketKey],
    report: &Path,
    record: &ExecutionRecord,
) -> AnnotationReport {
    if tickets.is_empty() {
        return AnnotationReport::default();
    }

    let comment = record.summary_comment(&ctx.config.ci_server_url);
    let comment = comment.as_str();

    let attachments = tickets.iter().map(|ticket| async move {
        let result = ctx.issue_tracker.add_attachment(ticket, report).await;
        let result = match result {
            Ok(file_name) => {
                info!(ticket = %ticket, file = %file_name, "Attached report");
                Ok(())
            }
            Err(err) => {
                error!(ticket = %ticket, file = %report.display(), error = %err, "Failed to attach report");
                Err(err)
            }
        };
        ItemOutcome::new(ticket.as_str(), result)
    });

    let comments = tickets.iter().map(|ticket| async move {
        let result = ctx.issue_tracker.add_comment(ticket, comment).await;
        match &result {
            Ok(()) => info!(ticket = %ticket, "Commented with run summary"),
            Err(err) => error!(ticket = %ticket, error = %err, "Failed to comment on ticket"),
        }
        ItemOutcome::new(ticket.as_str(), result)
    });

    let (attachments, comments) = futures::join!(join_all(attachments), join_all(comments));
    AnnotationReport {
        attachments,
        comments,
    }
}
