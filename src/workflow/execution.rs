use tracing::{error, info};

use crate::context::AppContext;
use crate::domain::execution::ExecutionRecord;
use crate::domain::ticket::{Ticket, TicketKey};

/// Creates the execution ticket for a CI run.
///
/// Returns `None` when the tracker rejects the request; the failure is logged.
pub async fn create_execution_ticket(ctx: &AppContext, record: &ExecutionRecord) -> Option<Ticket> {
    let draft = record.ticket_draft(
        &ctx.config.jira_project_key,
        ctx.config.jira_issue_type_id,
        &ctx.config.ci_server_url,
    );

    match ctx.issue_tracker.create_ticket(draft).await {
        Ok(ticket) => {
            info!(
                ticket = %ticket.key,
                repository = %record.repository,
                run = %record.run_number,
                "Created execution ticket"
            );
            Some(ticket)
        }
        Err(err) => {
            error!(
                repository = %record.repository,
                run = %record.run_number,
                error = %err,
                "Failed to create execution ticket"
            );
            None
        }
    }
}

/// Moves the execution ticket to the configured "done" state. Failures are
/// logged and swallowed.
pub async fn mark_execution_done(ctx: &AppContext, execution: &TicketKey) {
    let transition_id = ctx.config.jira_done_transition_id;
    match ctx
        .issue_tracker
        .transition_ticket(execution, transition_id)
        .await
    {
        Ok(()) => info!(ticket = %execution, transition = transition_id, "Execution ticket marked done"),
        Err(err) => error!(
            ticket = %execution,
            transition = transition_id,
            error = %err,
            "Failed to transition execution ticket"
        ),
    }
}
