use std::path::PathBuf;

use tracing::{error, info};

use crate::context::AppContext;
use crate::domain::execution::ExecutionRecord;
use crate::domain::ticket::{Ticket, TicketKey};
use crate::error::{AppError, AppResult};
use crate::workflow::execution::{create_execution_ticket, mark_execution_done};
use crate::workflow::linking::{AnnotationReport, annotate_execution, link_results};
use crate::workflow::related::find_related_tickets;
use crate::workflow::results::import_results;
use crate::workflow::{ItemOutcome, count_failures};

#[derive(Debug, Clone)]
pub struct PipelineArgs {
    pub results_dir: PathBuf,
    pub base_branch: String,
    pub head_branch: String,
    pub in_ci: bool,
    pub report_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub execution: Ticket,
    pub imports: Vec<ItemOutcome>,
    pub related: Vec<TicketKey>,
    pub links: Vec<ItemOutcome>,
    pub annotations: AnnotationReport,
}

impl PipelineOutcome {
    pub fn failures(&self) -> usize {
        count_failures(&self.imports)
            + count_failures(&self.links)
            + count_failures(&self.annotations.attachments)
            + count_failures(&self.annotations.comments)
    }
}

/// Runs a whole CI report: create the execution ticket, import results,
/// cross-link related tickets and close the execution.
///
/// Only a missing execution ticket or an unverifiable related ticket stops
/// the run; a failed import is recorded as a failed outcome.
pub async fn run_pipeline(
    ctx: &AppContext,
    record: &ExecutionRecord,
    args: PipelineArgs,
) -> AppResult<PipelineOutcome> {
    let execution = create_execution_ticket(ctx, record).await.ok_or_else(|| {
        AppError::IssueTracker("execution ticket was not created".to_string())
    })?;

    let imports = match import_results(ctx, &args.results_dir, &execution.key).await {
        Ok(imports) => imports,
        Err(err) => {
            error!(
                execution = %execution.key,
                dir = %args.results_dir.display(),
                error = %err,
                "Result import failed; continuing without imported results"
            );
            vec![ItemOutcome::new(
                args.results_dir.display().to_string(),
                Err(err),
            )]
        }
    };
    let related =
        find_related_tickets(ctx, &args.base_branch, &args.head_branch, args.in_ci).await?;
    let links = link_results(ctx, &related, &execution.key).await;

    let annotations = match &args.report_file {
        Some(report) => annotate_execution(ctx, &related, report, record).await,
        None => AnnotationReport::default(),
    };

    mark_execution_done(ctx, &execution.key).await;

    let outcome = PipelineOutcome {
        execution,
        imports,
        related,
        links,
        annotations,
    };
    info!(
        execution = %outcome.execution.key,
        imported = outcome.imports.len(),
        related = outcome.related.len(),
        failures = outcome.failures(),
        "Pipeline finished"
    );
    Ok(outcome)
}
