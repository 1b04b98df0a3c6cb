use std::path::{Path, PathBuf};

use clap::Args;

use crate::context::AppContext;
use crate::domain::execution::ExecutionRecord;
use crate::domain::report::list_report_files;
use crate::domain::ticket::TicketKey;
use crate::error::{AppError, AppResult};
use crate::workflow::execution::{create_execution_ticket, mark_execution_done};
use crate::workflow::linking::{annotate_execution, link_results};
use crate::workflow::pipeline::{PipelineArgs, run_pipeline};
use crate::workflow::related::find_related_tickets;
use crate::workflow::results::import_results;
use crate::workflow::{ItemOutcome, count_failures};

/// Test-run metadata, defaulting to the GitHub Actions environment.
#[derive(Args, Debug, Clone)]
pub struct ExecutionArgs {
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,
    #[arg(long, env = "GITHUB_RUN_NUMBER")]
    pub run_number: String,
    #[arg(long, env = "TEST_ENVIRONMENT", default_value = "ci")]
    pub environment: String,
    #[arg(long, env = "GITHUB_ACTOR")]
    pub actor: String,
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: String,
    #[arg(long, env = "GITHUB_REF_NAME")]
    pub branch: String,
    /// Link to the published test report.
    #[arg(long, env = "REPORT_LINK")]
    pub report_link: Option<String>,
}

impl From<ExecutionArgs> for ExecutionRecord {
    fn from(args: ExecutionArgs) -> Self {
        Self {
            repository: args.repository,
            run_number: args.run_number,
            environment: args.environment,
            actor: args.actor,
            run_id: args.run_id,
            branch: args.branch,
            report_link: args.report_link,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct BranchArgs {
    /// Branch the current branch is compared against.
    #[arg(long, env = "GITHUB_BASE_REF", default_value = "main")]
    pub base: String,
    /// Branch whose commits are scanned for ticket keys.
    #[arg(long, env = "GITHUB_HEAD_REF")]
    pub head: String,
    /// Resolve branches through the configured remote.
    #[arg(long)]
    pub ci: bool,
}

pub async fn create(ctx: &AppContext, args: ExecutionArgs) -> AppResult<()> {
    let record = ExecutionRecord::from(args);
    let ticket = create_execution_ticket(ctx, &record)
        .await
        .ok_or_else(|| AppError::IssueTracker("execution ticket was not created".to_string()))?;

    println!("{}", ticket.key);
    if let Some(url) = &ticket.url {
        eprintln!("View ticket: {url}");
    }
    Ok(())
}

pub fn list_reports(dir: &Path) -> AppResult<()> {
    for name in list_report_files(dir)? {
        println!("{name}");
    }
    Ok(())
}

pub async fn import(ctx: &AppContext, dir: &Path, execution: String) -> AppResult<()> {
    let outcomes = import_results(ctx, dir, &TicketKey::new(execution)).await?;
    print_outcomes("imported", &outcomes);
    Ok(())
}

pub async fn done(ctx: &AppContext, execution: String) -> AppResult<()> {
    mark_execution_done(ctx, &TicketKey::new(execution)).await;
    Ok(())
}

pub async fn related(ctx: &AppContext, branches: BranchArgs) -> AppResult<()> {
    let tickets = find_related_tickets(ctx, &branches.base, &branches.head, branches.ci).await?;
    for ticket in tickets {
        println!("{ticket}");
    }
    Ok(())
}

pub async fn link(ctx: &AppContext, execution: String, tickets: Vec<String>) -> AppResult<()> {
    let tickets = to_keys(tickets);
    let outcomes = link_results(ctx, &tickets, &TicketKey::new(execution)).await;
    print_outcomes("linked", &outcomes);
    Ok(())
}

pub async fn annotate(
    ctx: &AppContext,
    tickets: Vec<String>,
    report: &Path,
    args: ExecutionArgs,
) -> AppResult<()> {
    let record = ExecutionRecord::from(args);
    let outcome = annotate_execution(ctx, &to_keys(tickets), report, &record).await;
    print_outcomes("attached", &outcome.attachments);
    print_outcomes("commented", &outcome.comments);
    Ok(())
}

pub async fn pipeline(
    ctx: &AppContext,
    args: ExecutionArgs,
    branches: BranchArgs,
    results_dir: PathBuf,
    report_file: Option<PathBuf>,
) -> AppResult<()> {
    let record = ExecutionRecord::from(args);
    let outcome = run_pipeline(
        ctx,
        &record,
        PipelineArgs {
            results_dir,
            base_branch: branches.base,
            head_branch: branches.head,
            in_ci: branches.ci,
            report_file,
        },
    )
    .await?;

    println!("Execution {} completed.", outcome.execution.key);
    if let Some(url) = &outcome.execution.url {
        println!("View execution: {url}");
    }
    print_outcomes("imported", &outcome.imports);
    print_outcomes("linked", &outcome.links);
    print_outcomes("attached", &outcome.annotations.attachments);
    print_outcomes("commented", &outcome.annotations.comments);
    Ok(())
}

fn to_keys(values: Vec<String>) -> Vec<TicketKey> {
    values
        .into_iter()
        .map(|value| TicketKey::new(value.trim().to_ascii_uppercase()))
        .filter(|key| !key.as_str().is_empty())
        .collect()
}

fn print_outcomes(action: &str, outcomes: &[ItemOutcome]) {
    let failures = count_failures(outcomes);
    println!(
        "{action}: {} ok, {failures} failed",
        outcomes.len() - failures
    );
    for outcome in outcomes {
        if let Err(err) = &outcome.result {
            println!("  {}: {err}", outcome.item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_ticket_arguments() {
        let keys = to_keys(vec![" demo-1 ".to_string(), String::new(), "QA-2".to_string()]);
        assert_eq!(keys, vec![TicketKey::new("DEMO-1"), TicketKey::new("QA-2")]);
    }

    #[test]
    fn converts_args_into_record() {
        let record = ExecutionRecord::from(ExecutionArgs {
            repository: "acme/shop".to_string(),
            run_number: "7".to_string(),
            environment: "qa".to_string(),
            actor: "octocat".to_string(),
            run_id: "42".to_string(),
            branch: "main".to_string(),
            report_link: None,
        });
        assert_eq!(record.repository, "acme/shop");
        assert_eq!(record.run_id, "42");
        assert!(record.report_link.is_none());
    }
}
