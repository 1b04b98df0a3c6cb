mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::{error, warn};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::execution::{self, BranchArgs, ExecutionArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::jira::JiraClient;
use crate::infra::xray::XrayClient;

#[derive(Parser)]
#[command(
    name = "correlator",
    author,
    version,
    about = "Correlates CI test runs with issue-tracker tickets"
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Tracker(TrackerCommand),
    /// List the JUnit result files in a directory.
    ListReports { dir: PathBuf },
    /// Inspect CLI configuration.
    Config(ConfigArgs),
}

/// Commands that talk to the tracker, test management or git.
#[derive(Subcommand)]
enum TrackerCommand {
    /// Create the execution ticket for a test run and print its key.
    Create(ExecutionArgs),
    /// Import JUnit results into the execution ticket.
    Import {
        dir: PathBuf,
        #[command(flatten)]
        target: ExecutionTarget,
    },
    /// Transition the execution ticket to done.
    Done(ExecutionTarget),
    /// Print the tickets referenced by commits between two branches.
    Related(BranchArgs),
    /// Link tickets to the execution ticket.
    Link {
        #[command(flatten)]
        target: ExecutionTarget,
        #[command(flatten)]
        tickets: TicketList,
    },
    /// Attach the report to tickets and comment with a run summary.
    Annotate {
        #[command(flatten)]
        tickets: TicketList,
        /// Report file attached to every ticket.
        #[arg(long)]
        report: PathBuf,
        #[command(flatten)]
        run: ExecutionArgs,
    },
    /// Run the whole flow: create, import, link, annotate, done.
    Pipeline {
        #[command(flatten)]
        run: ExecutionArgs,
        #[command(flatten)]
        branches: BranchArgs,
        /// Directory holding JUnit result files.
        #[arg(long, default_value = "test-results")]
        results_dir: PathBuf,
        /// Report file attached to related tickets.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ExecutionTarget {
    /// Key of the execution ticket.
    #[arg(long)]
    execution: String,
}

#[derive(Args)]
struct TicketList {
    /// Related ticket key; repeat for several tickets.
    #[arg(long = "ticket", value_delimiter = ',')]
    tickets: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.json);

    if let Err(err) = run(cli).await {
        error!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command, &config),
        Commands::ListReports { dir } => execution::list_reports(&dir),
        Commands::Tracker(command) => {
            let ctx = build_context(config);
            dispatch(&ctx, command).await
        }
    }
}

async fn dispatch(ctx: &AppContext, command: TrackerCommand) -> AppResult<()> {
    match command {
        TrackerCommand::Create(args) => execution::create(ctx, args).await,
        TrackerCommand::Import { dir, target } => {
            execution::import(ctx, &dir, target.execution).await
        }
        TrackerCommand::Done(target) => execution::done(ctx, target.execution).await,
        TrackerCommand::Related(branches) => execution::related(ctx, branches).await,
        TrackerCommand::Link { target, tickets } => {
            execution::link(ctx, target.execution, tickets.tickets).await
        }
        TrackerCommand::Annotate {
            tickets,
            report,
            run,
        } => execution::annotate(ctx, tickets.tickets, &report, run).await,
        TrackerCommand::Pipeline {
            run,
            branches,
            results_dir,
            report,
        } => execution::pipeline(ctx, run, branches, results_dir, report).await,
    }
}

fn build_context(config: AppConfig) -> AppContext {
    if config.jira_base_url().is_none() {
        warn!("Jira host not configured; tracker calls will fail.");
    }
    if config.jira_token.is_none() && config.jira_password.is_none() {
        warn!("Jira credentials not configured; tracker calls will fail.");
    }
    if config.xray_client_id.is_none() || config.xray_client_secret.is_none() {
        warn!("Xray client credentials not configured; result import will fail.");
    }

    let git = Arc::new(GitCli::new(config.workspace_root.clone()));
    let issue_tracker = Arc::new(JiraClient::from_config(&config));
    let test_management = Arc::new(XrayClient::from_config(&config));

    AppContext::new(config, git, issue_tracker, test_management)
}
