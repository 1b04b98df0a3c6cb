use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand, config: &AppConfig) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            for (field, value) in describe(config) {
                println!("{field}: {value}");
            }
            Ok(())
        }
    }
}

fn describe(cfg: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Jira base URL", display_value(&cfg.jira_base_url())),
        ("Jira API version", cfg.jira_api_version.to_string()),
        ("Jira username", display_value(&cfg.jira_username)),
        ("Jira password", mask_secret(&cfg.jira_password)),
        ("Jira token", mask_secret(&cfg.jira_token)),
        ("Project key", cfg.jira_project_key.clone()),
        ("Issue type id", cfg.jira_issue_type_id.to_string()),
        ("Done transition id", cfg.jira_done_transition_id.to_string()),
        ("Link type", cfg.jira_link_type.clone()),
        ("Xray base URL", cfg.xray_base_url.clone()),
        ("Xray client id", display_value(&cfg.xray_client_id)),
        ("Xray client secret", mask_secret(&cfg.xray_client_secret)),
        ("Git remote", cfg.git_remote.clone()),
        ("CI server URL", cfg.ci_server_url.clone()),
        ("Workspace", cfg.workspace_root.display().to_string()),
    ]
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
