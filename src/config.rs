use std::env;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_CONFIG_FILE: &str = "correlator.toml";

/// Environment variables recognised as configuration keys.
const ENV_KEYS: &[&str] = &[
    "jira_protocol",
    "jira_api_version",
    "jira_username",
    "jira_password",
    "jira_token",
    "jira_host",
    "jira_project_key",
    "jira_issue_type_id",
    "jira_done_transition_id",
    "jira_link_type",
    "xray_base_url",
    "xray_client_id",
    "xray_client_secret",
    "git_remote",
    "ci_server_url",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_protocol")]
    pub jira_protocol: String,
    #[serde(default = "default_api_version")]
    pub jira_api_version: u8,
    #[serde(default)]
    pub jira_username: Option<String>,
    #[serde(default)]
    pub jira_password: Option<String>,
    #[serde(default)]
    pub jira_token: Option<String>,
    #[serde(default)]
    pub jira_host: Option<String>,
    #[serde(default = "default_project_key")]
    pub jira_project_key: String,
    #[serde(default = "default_issue_type_id")]
    pub jira_issue_type_id: u32,
    #[serde(default = "default_done_transition_id")]
    pub jira_done_transition_id: u32,
    #[serde(default = "default_link_type")]
    pub jira_link_type: String,
    #[serde(default = "default_xray_base_url")]
    pub xray_base_url: String,
    #[serde(default)]
    pub xray_client_id: Option<String>,
    #[serde(default)]
    pub xray_client_secret: Option<String>,
    #[serde(default = "default_git_remote")]
    pub git_remote: String,
    #[serde(default = "default_ci_server_url")]
    pub ci_server_url: String,
    #[serde(skip, default)]
    pub workspace_root: PathBuf,
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_api_version() -> u8 {
    2
}

fn default_project_key() -> String {
    "DEMO".to_string()
}

fn default_issue_type_id() -> u32 {
    10008
}

fn default_done_transition_id() -> u32 {
    31
}

fn default_link_type() -> String {
    "Test".to_string()
}

fn default_xray_base_url() -> String {
    "https://xray.cloud.getxray.app".to_string()
}

fn default_git_remote() -> String {
    "origin".to_string()
}

fn default_ci_server_url() -> String {
    "https://github.com".to_string()
}

impl AppConfig {
    /// Loads configuration from an optional TOML file overlaid with the
    /// process environment.
    ///
    /// An explicitly requested file must exist; the default file is only
    /// read when present.
    pub fn load(config_file: Option<&Path>, workspace_hint: &Path) -> AppResult<Self> {
        let file = match config_file {
            Some(path) if !path.exists() => {
                return Err(AppError::Configuration(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => env::var("CORRELATOR_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| workspace_hint.join(DEFAULT_CONFIG_FILE)),
        };

        Self::from_figment(Self::layered(&file), workspace_hint)
    }

    /// TOML file values overridden by the recognised environment keys.
    fn layered(file: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(file))
            .merge(Env::raw().only(ENV_KEYS))
    }

    pub fn from_figment(figment: Figment, workspace_hint: &Path) -> AppResult<Self> {
        let mut config: AppConfig = figment
            .extract()
            .map_err(|err| AppError::Configuration(format!("invalid configuration: {err}")))?;
        config.workspace_root = workspace_hint.to_path_buf();
        Ok(config)
    }

    /// Base URL of the tracker, e.g. `https://jira.example.com`.
    pub fn jira_base_url(&self) -> Option<String> {
        self.jira_host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(|host| format!("{}://{}", self.jira_protocol, host.trim_end_matches('/')))
    }
}
