use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::domain::ticket::{Ticket, TicketDraft, TicketKey};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    api_version: u8,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    link_type: String,
}

impl JiraClient {
    pub fn new(
        base_url: Option<String>,
        api_version: u8,
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
        link_type: String,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_version,
            username,
            password,
            token,
            link_type,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.jira_base_url(),
            config.jira_api_version,
            config.jira_username.clone(),
            config.jira_password.clone(),
            config.jira_token.clone(),
            config.jira_link_type.clone(),
        )
    }

    fn base_url(&self) -> AppResult<&str> {
        self.base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira host not configured".to_string()))
    }

    fn auth_header(&self) -> AppResult<String> {
        let secret = self.password.as_deref().or(self.token.as_deref());
        match (self.username.as_deref(), secret) {
            (Some(username), Some(secret)) => {
                let credentials = format!("{username}:{secret}");
                let encoded = BASE64_STANDARD.encode(credentials);
                Ok(format!("Basic {encoded}"))
            }
            (None, Some(_)) => match self.token.as_deref() {
                Some(token) => Ok(format!("Bearer {token}")),
                None => Err(AppError::Configuration(
                    "Jira password requires a username".to_string(),
                )),
            },
            _ => Err(AppError::Configuration(
                "Jira credentials not configured".to_string(),
            )),
        }
    }

    fn endpoint(base_url: &str, api_version: u8, path: &str) -> String {
        format!(
            "{}/rest/api/{}/{}",
            base_url.trim_end_matches('/'),
            api_version,
            path.trim_start_matches('/')
        )
    }

    fn browse(base_url: &str, key: &str) -> String {
        format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> AppResult<RequestBuilder> {
        let url = Self::endpoint(self.base_url()?, self.api_version, path);
        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.auth_header()?)
            .header(ACCEPT, "application/json"))
    }

    fn text(&self, text: &str) -> JiraText {
        if self.api_version >= 3 {
            JiraText::Document(JiraDescription::from_markdown(text))
        } else {
            JiraText::Plain(text.to_string())
        }
    }

    async fn send(builder: RequestBuilder, action: &str) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to {action}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status} while trying to {action}: {body}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<Ticket> {
        let project_key = draft.project_key.trim();
        if project_key.is_empty() {
            return Err(AppError::IssueTracker(
                "project key must not be empty".to_string(),
            ));
        }
        if draft.summary.trim().is_empty() {
            return Err(AppError::IssueTracker(
                "ticket summary must not be empty".to_string(),
            ));
        }

        let request_body = JiraCreateIssueRequest {
            fields: JiraCreateIssueFields {
                project: JiraProjectRef {
                    key: project_key.to_string(),
                },
                summary: draft.summary.trim().to_string(),
                description: self.text(draft.description.trim()),
                issuetype: JiraIssueType {
                    id: draft.issue_type_id.to_string(),
                },
            },
        };

        let builder = self
            .request(reqwest::Method::POST, "issue")?
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body);
        let response = Self::send(builder, "create issue").await?;

        let payload: JiraCreateIssueResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        let url = Self::browse(self.base_url()?, &payload.key);
        Ok(Ticket {
            key: TicketKey(payload.key),
            url: Some(url),
        })
    }

    async fn transition_ticket(&self, key: &TicketKey, transition_id: u32) -> AppResult<()> {
        let body = JiraTransitionRequest {
            transition: JiraTransition {
                id: transition_id.to_string(),
            },
        };
        let builder = self
            .request(reqwest::Method::POST, &format!("issue/{key}/transitions"))?
            .json(&body);
        Self::send(builder, "transition issue").await?;
        Ok(())
    }

    async fn link_to_execution(&self, key: &TicketKey, execution: &TicketKey) -> AppResult<()> {
        let body = JiraIssueLinkUpdate::inward(&self.link_type, execution.as_str());
        let builder = self
            .request(reqwest::Method::PUT, &format!("issue/{key}"))?
            .json(&body);
        Self::send(builder, "link issue").await?;
        Ok(())
    }

    async fn add_attachment(&self, key: &TicketKey, file: &Path) -> AppResult<String> {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AppError::IssueTracker(format!("not a file path: {}", file.display()))
            })?;
        let contents = tokio::fs::read(file).await?;

        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name.clone()));
        let builder = self
            .request(reqwest::Method::POST, &format!("issue/{key}/attachments"))?
            .header(ATLASSIAN_TOKEN_HEADER, "no-check")
            .multipart(form);
        let response = Self::send(builder, "attach file").await?;

        let attached: Vec<JiraAttachment> = response.json().await.unwrap_or_default();
        Ok(attached
            .into_iter()
            .next()
            .map(|attachment| attachment.filename)
            .unwrap_or(file_name))
    }

    async fn add_comment(&self, key: &TicketKey, body: &str) -> AppResult<()> {
        let request_body = JiraCommentRequest {
            body: self.text(body),
        };
        let builder = self
            .request(reqwest::Method::POST, &format!("issue/{key}/comment"))?
            .json(&request_body);
        Self::send(builder, "add comment").await?;
        Ok(())
    }

    async fn list_projects(&self) -> AppResult<HashSet<String>> {
        let builder = self.request(reqwest::Method::GET, "project")?;
        let response = Self::send(builder, "list projects").await?;
        let projects: Vec<JiraProjectSummary> = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse project list: {err}"))
        })?;
        Ok(projects.into_iter().map(|project| project.key).collect())
    }

    fn browse_url(&self, key: &TicketKey) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base_url| Self::browse(base_url, key.as_str()))
    }
}

#[derive(Serialize)]
struct JiraCreateIssueRequest {
    fields: JiraCreateIssueFields,
}

#[derive(Serialize)]
struct JiraCreateIssueFields {
    project: JiraProjectRef,
    summary: String,
    description: JiraText,
    issuetype: JiraIssueType,
}

#[derive(Serialize)]
struct JiraProjectRef {
    key: String,
}

#[derive(Serialize)]
struct JiraIssueType {
    id: String,
}

#[derive(Serialize)]
struct JiraTransitionRequest {
    transition: JiraTransition,
}

#[derive(Serialize)]
struct JiraTransition {
    id: String,
}

#[derive(Serialize)]
struct JiraIssueLinkUpdate {
    update: JiraIssueLinkOps,
}

#[derive(Serialize)]
struct JiraIssueLinkOps {
    issuelinks: Vec<JiraIssueLinkOp>,
}

#[derive(Serialize)]
struct JiraIssueLinkOp {
    add: JiraIssueLink,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JiraIssueLink {
    #[serde(rename = "type")]
    link_type: JiraLinkType,
    inward_issue: JiraProjectRef,
}

#[derive(Serialize)]
struct JiraLinkType {
    name: String,
}

impl JiraIssueLinkUpdate {
    fn inward(link_type: &str, inward_key: &str) -> Self {
        Self {
            update: JiraIssueLinkOps {
                issuelinks: vec![JiraIssueLinkOp {
                    add: JiraIssueLink {
                        link_type: JiraLinkType {
                            name: link_type.to_string(),
                        },
                        inward_issue: JiraProjectRef {
                            key: inward_key.to_string(),
                        },
                    },
                }],
            },
        }
    }
}

#[derive(Serialize)]
struct JiraCommentRequest {
    body: JiraText,
}

/// Rich-text field: a plain string on API v2, an ADF document on v3.
#[derive(Serialize)]
#[serde(untagged)]
enum JiraText {
    Plain(String),
    Document(JiraDescription),
}

#[derive(Serialize)]
struct JiraDescription {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<JiraDocNode>,
}

impl JiraDescription {
    fn from_markdown(description: &str) -> Self {
        let cleaned = description.replace('\r', "");
        let content = cleaned
            .split("\n\n")
            .map(|section| section.trim())
            .filter(|section| !section.is_empty())
            .map(|section| JiraDocNode::paragraph(section.replace('\n', " ")))
            .collect();

        Self {
            doc_type: "doc",
            version: 1,
            content,
        }
    }
}

#[derive(Serialize)]
struct JiraDocNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<JiraDocText>,
}

impl JiraDocNode {
    fn paragraph(text: String) -> Self {
        Self {
            node_type: "paragraph",
            content: vec![JiraDocText {
                text_type: "text",
                text,
            }],
        }
    }
}

#[derive(Serialize)]
struct JiraDocText {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

#[derive(Deserialize)]
struct JiraCreateIssueResponse {
    key: String,
}

#[derive(Deserialize)]
struct JiraProjectSummary {
    key: String,
}

#[derive(Deserialize)]
struct JiraAttachment {
    filename: String,
}
