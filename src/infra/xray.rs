use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::ticket::TicketKey;
use crate::error::{AppError, AppResult};
use crate::services::TestManagementService;

pub struct XrayClient {
    http: Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl XrayClient {
    pub fn new(base_url: String, client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.xray_base_url.clone(),
            config.xray_client_id.clone(),
            config.xray_client_secret.clone(),
        )
    }

    fn credentials(&self) -> AppResult<(&str, &str)> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Xray client id not configured".to_string()))?;
        let client_secret = self.client_secret.as_deref().ok_or_else(|| {
            AppError::Configuration("Xray client secret not configured".to_string())
        })?;
        Ok((client_id, client_secret))
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/v2/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send(builder: RequestBuilder, action: &str) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|err| AppError::TestManagement(format!("failed to {action}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::TestManagement(format!(
                "Xray responded with {status} while trying to {action}: {body}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl TestManagementService for XrayClient {
    async fn authenticate(&self) -> AppResult<String> {
        let (client_id, client_secret) = self.credentials()?;
        let builder = self
            .http
            .post(self.endpoint("authenticate"))
            .header(ACCEPT, "application/json")
            .json(&XrayAuthenticateRequest {
                client_id,
                client_secret,
            });
        let response = Self::send(builder, "authenticate").await?;

        let token: String = response.json().await.map_err(|err| {
            AppError::TestManagement(format!("failed to parse Xray token: {err}"))
        })?;
        if token.trim().is_empty() {
            return Err(AppError::TestManagement(
                "Xray returned an empty token".to_string(),
            ));
        }
        Ok(token)
    }

    async fn import_junit(
        &self,
        token: &str,
        project_key: &str,
        execution: &TicketKey,
        report: Vec<u8>,
    ) -> AppResult<()> {
        let builder = self
            .http
            .post(self.endpoint("import/execution/junit"))
            .query(&[("projectKey", project_key), ("testExecKey", execution.as_str())])
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "text/xml")
            .body(report);
        Self::send(builder, "import JUnit results").await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct XrayAuthenticateRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}
