use crate::domain::ticket::TicketDraft;

/// Metadata describing one CI test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub repository: String,
    pub run_number: String,
    pub environment: String,
    pub actor: String,
    pub run_id: String,
    pub branch: String,
    pub report_link: Option<String>,
}

impl ExecutionRecord {
    pub fn run_url(&self, ci_server_url: &str) -> String {
        format!(
            "{}/{}/actions/runs/{}",
            ci_server_url.trim_end_matches('/'),
            self.repository,
            self.run_id
        )
    }

    pub fn ticket_draft(
        &self,
        project_key: &str,
        issue_type_id: u32,
        ci_server_url: &str,
    ) -> TicketDraft {
        TicketDraft {
            project_key: project_key.to_string(),
            issue_type_id,
            summary: format!(
                "Test execution: {} #{} ({})",
                self.repository, self.run_number, self.environment
            ),
            description: format!(
                "Automated test execution for {} on branch {}.\n\n\
                 Triggered by {} in the {} environment.\n\n\
                 Run {}: {}",
                self.repository,
                self.branch,
                self.actor,
                self.environment,
                self.run_id,
                self.run_url(ci_server_url)
            ),
        }
    }

    /// Comment body posted on every ticket touched by this run.
    pub fn summary_comment(&self, ci_server_url: &str) -> String {
        let report = self
            .report_link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
            .unwrap_or("not published");
        format!(
            "Automated tests for {} ran on branch {} in the {} environment (triggered by {}).\n\n\
             CI run: {}\n\n\
             Full report: {}",
            self.repository,
            self.branch,
            self.environment,
            self.actor,
            self.run_url(ci_server_url),
            report
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> ExecutionRecord {
    ExecutionRecord {
        repository: "acme/shop".to_string(),
        run_number: "118".to_string(),
        environment: "staging".to_string(),
        actor: "octocat".to_string(),
        run_id: "9001".to_string(),
        branch: "feature/cart".to_string(),
        report_link: Some("https://reports.example.com/118".to_string()),
    }
}
