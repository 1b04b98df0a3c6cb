#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef(pub String);

impl BranchRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves a branch name into a revision git can diff against.
    ///
    /// CI checkouts only carry remote-tracking refs, so the remote name is
    /// prepended when `remote` is given.
    pub fn resolve(name: &str, remote: Option<&str>) -> Self {
        let clean = name.trim().trim_start_matches("refs/heads/");
        match remote.map(str::trim).filter(|r| !r.is_empty()) {
            Some(remote) => {
                let prefix = format!("{remote}/");
                if clean.starts_with(&prefix) {
                    Self(clean.to_string())
                } else {
                    Self(format!("{prefix}{clean}"))
                }
            }
            None => Self(clean.to_string()),
        }
    }

    pub fn range(base: &BranchRef, head: &BranchRef) -> String {
        format!("{}..{}", base.as_str(), head.as_str())
    }
}
