use std::fmt;

/// A tracker-assigned identifier such as `DEMO-42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketKey(pub String);

impl TicketKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The project portion of the key with every non-alphabetic character removed.
    pub fn project(&self) -> String {
        let head = match self.0.rfind('-') {
            Some(idx) => &self.0[..idx],
            None => self.0.as_str(),
        };
        head.chars().filter(|c| c.is_ascii_alphabetic()).collect()
    }
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub key: TicketKey,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub project_key: String,
    pub issue_type_id: u32,
    pub summary: String,
    pub description: String,
}
