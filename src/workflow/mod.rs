pub mod execution;
pub mod linking;
pub mod pipeline;
pub mod related;
pub mod results;

use crate::error::AppResult;

/// Result of one item in a fan-out over tickets or files.
#[derive(Debug)]
pub struct ItemOutcome {
    pub item: String,
    pub result: AppResult<()>,
}

impl ItemOutcome {
    pub fn new(item: impl Into<String>, result: AppResult<()>) -> Self {
        Self {
            item: item.into(),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn count_failures(outcomes: &[ItemOutcome]) -> usize {
    outcomes.iter().filter(|outcome| !outcome.is_ok()).count()
}
