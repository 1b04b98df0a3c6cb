//! Ticket-key extraction from commit history and verification against the
//! tracker's project list.

use std::collections::HashSet;

use regex_lite::Regex;

use crate::domain::ticket::TicketKey;
use crate::error::{AppError, AppResult};

const CANDIDATE_PATTERN: &str = r"[A-Za-z]+-[0-9]+";
const STRICT_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9]+-[0-9]+$";

pub struct TicketKeyMatcher {
    candidate: Regex,
    strict: Regex,
}

impl TicketKeyMatcher {
    pub fn new() -> AppResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|err| {
                AppError::Configuration(format!("invalid ticket key pattern {pattern}: {err}"))
            })
        };
        Ok(Self {
            candidate: compile(CANDIDATE_PATTERN)?,
            strict: compile(STRICT_PATTERN)?,
        })
    }

    /// Every `PROJECT-NUMBER` substring of `text`, uppercased, deduplicated
    /// in order of first occurrence.
    pub fn extract_candidates(&self, text: &str) -> Vec<TicketKey> {
        let mut seen = HashSet::new();
        self.candidate
            .find_iter(text)
            .map(|m| m.as_str().to_ascii_uppercase())
            .filter(|key| seen.insert(key.clone()))
            .map(TicketKey)
            .collect()
    }

    /// Accepts the candidates only if every one of them is well formed and
    /// belongs to a known project. A single bad candidate rejects the batch.
    pub fn verify_candidates(
        &self,
        candidates: Vec<TicketKey>,
        projects: &HashSet<String>,
    ) -> AppResult<Vec<TicketKey>> {
        for candidate in &candidates {
            let well_formed = self.strict.is_match(candidate.as_str());
            if !well_formed || !projects.contains(&candidate.project()) {
                return Err(AppError::TicketNotFound(candidate.to_string()));
            }
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn keys(values: &[&str]) -> Vec<TicketKey> {
        values.iter().map(|v| TicketKey::new(*v)).collect()
    }

    fn verify(log: &str, known: &[&str]) -> AppResult<Vec<TicketKey>> {
        let matcher = TicketKeyMatcher::new().unwrap();
        matcher.verify_candidates(matcher.extract_candidates(log), &projects(known))
    }

    #[test]
    fn extracts_uppercased_unique_keys_in_order() {
        let matcher = TicketKeyMatcher::new().unwrap();
        let log = "a1b2 feat: ABC-1 and xyz-22\nc3d4 fix abc-1 again, see QA-7\ne5f6 XYZ-22";
        assert_eq!(
            matcher.extract_candidates(log),
            keys(&["ABC-1", "XYZ-22", "QA-7"])
        );
    }

    #[test]
    fn ignores_text_without_keys() {
        let matcher = TicketKeyMatcher::new().unwrap();
        assert!(
            matcher
                .extract_candidates("1a2b3c chore: bump deps\n- 12 items")
                .is_empty()
        );
    }

    #[test]
    fn extracted_keys_only_contain_letters_dash_digits() {
        let matcher = TicketKeyMatcher::new().unwrap();
        let log = "deadbeef merge release-2024 into v1-2_DEMO-9x";
        let candidates = matcher.extract_candidates(log);
        assert_eq!(candidates, keys(&["RELEASE-2024", "DEMO-9"]));
    }

    #[test]
    fn foreign_project_fails_whole_batch() {
        let log = "abc DEMO-12 fix\ndef demo-12 fix\nghi OTHER-5 x";
        let result = verify(log, &["DEMO"]);
        match result {
            Err(AppError::TicketNotFound(key)) => assert_eq!(key, "OTHER-5"),
            other => panic!("expected TicketNotFound, got {other:?}"),
        }
    }

    #[test]
    fn known_project_is_accepted() {
        let result = verify("abc demo-3 fix", &["DEMO"]).unwrap();
        assert_eq!(result, keys(&["DEMO-3"]));
    }

    #[test]
    fn single_letter_project_is_rejected() {
        let result = verify("abc X-1 fix", &["X"]);
        assert!(matches!(result, Err(AppError::TicketNotFound(_))));
    }

    #[test]
    fn empty_log_verifies_to_empty_list() {
        let result = verify("", &["DEMO"]).unwrap();
        assert!(result.is_empty());
    }
}
