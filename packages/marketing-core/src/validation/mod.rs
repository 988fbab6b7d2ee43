pub mod checks;
pub mod data;

pub use checks::{run_final_assertions, validate_strategy, StrategyValidationConfig};

/// True iff `issues` is non-empty, every issue is a hashtag-placement kind,
/// and none mentions competitor leakage. The Orchestrator only normalizes
/// (never repairs via LLM) when this holds, so a competitor handle leak can
/// never be healed silently.
pub fn is_only_hashtag_placement_violation(issues: &[String]) -> bool {
    if issues.is_empty() {
        return false;
    }
    const FIXABLE_PREFIXES: &[&str] = &[
        "HASHTAGS_IN_SCHEDULE",
        "HASHTAGS_OUTSIDE_PACK",
        "HASHTAG_PACK_MEMBERSHIP",
        "HASHTAG_PACK_MALFORMED",
        "HASHTAG_PACK_STOPLIST",
        "INVALID_HASHTAG",
    ];
    issues.iter().all(|issue| {
        !issue.contains("COMPETITOR_") && FIXABLE_PREFIXES.iter().any(|prefix| issue.starts_with(prefix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hashtag_issues_is_fixable() {
        let issues = vec!["HASHTAG_PACK_MEMBERSHIP_VIOLATION: 'x'".to_string()];
        assert!(is_only_hashtag_placement_violation(&issues));
    }

    #[test]
    fn competitor_issue_blocks_fast_path() {
        let issues = vec![
            "COMPETITOR_HANDLE_VIOLATION: 'stickaround'".to_string(),
            "HASHTAG_PACK_MEMBERSHIP_VIOLATION: 'x'".to_string(),
        ];
        assert!(!is_only_hashtag_placement_violation(&issues));
    }

    #[test]
    fn other_issue_blocks_fast_path() {
        let issues = vec!["URL_VIOLATION: found".to_string()];
        assert!(!is_only_hashtag_placement_violation(&issues));
    }

    #[test]
    fn empty_issues_is_not_the_fast_path() {
        assert!(!is_only_hashtag_placement_violation(&[]));
    }
}
