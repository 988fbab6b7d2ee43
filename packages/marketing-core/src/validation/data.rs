//! Fixed lexicons loaded from embedded data files (spec §9: "load them from
//! a data file to allow editing without rebuilds"). Parsed once per process.

use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Deserialize)]
struct StringList {
    #[serde(alias = "terms", alias = "tags", alias = "anchors", alias = "phrases", alias = "markers")]
    items: Vec<String>,
}

fn load(raw: &str) -> Vec<String> {
    toml::from_str::<StringList>(raw)
        .expect("embedded data file must parse")
        .items
}

pub static INTERNAL_META_MARKERS: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/internal_meta_markers.toml")));

pub static PLACEHOLDER_MARKERS: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/placeholder_markers.toml")));

pub static CONTENT_TYPE_ANCHORS: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/content_type_anchors.toml")));

pub static BANNED_CONVERSION_TERMS: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/banned_conversion_terms.toml")));

pub static BANNED_POST_TERMS: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/banned_post_terms.toml")));

pub static TEASER_BANNED_PHRASES: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/teaser_banned_phrases.toml")));

pub static HASHTAG_STOPLIST: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/hashtag_stoplist.toml")));

pub static HARD_CLAIM_PHRASES: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/hard_claim_phrases.toml")));

pub static SOFT_MARKETING_PHRASES: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/soft_marketing_phrases.toml")));

pub static HYPOTHETICAL_FRAMERS: Lazy<Vec<String>> =
    Lazy::new(|| load(include_str!("../../data/hypothetical_framers.toml")));

pub const GENERIC_OUTPUT_STOPLIST: &[&str] = &["game", "games", "gaming", "play", "player", "players", "fun", "social"];

#[derive(Deserialize, Clone)]
pub struct HookPattern {
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub max_len: Option<usize>,
}

#[derive(Deserialize)]
struct HookPatternFile {
    pattern: Vec<HookPattern>,
}

pub static HOOK_PATTERNS: Lazy<Vec<HookPattern>> = Lazy::new(|| {
    toml::from_str::<HookPatternFile>(include_str!("../../data/hook_patterns.toml"))
        .expect("embedded hook pattern file must parse")
        .pattern
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicons_load_and_are_nonempty() {
        assert!(!INTERNAL_META_MARKERS.is_empty());
        assert!(!PLACEHOLDER_MARKERS.is_empty());
        assert!(!CONTENT_TYPE_ANCHORS.is_empty());
        assert!(!BANNED_CONVERSION_TERMS.is_empty());
        assert!(!BANNED_POST_TERMS.is_empty());
        assert!(!TEASER_BANNED_PHRASES.is_empty());
        assert!(!HASHTAG_STOPLIST.is_empty());
        assert!(!HARD_CLAIM_PHRASES.is_empty());
        assert!(!SOFT_MARKETING_PHRASES.is_empty());
        assert!(!HYPOTHETICAL_FRAMERS.is_empty());
    }

    #[test]
    fn hook_patterns_have_fallback_last() {
        let patterns = &*HOOK_PATTERNS;
        let last = patterns.last().unwrap();
        assert_eq!(last.label, "engagement-focused");
        assert!(last.keywords.is_empty());
    }

    #[test]
    fn hashtag_stoplist_excludes_legitimate_indie_tags() {
        assert!(!HASHTAG_STOPLIST.contains(&"gamedev".to_string()));
        assert!(!HASHTAG_STOPLIST.contains(&"indiegame".to_string()));
    }
}
