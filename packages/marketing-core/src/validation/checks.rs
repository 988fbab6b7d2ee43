//! The 14 named checks over a generated strategy artifact (spec §4.5). Each
//! check is a pure function; all are run and all issues reported, never
//! short-circuited.

use once_cell::sync::Lazy;
use regex::Regex;

use super::data::{
    BANNED_CONVERSION_TERMS, BANNED_POST_TERMS, CONTENT_TYPE_ANCHORS, GENERIC_OUTPUT_STOPLIST, HARD_CLAIM_PHRASES,
    HASHTAG_STOPLIST, HYPOTHETICAL_FRAMERS, INTERNAL_META_MARKERS, PLACEHOLDER_MARKERS, SOFT_MARKETING_PHRASES,
    TEASER_BANNED_PHRASES,
};
use crate::domain::artifact::{split_sections, SECTION_HASHTAG_PACK, SECTION_SCHEDULE};
use crate::domain::{CampaignType, CtaPolicy};

static REAL_HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#[a-zA-Z][a-zA-Z0-9_]*").unwrap());
static BRACKETED_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\[\]]{1,80}\]").unwrap());
static HASHTAG_PACK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]{2,29}$").unwrap());

#[derive(Debug, Clone)]
pub struct StrategyValidationConfig {
    pub policy: CtaPolicy,
    pub recommended_posts_per_week: u32,
    pub is_low_confidence: bool,
    pub campaign_type: CampaignType,
    pub competitor_handles: Vec<String>,
    /// Sanitized observed hashtags; the base of the allowed set.
    pub allowed_hashtags: Vec<String>,
    pub self_brand_hashtags: Vec<String>,
    pub enable_self_brand: bool,
    pub context_derived_hashtags: Vec<String>,
    pub enable_context_hashtags: bool,
    pub context_keywords: Vec<String>,
}

impl StrategyValidationConfig {
    fn allowed_set(&self) -> Vec<String> {
        let mut set = self.allowed_hashtags.clone();
        if self.enable_self_brand {
            set.extend(self.self_brand_hashtags.iter().cloned());
        }
        if self.enable_context_hashtags {
            set.extend(self.context_derived_hashtags.iter().cloned());
        }
        set
    }
}

/// Run all 14 checks, in spec order, never short-circuiting.
pub fn validate_strategy(s: &str, config: &StrategyValidationConfig) -> (bool, Vec<String>) {
    let mut issues = Vec::new();

    if let Some(issue) = check_internal_meta(s) {
        issues.push(issue);
    }
    if let Some(issue) = check_placeholder(s) {
        issues.push(issue);
    }
    issues.extend(check_schedule_incomplete(s));
    if let Some(issue) = check_url(s) {
        issues.push(issue);
    }
    if let Some(issue) = check_image_markdown(s) {
        issues.push(issue);
    }
    if let Some(issue) = check_policy(s, config.policy) {
        issues.push(issue);
    }
    if let Some(issue) = check_teaser_language(s, config.campaign_type, config.policy) {
        issues.push(issue);
    }
    if let Some(issue) = check_cadence(s, config.recommended_posts_per_week) {
        issues.push(issue);
    }
    issues.extend(check_competitor_handle(s, &config.competitor_handles));
    if let Some(issue) = check_hashtags_in_schedule(s) {
        issues.push(issue);
    }
    if let Some(issue) = check_hashtags_outside_pack(s) {
        issues.push(issue);
    }
    if let Some(issue) = check_low_confidence(s, config.is_low_confidence) {
        issues.push(issue);
    }
    issues.extend(check_hashtag_pack(s, config));
    issues.extend(check_ungrounded_claim(s));
    if let Some(issue) = check_generic_output(s, &config.context_keywords) {
        issues.push(issue);
    }

    let ok = issues.is_empty();
    (ok, issues)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn check_internal_meta(s: &str) -> Option<String> {
    INTERNAL_META_MARKERS
        .iter()
        .find(|marker| contains_ci(s, marker))
        .map(|marker| format!("INTERNAL_META_VIOLATION: found marker '{marker}'"))
}

fn check_placeholder(s: &str) -> Option<String> {
    if let Some(m) = BRACKETED_TOKEN.find(s) {
        return Some(format!("PLACEHOLDER_VIOLATION: bracketed token '{}'", m.as_str()));
    }
    PLACEHOLDER_MARKERS
        .iter()
        .find(|phrase| contains_ci(s, phrase))
        .map(|phrase| format!("PLACEHOLDER_VIOLATION: phrase '{phrase}'"))
}

fn check_schedule_incomplete(s: &str) -> Vec<String> {
    let sections = split_sections(s);
    let Some(body) = sections
        .iter()
        .find(|sec| sec.heading.starts_with(SECTION_SCHEDULE))
        .map(|sec| sec.body.as_str())
    else {
        return Vec::new();
    };

    let mut issues = Vec::new();
    for line in body.lines() {
        let trimmed = line.trim();
        let Some(rest_with_day) = trimmed.strip_prefix("- ") else {
            continue;
        };
        let Some((_, rest)) = rest_with_day.split_once(':') else {
            issues.push(format!("SCHEDULE_INCOMPLETE_VIOLATION: malformed line '{trimmed}'"));
            continue;
        };
        let rest = rest.trim();
        let has_anchor = CONTENT_TYPE_ANCHORS.iter().any(|anchor| contains_ci(rest, anchor));
        if rest.chars().count() < 12 || rest.contains('[') || rest.contains(']') || !has_anchor {
            issues.push(format!("SCHEDULE_INCOMPLETE_VIOLATION: incomplete line '{trimmed}'"));
        }
    }
    issues
}

fn check_url(s: &str) -> Option<String> {
    let lower = s.to_lowercase();
    if lower.contains("http://") || lower.contains("https://") || lower.contains("www.") {
        return Some("URL_VIOLATION: artifact contains a URL".to_string());
    }
    None
}

fn check_image_markdown(s: &str) -> Option<String> {
    if s.contains("![") || s.contains("](http") {
        return Some("IMAGE_MARKDOWN_VIOLATION: artifact contains image markdown".to_string());
    }
    None
}

fn check_policy(s: &str, policy: CtaPolicy) -> Option<String> {
    if matches!(policy, CtaPolicy::Hard) {
        return None;
    }
    for list in [&*BANNED_CONVERSION_TERMS, &*BANNED_POST_TERMS] {
        if let Some(term) = list.iter().find(|term| contains_ci(s, term)) {
            return Some(format!("POLICY_VIOLATION: banned term '{term}'"));
        }
    }
    None
}

const TEASER_HARD_PHRASES: &[&str] = &[
    "launch now",
    "launching on",
    "launch date",
    "at launch",
    "day one",
    "release day",
];

fn check_teaser_language(s: &str, campaign_type: CampaignType, policy: CtaPolicy) -> Option<String> {
    if !(matches!(campaign_type, CampaignType::Teaser) || matches!(policy, CtaPolicy::None)) {
        return None;
    }
    for phrase in TEASER_HARD_PHRASES {
        if contains_ci(s, phrase) {
            return Some(format!("TEASER_LANGUAGE_VIOLATION: phrase '{phrase}'"));
        }
    }
    TEASER_BANNED_PHRASES
        .iter()
        .find(|phrase| contains_ci(s, phrase))
        .map(|phrase| format!("TEASER_LANGUAGE_VIOLATION: phrase '{phrase}'"))
}

static POSTS_PER_WEEK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)PostsPerWeek:\s*(\d+)").unwrap());
const DAILY_PHRASES: &[&str] = &["post daily", "every day", "7 days a week"];

fn check_cadence(s: &str, recommended: u32) -> Option<String> {
    if let Some(captures) = POSTS_PER_WEEK_LINE.captures(s) {
        if let Ok(n) = captures[1].parse::<u32>() {
            if n > recommended {
                return Some(format!(
                    "CADENCE_VIOLATION: PostsPerWeek {n} exceeds recommended {recommended}"
                ));
            }
        }
    }
    if recommended < 7 {
        if let Some(phrase) = DAILY_PHRASES.iter().find(|phrase| contains_ci(s, phrase)) {
            return Some(format!("CADENCE_VIOLATION: heuristic phrase '{phrase}'"));
        }
    }
    None
}

fn word_boundary_ci_contains(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let pattern = format!(r"(?i)\b{}\b", regex::escape(needle));
    Regex::new(&pattern).map(|re| re.is_match(haystack)).unwrap_or(false)
}

fn check_competitor_handle(s: &str, handles: &[String]) -> Vec<String> {
    const SUFFIXES: &[&str] = &["game", "official", "hq"];
    let mut issues = Vec::new();
    for handle in handles {
        if handle.chars().count() < 3 {
            continue;
        }
        let hashtag_form = format!("#{handle}");
        let at_form = format!("@{handle}");
        let hit = contains_ci(s, &hashtag_form)
            || contains_ci(s, &at_form)
            || word_boundary_ci_contains(s, handle)
            || SUFFIXES.iter().any(|suffix| word_boundary_ci_contains(s, &format!("{handle}{suffix}")));
        if hit {
            issues.push(format!("COMPETITOR_HANDLE_VIOLATION: handle '{handle}'"));
        }
    }
    issues
}

fn check_hashtags_in_schedule(s: &str) -> Option<String> {
    let sections = split_sections(s);
    let body = sections
        .iter()
        .find(|sec| sec.heading.starts_with(SECTION_SCHEDULE))
        .map(|sec| sec.body.as_str())?;
    REAL_HASHTAG
        .find(body)
        .map(|m| format!("HASHTAGS_IN_SCHEDULE_VIOLATION: '{}'", m.as_str()))
}

fn check_hashtags_outside_pack(s: &str) -> Option<String> {
    let sections = split_sections(s);
    for section in &sections {
        if section.heading.starts_with(SECTION_HASHTAG_PACK) {
            continue;
        }
        if let Some(m) = REAL_HASHTAG.find(&section.body) {
            return Some(format!("HASHTAGS_OUTSIDE_PACK_VIOLATION: '{}'", m.as_str()));
        }
    }
    None
}

fn check_low_confidence(s: &str, is_low_confidence: bool) -> Option<String> {
    if !is_low_confidence {
        return None;
    }
    let has_confidence = contains_ci(s, "confidence");
    let has_plan = ["a/b", "test plan", "test variable"].iter().any(|phrase| contains_ci(s, phrase));
    if has_confidence && has_plan {
        None
    } else {
        Some("LOW_CONFIDENCE_VIOLATION: missing confidence/test-plan language".to_string())
    }
}

fn check_hashtag_pack(s: &str, config: &StrategyValidationConfig) -> Vec<String> {
    let sections = split_sections(s);
    let Some(body) = sections
        .iter()
        .find(|sec| sec.heading.starts_with(SECTION_HASHTAG_PACK))
        .map(|sec| sec.body.as_str())
    else {
        return Vec::new();
    };

    let allowed = config.allowed_set();
    let mut issues = Vec::new();

    for raw_tag in body.split_whitespace().filter(|t| t.starts_with('#')) {
        let tag = raw_tag.trim_start_matches('#').to_lowercase();
        if !HASHTAG_PACK_TAG.is_match(&tag) {
            issues.push(format!("HASHTAG_PACK_MALFORMED_VIOLATION: '{raw_tag}'"));
            continue;
        }
        if HASHTAG_STOPLIST.iter().any(|stop| stop == &tag) {
            issues.push(format!("HASHTAG_PACK_STOPLIST_VIOLATION: '{tag}'"));
        }
        if config
            .competitor_handles
            .iter()
            .any(|handle| !handle.is_empty() && tag.contains(&handle.to_lowercase()))
        {
            issues.push(format!("HASHTAG_PACK_COMPETITOR_VIOLATION: '{tag}'"));
        }
        if !allowed.iter().any(|allowed_tag| allowed_tag.to_lowercase() == tag) {
            issues.push(format!("HASHTAG_PACK_MEMBERSHIP_VIOLATION: '{tag}'"));
        }
    }

    issues
}

fn check_ungrounded_claim(s: &str) -> Vec<String> {
    let mut issues = Vec::new();
    for line in s.lines() {
        let Some(phrase) = HARD_CLAIM_PHRASES.iter().find(|phrase| contains_ci(line, phrase)) else {
            continue;
        };
        let hedged = HYPOTHETICAL_FRAMERS.iter().any(|framer| contains_ci(line, framer));
        let soft_allowed = SOFT_MARKETING_PHRASES.iter().any(|soft| contains_ci(line, soft));
        if !hedged && !soft_allowed {
            issues.push(format!("UNGROUNDED_CLAIM_VIOLATION: '{phrase}'"));
        }
    }
    issues
}

fn check_generic_output(s: &str, context_keywords: &[String]) -> Option<String> {
    let sections = split_sections(s);
    let outside_pack: String = sections
        .iter()
        .filter(|sec| !sec.heading.starts_with(SECTION_HASHTAG_PACK))
        .map(|sec| format!("{} {}", sec.heading, sec.body))
        .collect::<Vec<_>>()
        .join(" ");

    let mut matched = 0usize;
    for keyword in context_keywords {
        let lower = keyword.to_lowercase();
        if GENERIC_OUTPUT_STOPLIST.contains(&lower.as_str()) {
            continue;
        }
        if word_boundary_ci_contains(&outside_pack, keyword) {
            matched += 1;
        }
    }

    if matched >= 3 {
        None
    } else {
        Some(format!("GENERIC_OUTPUT_VIOLATION: only {matched} context keywords found"))
    }
}

/// Re-checks URLs, image markdown, competitor handles, hashtags-outside-pack,
/// pack membership, content-after-pack, and generic-output. Run once more
/// after a normalization pass succeeds validation, since normalization can
/// in principle introduce a narrative tail or leave a leak untouched.
pub fn run_final_assertions(s: &str, config: &StrategyValidationConfig) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(issue) = check_url(s) {
        issues.push(issue);
    }
    if let Some(issue) = check_image_markdown(s) {
        issues.push(issue);
    }
    issues.extend(check_competitor_handle(s, &config.competitor_handles));
    if let Some(issue) = check_hashtags_outside_pack(s) {
        issues.push(issue);
    }
    issues.extend(check_hashtag_pack(s, config));
    if crate::normalize::truncate_after_hashtag_pack(s) != s {
        issues.push("CONTENT_AFTER_PACK_VIOLATION: narrative follows the Hashtag Pack".to_string());
    }
    if let Some(issue) = check_generic_output(s, &config.context_keywords) {
        issues.push(issue);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> StrategyValidationConfig {
        StrategyValidationConfig {
            policy: CtaPolicy::Soft,
            recommended_posts_per_week: 2,
            is_low_confidence: false,
            campaign_type: CampaignType::Update,
            competitor_handles: vec!["stickaround".to_string()],
            allowed_hashtags: vec!["gamedev".to_string(), "indiegame".to_string()],
            self_brand_hashtags: Vec::new(),
            enable_self_brand: false,
            context_derived_hashtags: Vec::new(),
            enable_context_hashtags: false,
            context_keywords: vec!["duck".to_string(), "puzzle".to_string(), "cozy".to_string()],
        }
    }

    #[test]
    fn detects_internal_meta_leak() {
        let s = "REPAIR: fix this please";
        assert!(check_internal_meta(s).is_some());
    }

    #[test]
    fn detects_competitor_handle_in_any_form() {
        let issues = check_competitor_handle("Check out @stickaround for inspiration", &["stickaround".to_string()]);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn hashtag_pack_membership_flags_invented_tag() {
        let s = "## Hashtag Pack (1-5 tags, NO competitor tags)\n#gamedev #indiegame #duckculture\n";
        let issues = check_hashtag_pack(s, &base_config());
        assert!(issues.iter().any(|i| i.starts_with("HASHTAG_PACK_MEMBERSHIP_VIOLATION")));
    }

    #[test]
    fn hashtag_pack_accepts_observed_only() {
        let s = "## Hashtag Pack (1-5 tags, NO competitor tags)\n#gamedev #indiegame\n";
        let issues = check_hashtag_pack(s, &base_config());
        assert!(issues.is_empty());
    }

    #[test]
    fn cadence_violation_when_over_recommended() {
        let s = "## Posting Cadence\nPostsPerWeek: 5\nPrimary Day: Monday\n";
        assert!(check_cadence(s, 2).is_some());
    }

    #[test]
    fn ungrounded_claim_allows_hedged_line() {
        let issues = check_ungrounded_claim("imagine a future where you always win every match");
        assert!(issues.is_empty());
    }

    #[test]
    fn ungrounded_claim_flags_bare_absolute() {
        let issues = check_ungrounded_claim("our strategy means you always win every match");
        assert!(!issues.is_empty());
    }

    #[test]
    fn generic_output_requires_three_keywords() {
        let s = "## Content Pillars\n- duck puzzle fun\n- cozy vibes\n- third pillar\n";
        let issue = check_generic_output(s, &["duck".to_string(), "puzzle".to_string(), "cozy".to_string()]);
        assert!(issue.is_none());
    }
}
