//! Deterministic rewrites that cure exactly the fixable class of violations
//! (spec §4.6). Pure functions: no I/O, no clock reads, no global mutable
//! state — callers may run these in a repair loop without side effects.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::artifact::SECTION_HASHTAG_PACK;
use crate::validation::data::{HASHTAG_STOPLIST, INTERNAL_META_MARKERS};

static REAL_HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#[a-zA-Z][a-zA-Z0-9_]*").unwrap());
static HASHTAG_PACK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]{2,29}$").unwrap());
static MULTISPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Truncate `s` at the first case-insensitive occurrence of any internal
/// meta marker, then trim.
pub fn strip_internal_meta(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut cut = None;
    for marker in INTERNAL_META_MARKERS.iter() {
        if let Some(idx) = lower.find(&marker.to_lowercase()) {
            cut = Some(cut.map_or(idx, |c: usize| c.min(idx)));
        }
    }
    match cut {
        Some(idx) => s[..idx].trim_end().to_string(),
        None => s.trim().to_string(),
    }
}

fn line_has_competitor_handle(line: &str, competitors: &[String]) -> bool {
    let lower = line.to_lowercase();
    competitors.iter().any(|handle| {
        if handle.is_empty() {
            return false;
        }
        let handle_lower = handle.to_lowercase();
        lower.contains(&format!("#{handle_lower}"))
            || lower.contains(&format!("@{handle_lower}"))
            || lower.contains(&handle_lower)
    })
}

/// Remove real hashtags from every line outside the Hashtag Pack that has
/// no competitor handle, rebuild the pack from scratch, and replace or
/// append the pack section. Never touches a line with a competitor handle.
#[allow(clippy::too_many_arguments)]
pub fn normalize_strategy_hashtags_extended(
    s: &str,
    observed: &[String],
    self_brand: &[String],
    enable_self_brand: bool,
    context_tags: &[String],
    enable_context_hashtags: bool,
    competitors: &[String],
) -> String {
    let mut in_pack = false;
    let mut rebuilt_lines = Vec::new();

    for line in s.lines() {
        if line.trim_start().starts_with(SECTION_HASHTAG_PACK) {
            in_pack = true;
            continue;
        }
        if in_pack && line.trim_start().starts_with("## ") {
            in_pack = false;
        }
        if in_pack {
            continue;
        }

        if line_has_competitor_handle(line, competitors) {
            rebuilt_lines.push(line.to_string());
            continue;
        }

        let stripped = REAL_HASHTAG.replace_all(line, "");
        let collapsed = MULTISPACE.replace_all(stripped.trim_end(), " ");
        rebuilt_lines.push(collapsed.to_string());
    }

    let pack = build_final_hashtag_pack(observed, self_brand, enable_self_brand, context_tags, enable_context_hashtags, competitors);

    replace_or_append_hashtag_pack(&rebuilt_lines.join("\n"), &pack)
}

/// Iterate observed -> self-brand (if enabled) -> context-derived (if
/// enabled); sanitize, dedupe, cap at 5. Never injects fallback generics.
pub fn build_final_hashtag_pack(
    observed: &[String],
    self_brand: &[String],
    enable_self_brand: bool,
    context_tags: &[String],
    enable_context_hashtags: bool,
    competitors: &[String],
) -> Vec<String> {
    let mut pack = Vec::new();

    for candidate in observed {
        try_add_candidate(&mut pack, candidate, 3, 30, competitors);
    }
    if enable_self_brand {
        for candidate in self_brand {
            try_add_candidate(&mut pack, candidate, 4, 30, competitors);
        }
    }
    if enable_context_hashtags {
        for candidate in context_tags {
            try_add_candidate(&mut pack, candidate, 4, 20, competitors);
        }
    }

    pack.truncate(5);
    pack
}

fn try_add_candidate(pack: &mut Vec<String>, candidate: &str, min_len: usize, max_len: usize, competitors: &[String]) {
    if pack.len() >= 5 {
        return;
    }
    let tag = candidate.trim_start_matches('#').to_lowercase();
    if !HASHTAG_PACK_TAG.is_match(&tag) {
        return;
    }
    let len = tag.chars().count();
    if len < min_len || len > max_len {
        return;
    }
    if HASHTAG_STOPLIST.iter().any(|stop| stop == &tag) {
        return;
    }
    if competitors.iter().any(|handle| !handle.is_empty() && (tag == handle.to_lowercase() || tag.contains(&handle.to_lowercase()))) {
        return;
    }
    if pack.contains(&tag) {
        return;
    }
    pack.push(tag);
}

/// Replace an existing Hashtag Pack section in place, or append a new one.
pub fn replace_or_append_hashtag_pack(s: &str, pack: &[String]) -> String {
    let heading = format!("{SECTION_HASHTAG_PACK} (1-5 tags, NO competitor tags)");
    let content = pack.iter().map(|tag| format!("#{tag}")).collect::<Vec<_>>().join(" ");

    let mut out = s.trim_end().to_string();
    out.push_str("\n\n");
    out.push_str(&heading);
    out.push('\n');
    out.push_str(&content);
    out.push('\n');
    out
}

/// Drop any narrative that follows the last hashtag content line.
pub fn truncate_after_hashtag_pack(s: &str) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let last_hashtag_line = lines.iter().rposition(|line| REAL_HASHTAG.is_match(line));
    match last_hashtag_line {
        Some(idx) => {
            let mut kept: Vec<&str> = lines[..=idx].to_vec();
            while kept.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
                kept.pop();
            }
            let mut out = kept.join("\n");
            out.push('\n');
            out
        }
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_internal_meta_cuts_at_first_marker() {
        let s = "Here is the artifact.\nREPAIR: please fix the schedule\nmore text";
        let out = strip_internal_meta(s);
        assert_eq!(out, "Here is the artifact.");
    }

    #[test]
    fn build_final_hashtag_pack_never_adds_fallback_generics() {
        let observed = vec!["gamedev".to_string(), "indiegame".to_string()];
        let pack = build_final_hashtag_pack(&observed, &[], false, &[], false, &[]);
        assert_eq!(pack, vec!["gamedev".to_string(), "indiegame".to_string()]);
        assert!(!pack.iter().any(|t| t == "gaming"));
    }

    #[test]
    fn build_final_hashtag_pack_excludes_stoplist_and_competitors() {
        let observed = vec!["gaming".to_string(), "stickaround".to_string(), "indiegame".to_string()];
        let competitors = vec!["stickaround".to_string()];
        let pack = build_final_hashtag_pack(&observed, &[], false, &[], false, &competitors);
        assert_eq!(pack, vec!["indiegame".to_string()]);
    }

    #[test]
    fn normalize_preserves_competitor_handle_lines_byte_identical() {
        let s = "Check out @stickaround for inspiration\n\n## Hashtag Pack (1-5 tags, NO competitor tags)\n#gamedev\n";
        let out = normalize_strategy_hashtags_extended(
            s,
            &["gamedev".to_string()],
            &[],
            false,
            &[],
            false,
            &["stickaround".to_string()],
        );
        assert!(out.contains("Check out @stickaround for inspiration"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let s = "Some #invalid hashtag text\n\n## Hashtag Pack (1-5 tags, NO competitor tags)\n#gamedev #indiegame\n";
        let observed = vec!["gamedev".to_string(), "indiegame".to_string()];
        let once = normalize_strategy_hashtags_extended(s, &observed, &[], false, &[], false, &[]);
        let twice = normalize_strategy_hashtags_extended(&once, &observed, &[], false, &[], false, &[]);
        assert_eq!(once, twice);
    }

    #[test]
    fn truncate_after_hashtag_pack_drops_trailing_narrative() {
        let s = "## Hashtag Pack (1-5 tags, NO competitor tags)\n#gamedev #indiegame\nThanks for reading!\n";
        let out = truncate_after_hashtag_pack(s);
        assert!(!out.contains("Thanks for reading"));
        assert!(out.contains("#gamedev"));
    }
}
