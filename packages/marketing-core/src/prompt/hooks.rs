//! Hook classification: turn a competitor's raw hook text into a
//! safety-sanitized pattern label (spec §4.4). The Prompt Builder never
//! emits the raw hook string to the LLM.

use crate::validation::data::HOOK_PATTERNS;

/// Classify `raw` against the fixed pattern list, first hit wins. The
/// fallback "engagement-focused" pattern has no keywords and always
/// matches once reached, so this never returns `None`.
pub fn classify_hook(raw: &str) -> String {
    let trimmed = raw.trim();
    for pattern in HOOK_PATTERNS.iter() {
        if !pattern.keywords.is_empty() {
            if pattern.keywords.iter().any(|kw| trimmed.to_lowercase().contains(&kw.to_lowercase())) {
                return capitalize(&pattern.label);
            }
            continue;
        }
        if let Some(max_len) = pattern.max_len {
            if trimmed.chars().count() <= max_len {
                return capitalize(&pattern.label);
            }
            continue;
        }
        return capitalize(&pattern.label);
    }
    "Engagement-focused".to_string()
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
