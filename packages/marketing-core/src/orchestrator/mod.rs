//! Runs Prompt -> LLM -> Strip -> Validate -> (Normalize | RepairPrompt ->
//! retry) -> FinalAssertions (spec §4.7).

use llm_client::{ChatOptions, Message};

use crate::domain::{PromptConfig, TaskType};
use crate::error::{AppError, Result};
use crate::llm::LlmProvider;
use crate::normalize::{normalize_strategy_hashtags_extended, strip_internal_meta, truncate_after_hashtag_pack};
use crate::prompt;
use crate::validation::{is_only_hashtag_placement_violation, run_final_assertions, validate_strategy, StrategyValidationConfig};

const MAX_ATTEMPTS: u32 = 2;
const MAX_SNIPPETS: usize = 5;
const MAX_SNIPPET_CHARS: usize = 800;

pub struct GenerationResult {
    pub content: String,
    pub token_estimate: u32,
}

pub async fn generate(
    prompt_config: &PromptConfig,
    validation_config: &StrategyValidationConfig,
    llm: &LlmProvider,
) -> Result<GenerationResult> {
    let built = prompt::build(prompt_config);
    let mut current_user = built.user.clone();
    let is_strategy = matches!(prompt_config.task_type, TaskType::Strategy);
    let opts = ChatOptions::new(0.7, 0.9, 1024);
    let history: Vec<Message> = Vec::new();

    let mut last_issues: Vec<String> = Vec::new();

    for attempt in 1..=MAX_ATTEMPTS {
        let response = llm.call(&built.system, &current_user, &history, &opts).await?;
        let clean = strip_internal_meta(&response.content);
        let (ok, issues) = validate_strategy(&clean, validation_config);

        if is_strategy && (ok || is_only_hashtag_placement_violation(&issues)) {
            let normalized = normalize_strategy_hashtags_extended(
                &clean,
                &validation_config.allowed_hashtags,
                &validation_config.self_brand_hashtags,
                validation_config.enable_self_brand,
                &validation_config.context_derived_hashtags,
                validation_config.enable_context_hashtags,
                &validation_config.competitor_handles,
            );
            let normalized = truncate_after_hashtag_pack(&normalized);
            let (ok2, issues2) = validate_strategy(&normalized, validation_config);
            if ok2 {
                let assertion_issues = run_final_assertions(&normalized, validation_config);
                if assertion_issues.is_empty() {
                    return Ok(GenerationResult {
                        content: normalized,
                        token_estimate: built.token_estimate,
                    });
                }
                return Err(AppError::AssertionFailed { issues: assertion_issues });
            }
            last_issues = issues2;
        } else if ok && !is_strategy {
            return Ok(GenerationResult {
                content: clean,
                token_estimate: built.token_estimate,
            });
        } else {
            last_issues = issues;
        }

        if attempt < MAX_ATTEMPTS {
            let snippets = extract_violating_snippets(&response.content, &last_issues, &validation_config.competitor_handles);
            let banned = build_banned_tokens_list(&validation_config.competitor_handles);
            current_user = format!(
                "{}\n\n---\n\n{}",
                built.user,
                build_minimal_repair_prompt(&last_issues, &snippets, &banned)
            );
        }
    }

    Err(AppError::ValidationFailed { issues: last_issues })
}

fn extract_violating_snippets(raw: &str, issues: &[String], handles: &[String]) -> Vec<(usize, String)> {
    let mut terms: Vec<String> = handles.iter().filter(|h| !h.is_empty()).cloned().collect();
    for issue in issues {
        if let Some(start) = issue.find('\'') {
            if let Some(end) = issue[start + 1..].find('\'') {
                terms.push(issue[start + 1..start + 1 + end].to_string());
            }
        }
    }

    let mut snippets = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if snippets.len() >= MAX_SNIPPETS {
            break;
        }
        let lower = line.to_lowercase();
        if terms.iter().any(|term| !term.is_empty() && lower.contains(&term.to_lowercase())) {
            let truncated = crate::domain::truncate_chars(line, MAX_SNIPPET_CHARS);
            snippets.push((idx + 1, truncated));
        }
    }
    snippets
}

fn build_banned_tokens_list(handles: &[String]) -> Vec<String> {
    const SUFFIXES: &[&str] = &["game", "official", "hq"];
    let mut tokens = Vec::new();
    for handle in handles {
        if handle.is_empty() {
            continue;
        }
        tokens.push(handle.clone());
        tokens.push(format!("#{handle}"));
        tokens.push(format!("@{handle}"));
        for suffix in SUFFIXES {
            tokens.push(format!("{handle}{suffix}"));
        }
    }
    tokens.sort();
    tokens.dedup();
    tokens
}

/// Abbreviated problem kinds, up to 5 offending lines with line numbers,
/// FORBIDDEN WORDS/TAGS, and hard rules restated — never the strings
/// "OFFENDING", "VIOLATIONS FOUND", or "REGENERATION REQUIRED".
fn build_minimal_repair_prompt(issues: &[String], snippets: &[(usize, String)], banned: &[String]) -> String {
    let mut kinds: Vec<String> = Vec::new();
    for issue in issues {
        let kind = issue.split(':').next().unwrap_or(issue).trim().to_string();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    let mut out = String::from("The previous response needs correction before it can be used.\n\n");
    out.push_str("Problem categories: ");
    out.push_str(&kinds.join(", "));
    out.push_str("\n\n");

    if !snippets.is_empty() {
        out.push_str("Lines needing revision:\n");
        for (line_no, text) in snippets.iter().take(MAX_SNIPPETS) {
            out.push_str(&format!("{line_no}: {text}\n"));
        }
        out.push('\n');
    }

    out.push_str("FORBIDDEN WORDS/TAGS: ");
    out.push_str(&banned.join(", "));
    out.push_str("\n\n");

    out.push_str("Hard requirements to satisfy this time:\n");
    out.push_str("- No URLs, no image markdown, no competitor names in any form.\n");
    out.push_str("- Hashtags only in the final Hashtag Pack section.\n");
    out.push_str("- No placeholders or bracketed tokens.\n");
    out.push_str("- Respond with the complete corrected artifact only.\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banned_tokens_include_handle_variants() {
        let tokens = build_banned_tokens_list(&["stickaround".to_string()]);
        assert!(tokens.contains(&"stickaround".to_string()));
        assert!(tokens.contains(&"#stickaround".to_string()));
        assert!(tokens.contains(&"@stickaround".to_string()));
        assert!(tokens.contains(&"stickaroundgame".to_string()));
    }

    #[test]
    fn repair_prompt_never_echoes_the_three_banned_meta_strings() {
        let issues = vec!["COMPETITOR_HANDLE_VIOLATION: handle 'stickaround'".to_string()];
        let snippets = vec![(3, "Check out @stickaround".to_string())];
        let banned = build_banned_tokens_list(&["stickaround".to_string()]);
        let prompt = build_minimal_repair_prompt(&issues, &snippets, &banned);
        assert!(!prompt.to_uppercase().contains("OFFENDING"));
        assert!(!prompt.to_uppercase().contains("VIOLATIONS FOUND"));
        assert!(!prompt.to_uppercase().contains("REGENERATION REQUIRED"));
    }

    #[test]
    fn extract_violating_snippets_caps_at_five() {
        let raw = (1..=10).map(|i| format!("line {i} stickaround")).collect::<Vec<_>>().join("\n");
        let issues = vec!["COMPETITOR_HANDLE_VIOLATION: handle 'stickaround'".to_string()];
        let snippets = extract_violating_snippets(&raw, &issues, &["stickaround".to_string()]);
        assert_eq!(snippets.len(), MAX_SNIPPETS);
    }
}
