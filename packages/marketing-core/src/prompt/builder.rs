//! Deterministic assembly of system + user prompts from a `PromptConfig`
//! (spec §4.4). Pure: no I/O, no clock reads.

use crate::domain::{CampaignType, Chunk, CtaPolicy, PromptConfig, TaskType};

use super::hooks::classify_hook;
use super::schedule::schedule_days;

pub struct BuiltPrompt {
    pub system: String,
    pub user: String,
    pub token_estimate: u32,
}

pub fn build(config: &PromptConfig) -> BuiltPrompt {
    let system = match config.task_type {
        TaskType::Strategy => build_strategy_system(config),
        TaskType::ScriptWriting => build_script_system(config),
    };

    let mut user = String::new();
    user.push_str(&game_context_block(config));
    user.push_str(&competitor_signals_block(config));
    user.push_str(&studio_notes_block(config));

    match config.task_type {
        TaskType::Strategy => user.push_str(&output_template(config)),
        TaskType::ScriptWriting => {
            user.push_str(&script_chunks_block(&config.script_chunks));
            user.push_str("\nWrite a short-form video/post script grounded in the material above.\n");
        }
    }

    let token_estimate = ((system.len() + user.len()) / 4) as u32;

    BuiltPrompt { system, user, token_estimate }
}

fn build_strategy_system(config: &PromptConfig) -> String {
    let mut rules = vec![
        "No URLs of any kind.".to_string(),
        "No image markdown (no \"![\" or \"](http\").".to_string(),
        format!(
            "Do not recommend more than {} posts per week.",
            config.insights.recommended_posts_per_week
        ),
        "Never mention a competitor handle, in any form (#, @, or plain text).".to_string(),
        "Real hashtags may only appear in the final \"Hashtag Pack\" section.".to_string(),
        "No placeholders or bracketed tokens like [TBD] or [content type].".to_string(),
    ];

    if matches!(config.campaign_type, CampaignType::Teaser) || matches!(config.cta_policy, CtaPolicy::None) {
        rules.push("Do not reveal availability, launch dates, or release windows.".to_string());
    }

    match config.cta_policy {
        CtaPolicy::None => rules.push("No sales or conversion language of any kind.".to_string()),
        CtaPolicy::Soft => rules.push("Engagement language only; no hard sales pitch.".to_string()),
        CtaPolicy::Hard => {}
    }

    let mut out = String::from("You are a marketing strategist for an indie game studio. Follow these rules exactly:\n");
    for rule in rules {
        out.push_str("- ");
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

fn build_script_system(config: &PromptConfig) -> String {
    format!(
        "You are a marketing copywriter for an indie game studio, platform: {}. Write grounded in the provided design material; do not invent facts not present in the game context or excerpts.",
        config.platform
    )
}

fn game_context_block(config: &PromptConfig) -> String {
    let ctx = &config.game_context;
    let mut out = String::from("## GAME CONTEXT\n");
    out.push_str(&format!("Title: {}\n", ctx.game_title));
    if let Some(studio) = &ctx.studio_name {
        out.push_str(&format!("Studio: {studio}\n"));
    }
    if let Some(summary) = &ctx.game_summary {
        out.push_str(&format!("Summary: {summary}\n"));
    }
    if !ctx.platforms.is_empty() {
        out.push_str(&format!("Platforms: {}\n", ctx.platforms.join(", ")));
    }
    if let Some(genre) = &ctx.primary_genre {
        out.push_str(&format!("Genre: {genre}\n"));
    }
    if let Some(tone) = &ctx.tone {
        out.push_str(&format!("Tone: {tone}\n"));
    }
    if let Some(audience) = &ctx.intended_audience {
        out.push_str(&format!("Audience: {audience}\n"));
    }
    if let Some(objective) = &ctx.marketing_objective {
        out.push_str(&format!("Marketing objective: {objective}\n"));
    }
    if matches!(config.task_type, TaskType::ScriptWriting) {
        if let Some(mechanics) = &ctx.key_mechanics {
            out.push_str(&format!("Key mechanics: {mechanics}\n"));
        }
        if let Some(art_style) = &ctx.art_style {
            out.push_str(&format!("Art style: {art_style}\n"));
        }
        if let Some(comparable) = &ctx.comparable_games {
            out.push_str(&format!("Comparable games: {comparable}\n"));
        }
    }
    out.push('\n');
    out
}

fn competitor_signals_block(config: &PromptConfig) -> String {
    let insights = &config.insights;
    let mut out = String::from("## COMPETITOR SIGNALS\n");
    out.push_str(&format!("Observed posting cadence: {:.1} posts/week\n", insights.posts_per_week));
    out.push_str(&format!("Recommended posts per week: {}\n", insights.recommended_posts_per_week));
    out.push_str(&format!("Best posting day: {}\n", insights.best_day_name));
    out.push_str(&format!("Confidence: {:?}\n", insights.confidence));
    if let Some(hook) = &insights.top_hook {
        out.push_str(&format!("Top competitor hook pattern: {}\n", classify_hook(hook)));
    }
    if !insights.top_hashtags.is_empty() {
        out.push_str(&format!("Observed hashtags: {}\n", insights.top_hashtags.join(", ")));
    }
    out.push('\n');
    out
}

fn studio_notes_block(config: &PromptConfig) -> String {
    match &config.custom_prompt {
        Some(note) if !note.trim().is_empty() => format!("## STUDIO NOTES\n{}\n\n", note.trim()),
        _ => String::new(),
    }
}

fn script_chunks_block(chunks: &[Chunk]) -> String {
    if chunks.is_empty() {
        return String::new();
    }
    let mut out = String::from("## DESIGN EXCERPTS\n");
    for (i, chunk) in chunks.iter().take(3).enumerate() {
        let truncated = crate::domain::truncate_chars(&chunk.content, 400);
        out.push_str(&format!("[{}] (p.{}) {}\n", i + 1, chunk.page, truncated));
    }
    out.push('\n');
    out
}

fn output_template(config: &PromptConfig) -> String {
    let days = schedule_days(config.insights.best_day_iso, config.insights.recommended_posts_per_week);
    let week1: Vec<String> = days.iter().map(|d| format!("- {d}: <content-type label>")).collect();
    let week2 = week1.clone();

    let mut out = String::from("## OUTPUT TEMPLATE\nRespond using exactly this structure:\n\n");
    out.push_str("## Content Pillars\n- <pillar 1>\n- <pillar 2>\n- <pillar 3>\n\n");
    out.push_str("## Posting Cadence\n");
    out.push_str(&format!("PostsPerWeek: {}\n", config.insights.recommended_posts_per_week));
    out.push_str(&format!("Primary Day: {}\n", config.insights.best_day_name));
    if config.insights.is_low_confidence() {
        out.push_str(&format!(
            "Confidence: low (sample size: {} posts)\n",
            config.insights.sample_size
        ));
    }
    out.push('\n');
    out.push_str("## 2-Week Schedule\nWeek 1:\n");
    out.push_str(&week1.join("\n"));
    out.push_str("\nWeek 2:\n");
    out.push_str(&week2.join("\n"));
    out.push('\n');
    if config.insights.is_low_confidence() {
        out.push_str("\n## A/B Test Plan\nDescribe one test variable to try this cycle.\n");
    }
    out.push_str("\n## Hook Ideas (5 one-liners)\n1. …\n2. …\n3. …\n4. …\n5. …\n\n");
    out.push_str("## Hashtag Pack (1-5 tags, NO competitor tags)\n#tag1 #tag2 …\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompetitorInsights, GameContext};

    fn config() -> PromptConfig {
        PromptConfig {
            game_context: GameContext {
                game_title: "Duck Tactics".to_string(),
                ..Default::default()
            },
            insights: CompetitorInsights::empty(1, "Monday"),
            task_type: TaskType::Strategy,
            campaign_type: CampaignType::Update,
            platform: "instagram".to_string(),
            cta_policy: CtaPolicy::Soft,
            script_chunks: Vec::new(),
            custom_prompt: None,
        }
    }

    #[test]
    fn strategy_system_forbids_competitor_handles_and_urls() {
        let built = build(&config());
        assert!(built.system.contains("No URLs"));
        assert!(built.system.to_lowercase().contains("competitor handle"));
    }

    #[test]
    fn strategy_user_never_emits_raw_hook_text() {
        let mut cfg = config();
        cfg.insights.top_hook = Some("Did you know this hidden mechanic changes everything?".to_string());
        let built = build(&cfg);
        assert!(!built.user.contains("Did you know this hidden mechanic"));
        assert!(built.user.contains("Question-based"));
    }

    #[test]
    fn output_template_prebuilds_schedule_days() {
        let built = build(&config());
        assert!(built.user.contains("Week 1:"));
        assert!(built.user.contains("- Monday:"));
    }

    #[test]
    fn token_estimate_is_length_over_four() {
        let built = build(&config());
        assert_eq!(built.token_estimate, ((built.system.len() + built.user.len()) / 4) as u32);
    }
}
