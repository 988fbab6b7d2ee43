use axum::extract::State;
use axum::Json;
use marketing_core::domain::{
    artifact, CampaignType, CtaPolicy, GameContext, PromptConfig, Section, TaskType,
};
use marketing_core::error::AppError;
use marketing_core::retriever::Retriever;
use marketing_core::validation::StrategyValidationConfig;
use marketing_core::{derive, orchestrator};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::AuthenticatedUser;
use crate::error_response::ApiError;

#[derive(Debug, Deserialize)]
pub struct StrategyRequest {
    pub group_id: i64,
    pub task_type: String,
    pub campaign_type: Option<String>,
    pub platform: Option<String>,
    pub custom_prompt: Option<String>,
    pub cta_policy: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StrategyResponse {
    pub content: String,
    pub best_posting_day: String,
    pub posts_per_week: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_hook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_hashtags: Option<Vec<String>>,
    pub tokens_used_estimate: u32,
    pub data_source: &'static str,
    pub data_window_days: u32,
}

fn parse_task_type(raw: &str) -> Result<TaskType, AppError> {
    match raw {
        "Strategy" => Ok(TaskType::Strategy),
        "Script Writing" => Ok(TaskType::ScriptWriting),
        other => Err(AppError::InvalidRequest(format!("unknown task_type: {other}"))),
    }
}

fn parse_campaign_type(raw: Option<&str>) -> Result<CampaignType, AppError> {
    match raw {
        None => Ok(CampaignType::Update),
        Some("Teaser") => Ok(CampaignType::Teaser),
        Some("Launch") => Ok(CampaignType::Launch),
        Some("Update") => Ok(CampaignType::Update),
        Some("Community") => Ok(CampaignType::Community),
        Some(other) => Err(AppError::InvalidRequest(format!("unknown campaign_type: {other}"))),
    }
}

fn parse_cta_policy(raw: Option<&str>, campaign_type: CampaignType) -> Result<CtaPolicy, AppError> {
    match raw {
        None => Ok(CtaPolicy::default_for_campaign(campaign_type)),
        Some("none") => Ok(CtaPolicy::None),
        Some("soft") => Ok(CtaPolicy::Soft),
        Some("hard") => Ok(CtaPolicy::Hard),
        Some(other) => Err(AppError::InvalidRequest(format!("unknown cta_policy: {other}"))),
    }
}

/// Builds the validation config that mirrors a `PromptConfig` for the same
/// game context and competitor insights.
fn validation_config_for(
    game_context: &GameContext,
    insights: &marketing_core::domain::CompetitorInsights,
    campaign_type: CampaignType,
    cta_policy: CtaPolicy,
) -> StrategyValidationConfig {
    StrategyValidationConfig {
        policy: cta_policy,
        recommended_posts_per_week: insights.recommended_posts_per_week,
        is_low_confidence: insights.is_low_confidence(),
        campaign_type,
        competitor_handles: insights.competitor_handles.clone(),
        allowed_hashtags: insights.top_hashtags.clone(),
        self_brand_hashtags: derive::self_brand_hashtags(game_context),
        enable_self_brand: true,
        context_derived_hashtags: derive::context_derived_hashtags(game_context),
        enable_context_hashtags: true,
        context_keywords: derive::context_keywords(game_context),
    }
}

pub async fn generate_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<StrategyRequest>,
) -> Result<Json<StrategyResponse>, ApiError> {
    let task_type = parse_task_type(&req.task_type)?;
    let campaign_type = parse_campaign_type(req.campaign_type.as_deref())?;
    let cta_policy = parse_cta_policy(req.cta_policy.as_deref(), campaign_type)?;
    let platform = req.platform.unwrap_or_else(|| "instagram".to_string());

    let game_context = state.store.get_game_context(user.user_id, req.group_id).await?;
    let insights = state
        .store
        .get_competitor_insights(user.user_id, req.group_id, &platform)
        .await?;

    let script_chunks = if matches!(task_type, TaskType::ScriptWriting) {
        let retriever = Retriever::new(state.store.as_ref());
        let query = req.custom_prompt.clone().unwrap_or_else(|| game_context.game_title.clone());
        retriever.retrieve(user.user_id, req.group_id, &query, 3).await?
    } else {
        Vec::new()
    };

    let validation_config = validation_config_for(&game_context, &insights, campaign_type, cta_policy);

    let prompt_config = PromptConfig {
        game_context,
        insights: insights.clone(),
        task_type,
        campaign_type,
        platform,
        cta_policy,
        script_chunks,
        custom_prompt: req.custom_prompt,
    };

    let result = orchestrator::generate(&prompt_config, &validation_config, &state.llm).await?;

    let sections = artifact::split_sections(&result.content);
    let top_hook = insights.top_hook.as_ref().map(|h| marketing_core::prompt::classify_hook(h));
    let top_hashtags = extract_hashtag_pack(&sections);

    Ok(Json(StrategyResponse {
        content: result.content,
        best_posting_day: insights.best_day_name,
        posts_per_week: insights.posts_per_week,
        top_hook,
        top_hashtags: if top_hashtags.is_empty() { None } else { Some(top_hashtags) },
        tokens_used_estimate: result.token_estimate,
        data_source: if insights.has_data { "14_day_window" } else { "fallback" },
        data_window_days: insights.data_window_days,
    }))
}

fn extract_hashtag_pack(sections: &[Section]) -> Vec<String> {
    let Some(body) = artifact::section_body(sections, artifact::SECTION_HASHTAG_PACK) else {
        return Vec::new();
    };
    body.split_whitespace()
        .filter(|tok| tok.starts_with('#'))
        .map(|tok| tok.trim_start_matches('#').to_string())
        .collect()
}
