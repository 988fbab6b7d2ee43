//! End-to-end scenarios seeded verbatim from the generation pipeline's
//! design brief: prompt -> LLM -> validate -> (normalize | repair) ->
//! final assertions, driven entirely through the public `orchestrator` and
//! `ask` entry points against a scripted `MockClient`.

use llm_client::MockClient;
use marketing_core::domain::{CampaignType, CompetitorInsights, Confidence, CtaPolicy, GameContext, PromptConfig, TaskType};
use marketing_core::llm::LlmProvider;
use marketing_core::orchestrator;
use marketing_core::validation::StrategyValidationConfig;

fn game_context() -> GameContext {
    GameContext {
        game_title: "Duck Tactics".to_string(),
        primary_genre: Some("tactics".to_string()),
        ..Default::default()
    }
}

fn insights(best_day_name: &str, posts_per_week: f64, recommended: u32, handles: &[&str], hashtags: &[&str]) -> CompetitorInsights {
    CompetitorInsights {
        has_data: true,
        sample_size: 20,
        posts_per_week,
        recommended_posts_per_week: recommended,
        best_day_iso: 4,
        best_day_name: best_day_name.to_string(),
        avg_likes: 120.0,
        top_hook: None,
        top_hashtags: hashtags.iter().map(|s| s.to_string()).collect(),
        competitor_handles: handles.iter().map(|s| s.to_string()).collect(),
        confidence: Confidence::High,
        data_window_days: 14,
        strategy_cards: Vec::new(),
    }
}

fn validation_config(insights: &CompetitorInsights, policy: CtaPolicy) -> StrategyValidationConfig {
    StrategyValidationConfig {
        policy,
        recommended_posts_per_week: insights.recommended_posts_per_week,
        is_low_confidence: insights.is_low_confidence(),
        campaign_type: CampaignType::Teaser,
        competitor_handles: insights.competitor_handles.clone(),
        allowed_hashtags: insights.top_hashtags.clone(),
        self_brand_hashtags: Vec::new(),
        enable_self_brand: false,
        context_derived_hashtags: Vec::new(),
        enable_context_hashtags: false,
        context_keywords: vec!["duck".to_string(), "tactics".to_string(), "squad".to_string()],
    }
}

fn prompt_config(insights: CompetitorInsights, campaign_type: CampaignType, cta_policy: CtaPolicy) -> PromptConfig {
    PromptConfig {
        game_context: game_context(),
        insights,
        task_type: TaskType::Strategy,
        campaign_type,
        platform: "Instagram".to_string(),
        cta_policy,
        script_chunks: Vec::new(),
        custom_prompt: None,
    }
}

const WELL_FORMED_ARTIFACT: &str = "\
## Content Pillars
- duck squad tactics spotlight
- behind-the-scenes tactics design
- community reveal prompt

## Posting Cadence
PostsPerWeek: 2
Primary Day: Thursday

## 2-Week Schedule
Week 1:
- Thursday: duck squad spotlight behind-the-scenes
- Monday: tactics reveal dev snippet
Week 2:
- Thursday: duck squad community prompt
- Monday: tactics spotlight mini-game

## Hook Ideas (5 one-liners)
1. Duck squad tactics hook one
2. Duck squad tactics hook two
3. Duck squad tactics hook three
4. Duck squad tactics hook four
5. Duck squad tactics hook five

## Hashtag Pack (1-5 tags, NO competitor tags)
#gamedev #indiegame
";

#[tokio::test]
async fn scenario_1_happy_strategy() {
    let insights = insights("Thursday", 2.0, 2, &["stickaround"], &["gamedev", "indiegame"]);
    let validation_config = validation_config(&insights, CtaPolicy::None);
    let config = prompt_config(insights, CampaignType::Teaser, CtaPolicy::None);
    let llm = LlmProvider::Mock(MockClient::texts(vec![WELL_FORMED_ARTIFACT]));

    let result = orchestrator::generate(&config, &validation_config, &llm).await.expect("should succeed");
    assert!(result.content.contains("#gamedev #indiegame"));
    assert!(result.content.contains("PostsPerWeek: 2"));
}

#[tokio::test]
async fn scenario_2_invented_hashtag_healed() {
    let insights = insights("Thursday", 2.0, 2, &["stickaround"], &["gamedev", "indiegame"]);
    let validation_config = validation_config(&insights, CtaPolicy::None);
    let config = prompt_config(insights, CampaignType::Teaser, CtaPolicy::None);

    let invented = WELL_FORMED_ARTIFACT.replace(
        "#gamedev #indiegame",
        "#gamedev #indiegame #duckculture",
    );
    let llm = LlmProvider::Mock(MockClient::texts(vec![invented.as_str()]));

    let result = orchestrator::generate(&config, &validation_config, &llm).await.expect("normalizer should heal the pack");
    assert!(result.content.contains("#gamedev #indiegame"));
    assert!(!result.content.contains("duckculture"));
}

#[tokio::test]
async fn scenario_3_competitor_leak_blocks_normalization() {
    let insights = insights("Thursday", 2.0, 2, &["stickaround"], &["gamedev", "indiegame"]);
    let validation_config = validation_config(&insights, CtaPolicy::None);
    let config = prompt_config(insights, CampaignType::Teaser, CtaPolicy::None);

    let leaked = WELL_FORMED_ARTIFACT.replacen(
        "3. Duck squad tactics hook three",
        "3. Check out @stickaround for inspiration",
        1,
    ).replace("#gamedev #indiegame", "#gamedev #indiegame #duckculture");

    let llm = LlmProvider::Mock(MockClient::texts(vec![leaked.as_str(), leaked.as_str()]));

    let err = orchestrator::generate(&config, &validation_config, &llm).await.expect_err("competitor leak must not be healed");
    match err {
        marketing_core::AppError::ValidationFailed { issues } => {
            assert!(issues.iter().any(|i| i.starts_with("COMPETITOR_HANDLE_VIOLATION")));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn scenario_4_daily_cadence_rejected() {
    let insights = insights("Thursday", 2.0, 2, &["stickaround"], &["gamedev", "indiegame"]);
    let validation_config = validation_config(&insights, CtaPolicy::None);
    let config = prompt_config(insights, CampaignType::Teaser, CtaPolicy::None);

    let daily = WELL_FORMED_ARTIFACT.replace("PostsPerWeek: 2", "PostsPerWeek: 7");
    let still_over = WELL_FORMED_ARTIFACT.replace("PostsPerWeek: 2", "PostsPerWeek: 5");
    let llm = LlmProvider::Mock(MockClient::texts(vec![daily.as_str(), still_over.as_str()]));

    let err = orchestrator::generate(&config, &validation_config, &llm).await.expect_err("cadence must be rejected");
    match err {
        marketing_core::AppError::ValidationFailed { issues } => {
            assert!(issues.iter().any(|i| i.starts_with("CADENCE_VIOLATION")));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn scenario_5_teaser_availability_leak_repaired() {
    let insights = insights("Thursday", 2.0, 2, &["stickaround"], &["gamedev", "indiegame"]);
    let validation_config = validation_config(&insights, CtaPolicy::None);
    let config = prompt_config(insights, CampaignType::Teaser, CtaPolicy::None);

    let leak = WELL_FORMED_ARTIFACT.replace(
        "1. Duck squad tactics hook one",
        "1. We're about to open its doors to the world",
    );
    let repaired = WELL_FORMED_ARTIFACT.replace(
        "1. Duck squad tactics hook one",
        "1. Kick off the teaser series with a duck squad hook",
    );
    let llm = LlmProvider::Mock(MockClient::texts(vec![leak.as_str(), repaired.as_str()]));

    let result = orchestrator::generate(&config, &validation_config, &llm).await.expect("repair should succeed");
    assert!(result.content.contains("teaser series"));
}
