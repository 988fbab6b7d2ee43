//! Core domain entities for the Marketing Generation Core (spec §3).

use serde::{Deserialize, Serialize};

/// One per (user, group). Read by every generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameContext {
    pub game_title: String,
    pub studio_name: Option<String>,
    pub game_summary: Option<String>,
    pub platforms: Vec<String>,
    pub engine_tech: Option<String>,
    pub primary_genre: Option<String>,
    pub subgenre: Option<String>,
    pub key_mechanics: Option<String>,
    pub playtime_length: Option<String>,
    pub art_style: Option<String>,
    pub tone: Option<String>,
    pub intended_audience: Option<String>,
    pub age_range: Option<String>,
    pub player_motivation: Option<String>,
    pub comparable_games: Option<String>,
    pub marketing_objective: Option<String>,
    pub key_events_dates: Option<String>,
    pub call_to_action: Option<String>,
    pub content_restrictions: Option<String>,
    pub competitors_to_avoid: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// `low` if `sample_size < 10`, `medium` if `< 20`, else `high`.
    pub fn from_sample_size(sample_size: i64) -> Self {
        if sample_size < 10 {
            Confidence::Low
        } else if sample_size < 20 {
            Confidence::Medium
        } else {
            Confidence::High
        }
    }
}

/// A single competitor-posting strategy card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyCard {
    pub tactic: String,
    pub confidence: Confidence,
}

/// A 14-day rollup keyed by (user, group, platform). Never stored verbatim —
/// derived fresh from competitor analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorInsights {
    pub has_data: bool,
    pub sample_size: i64,
    pub posts_per_week: f64,
    pub recommended_posts_per_week: u32,
    pub best_day_iso: u32,
    pub best_day_name: String,
    pub avg_likes: f64,
    /// Raw text is never passed verbatim to the LLM — classify before use.
    pub top_hook: Option<String>,
    pub top_hashtags: Vec<String>,
    pub competitor_handles: Vec<String>,
    pub confidence: Confidence,
    pub data_window_days: u32,
    pub strategy_cards: Vec<StrategyCard>,
}

impl CompetitorInsights {
    /// `recommended_posts_per_week = clamp(ceil(posts_per_week), 1, 3)`;
    /// default 2 when `has_data == false`.
    pub fn recommended_from_posts_per_week(has_data: bool, posts_per_week: f64) -> u32 {
        if !has_data {
            return 2;
        }
        (posts_per_week.ceil() as i64).clamp(1, 3) as u32
    }

    pub fn empty(best_day_iso: u32, best_day_name: impl Into<String>) -> Self {
        Self {
            has_data: false,
            sample_size: 0,
            posts_per_week: 0.0,
            recommended_posts_per_week: Self::recommended_from_posts_per_week(false, 0.0),
            best_day_iso,
            best_day_name: best_day_name.into(),
            avg_likes: 0.0,
            top_hook: None,
            top_hashtags: Vec::new(),
            competitor_handles: Vec::new(),
            confidence: Confidence::Low,
            data_window_days: 14,
            strategy_cards: Vec::new(),
        }
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Strategy,
    ScriptWriting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignType {
    Teaser,
    Launch,
    Update,
    Community,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaPolicy {
    None,
    Soft,
    Hard,
}

impl CtaPolicy {
    /// Default policy = `none` if Teaser, `soft` if Community, else `hard`.
    pub fn default_for_campaign(campaign_type: CampaignType) -> Self {
        match campaign_type {
            CampaignType::Teaser => CtaPolicy::None,
            CampaignType::Community => CtaPolicy::Soft,
            CampaignType::Launch | CampaignType::Update => CtaPolicy::Hard,
        }
    }
}

/// Immutable input to the Prompt Builder.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub game_context: GameContext,
    pub insights: CompetitorInsights,
    pub task_type: TaskType,
    pub campaign_type: CampaignType,
    pub platform: String,
    pub cta_policy: CtaPolicy,
    /// Retrieved document chunks for script-writing mode (top 3, truncated).
    pub script_chunks: Vec<super::document::Chunk>,
    /// Free-text ask from the studio, appended as a studio-notes block. Never
    /// overrides the absolute rules in the system prompt.
    pub custom_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_clamps_and_ceils() {
        assert_eq!(
            CompetitorInsights::recommended_from_posts_per_week(true, 0.2),
            1
        );
        assert_eq!(
            CompetitorInsights::recommended_from_posts_per_week(true, 2.0),
            2
        );
        assert_eq!(
            CompetitorInsights::recommended_from_posts_per_week(true, 6.5),
            3
        );
    }

    #[test]
    fn no_data_defaults_to_two() {
        assert_eq!(
            CompetitorInsights::recommended_from_posts_per_week(false, 0.0),
            2
        );
    }

    #[test]
    fn confidence_thresholds() {
        assert_eq!(Confidence::from_sample_size(5), Confidence::Low);
        assert_eq!(Confidence::from_sample_size(15), Confidence::Medium);
        assert_eq!(Confidence::from_sample_size(25), Confidence::High);
    }

    #[test]
    fn cta_policy_defaults() {
        assert_eq!(
            CtaPolicy::default_for_campaign(CampaignType::Teaser),
            CtaPolicy::None
        );
        assert_eq!(
            CtaPolicy::default_for_campaign(CampaignType::Community),
            CtaPolicy::Soft
        );
        assert_eq!(
            CtaPolicy::default_for_campaign(CampaignType::Launch),
            CtaPolicy::Hard
        );
    }
}
