pub mod artifact;
pub mod conversation;
pub mod document;
pub mod game_context;

pub use artifact::{Section, SECTION_AB_TEST, SECTION_CONTENT_PILLARS, SECTION_HASHTAG_PACK, SECTION_HOOK_IDEAS, SECTION_POSTING_CADENCE, SECTION_SCHEDULE};
pub use conversation::{ConversationMemory, ConversationTurn};
pub use document::{truncate_chars, Chunk, IngestJob, NewWorkshopDocument, WorkshopDocument};
pub use game_context::{
    CampaignType, CompetitorInsights, Confidence, CtaPolicy, GameContext, PromptConfig, StrategyCard, TaskType,
};
