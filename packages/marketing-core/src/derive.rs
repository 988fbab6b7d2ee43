//! Turns a studio's `GameContext` into the validator/normalizer inputs that
//! are not themselves part of the spec's algorithms: self-brand hashtag
//! candidates, context-derived hashtag candidates, and the keyword set the
//! generic-output check counts against.

use std::collections::HashSet;

use crate::domain::GameContext;

const STOPWORDS: &[&str] = &["game", "games", "gaming", "with", "your", "this", "that", "from", "into"];

fn tokenize(fields: &[&Option<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for field in fields {
        let Some(text) = field else { continue };
        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.chars().filter(|c| c.is_alphabetic()).count() < 4 {
                continue;
            }
            let lower = token.to_lowercase();
            if STOPWORDS.contains(&lower.as_str()) {
                continue;
            }
            if seen.insert(lower.clone()) {
                tokens.push(lower);
            }
        }
    }
    tokens
}

/// Distinct ≥4-letter tokens drawn from the studio's own description of the
/// game, used by `GENERIC_OUTPUT_VIOLATION` to confirm the artifact actually
/// engages with this game rather than reading as boilerplate.
pub fn context_keywords(ctx: &GameContext) -> Vec<String> {
    let mut tokens: Vec<String> = ctx.game_title.split(|c: char| !c.is_alphanumeric()).map(|t| t.to_lowercase()).collect();
    tokens.extend(tokenize(&[
        &ctx.primary_genre,
        &ctx.subgenre,
        &ctx.key_mechanics,
        &ctx.tone,
        &ctx.intended_audience,
        &ctx.art_style,
    ]));
    let mut seen = HashSet::new();
    tokens.retain(|t| t.chars().filter(|c| c.is_alphabetic()).count() >= 4 && seen.insert(t.clone()));
    tokens
}

/// Candidate hashtags built from the studio's own name and game title, fed
/// into `BuildFinalHashtagPack` as the self-brand tier.
pub fn self_brand_hashtags(ctx: &GameContext) -> Vec<String> {
    let mut candidates = Vec::new();
    candidates.push(collapse(&ctx.game_title));
    if let Some(studio) = &ctx.studio_name {
        candidates.push(collapse(studio));
    }
    candidates.retain(|c| !c.is_empty());
    candidates
}

/// Candidate hashtags built from genre/mechanics, fed into
/// `BuildFinalHashtagPack` as the context-derived tier.
pub fn context_derived_hashtags(ctx: &GameContext) -> Vec<String> {
    let mut candidates = Vec::new();
    if let Some(genre) = &ctx.primary_genre {
        candidates.push(collapse(genre));
    }
    if let Some(subgenre) = &ctx.subgenre {
        candidates.push(collapse(subgenre));
    }
    candidates.retain(|c| !c.is_empty());
    candidates
}

fn collapse(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase()
}
