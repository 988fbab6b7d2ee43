//! Chunk retrieval with keyword-first, fuzzy-fallback priority (spec §4.2).

use std::collections::HashSet;

use crate::domain::{truncate_chars, Chunk};
use crate::error::Result;
use crate::store::Store;

pub const PROMPT_TRUNCATE_CHARS: usize = 900;
pub const SNIPPET_TRUNCATE_CHARS: usize = 200;

pub struct Retriever<'a> {
    store: &'a dyn Store,
}

impl<'a> Retriever<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Keyword on the full question, then keyword on a concise query, then
    /// fuzzy. The first non-empty stage wins; stages never merge.
    pub async fn retrieve(&self, user_id: i64, group_id: i64, question: &str, limit: i64) -> Result<Vec<Chunk>> {
        let limit = limit.clamp(1, 8);

        let hits = self.store.search_chunks(question, user_id, group_id, limit).await?;
        if !hits.is_empty() {
            return Ok(dedup(hits));
        }

        let concise = concise_query(question);
        if !concise.is_empty() {
            let hits = self.store.search_chunks(&concise, user_id, group_id, limit).await?;
            if !hits.is_empty() {
                return Ok(dedup(hits));
            }
        }

        let hits = self.store.fuzzy_chunks(question, user_id, group_id, limit).await?;
        Ok(dedup(hits))
    }
}

/// Keep the three longest unique tokens of >= 4 letters, longest first.
fn concise_query(question: &str) -> String {
    let mut seen = HashSet::new();
    let mut tokens: Vec<&str> = question
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().filter(|c| c.is_alphabetic()).count() >= 4)
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect();

    tokens.sort_by_key(|t| std::cmp::Reverse(t.len()));
    tokens.truncate(3);
    tokens.join(" ")
}

fn dedup(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter(|c| seen.insert((c.document_id, c.chunk_index)))
        .collect()
}

/// Truncate a chunk's content for prompt inclusion (900 chars).
pub fn for_prompt(chunk: &Chunk) -> String {
    truncate_chars(&chunk.content, PROMPT_TRUNCATE_CHARS)
}

/// Truncate a chunk's content for a client-visible snippet (200 chars).
pub fn for_snippet(chunk: &Chunk) -> String {
    truncate_chars(&chunk.content, SNIPPET_TRUNCATE_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concise_query_keeps_three_longest_unique_tokens() {
        let q = "what is the best pricing strategy strategy for pricing plans";
        let concise = concise_query(q);
        let tokens: Vec<&str> = concise.split(' ').collect();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains(&"pricing"));
        assert!(tokens.contains(&"strategy"));
    }

    #[test]
    fn concise_query_drops_short_tokens() {
        let concise = concise_query("is it ok to do this");
        assert!(!concise.contains("is"));
    }
}
