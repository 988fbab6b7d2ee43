//! Grounded question-answering over retrieved document chunks, with a
//! per-(user, group) short-term conversation memory and a citation
//! invariant enforced server-side (spec §4.9).

use chrono::Utc;
use llm_client::{ChatOptions, Message};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{truncate_chars, Chunk, ConversationMemory, ConversationTurn};
use crate::error::Result;
use crate::llm::LlmProvider;
use crate::retriever::Retriever;

const NO_CONTEXT_REFUSAL: &str =
    "I don't have any uploaded documents to ground an answer in yet. Upload a PDF or allow me to answer from outside knowledge.";
const UNGROUNDED_FALLBACK: &str =
    "Unable to generate a grounded answer with page citations from your PDFs.";

static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(p\.|CP)\d+\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskMode {
    Strict,
    Opinion,
}

pub struct AskRequest<'a> {
    pub user_id: i64,
    pub group_id: i64,
    pub question: &'a str,
    pub limit: i64,
    pub mode: AskMode,
    pub allow_outside: bool,
}

pub struct AskHit {
    pub document_id: uuid::Uuid,
    pub page: i32,
    pub chunk_index: i32,
    pub snippet: String,
}

pub struct AskResponse {
    pub answer: String,
    pub hits: Vec<AskHit>,
}

pub async fn ask(
    request: &AskRequest<'_>,
    retriever: &Retriever<'_>,
    memory: &ConversationMemory,
    llm: &LlmProvider,
) -> Result<AskResponse> {
    let now = Utc::now();
    let history = memory.recent(request.user_id, request.group_id, now);

    let chunks = retriever
        .retrieve(request.user_id, request.group_id, request.question, request.limit)
        .await?;

    let has_context = !chunks.is_empty() || !history.is_empty();
    let context_block = compose_context_block(&chunks, &history);

    if !has_context && !request.allow_outside {
        let answer = NO_CONTEXT_REFUSAL.to_string();
        return Ok(AskResponse { answer, hits: to_hits(&chunks) });
    }

    let system_prompt = select_system_prompt(request.mode, has_context, !history.is_empty(), request.allow_outside);

    let user_prompt = format!("{context_block}\n\nQuestion: {}", request.question);
    let opts = ChatOptions {
        temperature: Some(if matches!(request.mode, AskMode::Strict) { 0.2 } else { 0.7 }),
        top_p: Some(0.9),
        max_tokens: None,
        num_ctx: Some(8192),
        min_p: Some(0.05),
        seed: Some(13),
    };

    let conversation_history: Vec<Message> = history
        .iter()
        .flat_map(|turn| vec![Message::user(turn.question.clone()), Message::assistant(turn.answer.clone())])
        .collect();

    let response = llm.call(&system_prompt, &user_prompt, &conversation_history, &opts).await?;

    let mut answer = response.content;
    if has_context && !matches!(request.mode, AskMode::Opinion) && !CITATION.is_match(&answer) {
        answer = UNGROUNDED_FALLBACK.to_string();
    }

    memory.push(
        request.user_id,
        request.group_id,
        ConversationTurn {
            question: request.question.to_string(),
            answer: answer.clone(),
            context_block,
            hits: chunks.len(),
            at: now,
        },
    );

    Ok(AskResponse { answer, hits: to_hits(&chunks) })
}

fn compose_context_block(chunks: &[Chunk], history: &[ConversationTurn]) -> String {
    let mut out = String::new();

    for (i, chunk) in chunks.iter().enumerate() {
        out.push_str(&format!(
            "[{}] (doc {}, p.{}) {}\n",
            i + 1,
            chunk.document_id,
            chunk.page,
            truncate_chars(&chunk.content, 900)
        ));
    }

    if !history.is_empty() {
        out.push_str("\nConversation so far:\n");
        for turn in history {
            out.push_str(&format!("Q: {}\nA: {}\n", turn.question, turn.answer));
        }
    }

    out
}

/// Only ever invoked once `ask()` has already let the call past the
/// no-context/disallow-outside short-circuit, so `!has_context` here always
/// implies `allow_outside == true`.
fn select_system_prompt(mode: AskMode, has_context: bool, _has_history: bool, _allow_outside: bool) -> String {
    match (mode, has_context) {
        (AskMode::Strict, true) => {
            "Answer only from Context. Cite pages like [p.X]. If missing, say you don't know.".to_string()
        }
        (AskMode::Opinion, true) => {
            "Opinionated analysis primarily from Context; claims from Context MUST cite [p.X]; outside knowledge only under 'Assumptions'.".to_string()
        }
        (_, false) => "No Context. Do NOT invent citations. Include an 'Assumptions' section.".to_string(),
    }
}

fn to_hits(chunks: &[Chunk]) -> Vec<AskHit> {
    chunks
        .iter()
        .map(|c| AskHit {
            document_id: c.document_id,
            page: c.page,
            chunk_index: c.chunk_index,
            snippet: truncate_chars(&c.content, 200),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_regex_matches_page_and_competitor_post_refs() {
        assert!(CITATION.is_match("see [p.3] for details"));
        assert!(CITATION.is_match("see [CP2] for details"));
        assert!(!CITATION.is_match("no citation here"));
    }

    #[test]
    fn strict_with_context_demands_page_citations() {
        let prompt = select_system_prompt(AskMode::Strict, true, false, false);
        assert!(prompt.contains("Cite pages"));
    }

    #[test]
    fn no_context_allow_outside_includes_assumptions_section() {
        let prompt = select_system_prompt(AskMode::Strict, false, false, true);
        assert!(prompt.contains("No Context"));
        assert!(prompt.contains("Assumptions"));
    }
}
