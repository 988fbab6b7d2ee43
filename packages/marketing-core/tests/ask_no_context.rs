//! Ask, no documents, strict mode, allow_outside=false (spec §8 scenario 6):
//! fixed refusal text, empty hits, and the LLM is never called at all.

use async_trait::async_trait;
use llm_client::MockClient;
use marketing_core::ask::{ask, AskMode, AskRequest};
use marketing_core::domain::{Chunk, CompetitorInsights, ConversationMemory, GameContext};
use marketing_core::error::Result;
use marketing_core::llm::LlmProvider;
use marketing_core::retriever::Retriever;
use marketing_core::store::Store;
use uuid::Uuid;

struct EmptyStore;

#[async_trait]
impl Store for EmptyStore {
    async fn get_game_context(&self, _user_id: i64, _group_id: i64) -> Result<GameContext> {
        unimplemented!("not exercised by this scenario")
    }

    async fn get_competitor_insights(&self, _user_id: i64, _group_id: i64, _platform: &str) -> Result<CompetitorInsights> {
        unimplemented!("not exercised by this scenario")
    }

    async fn create_workshop_document(&self, _params: marketing_core::domain::NewWorkshopDocument) -> Result<Uuid> {
        unimplemented!("not exercised by this scenario")
    }

    async fn enqueue_ingest_job(&self, _document_id: Uuid) -> Result<()> {
        unimplemented!("not exercised by this scenario")
    }

    async fn search_chunks(&self, _query: &str, _user_id: i64, _group_id: i64, _limit: i64) -> Result<Vec<Chunk>> {
        Ok(Vec::new())
    }

    async fn fuzzy_chunks(&self, _query: &str, _user_id: i64, _group_id: i64, _limit: i64) -> Result<Vec<Chunk>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn no_documents_strict_disallow_outside_short_circuits_before_any_llm_call() {
    let store = EmptyStore;
    let retriever = Retriever::new(&store);
    let memory = ConversationMemory::new();
    let llm = LlmProvider::Mock(MockClient::new(Vec::new()));

    let request = AskRequest {
        user_id: 1,
        group_id: 2,
        question: "what's our launch window?",
        limit: 5,
        mode: AskMode::Strict,
        allow_outside: false,
    };

    let response = ask(&request, &retriever, &memory, &llm).await.unwrap();

    assert_eq!(
        response.answer,
        "I don't have any uploaded documents to ground an answer in yet. Upload a PDF or allow me to answer from outside knowledge."
    );
    assert!(response.hits.is_empty());

    match &llm {
        LlmProvider::Mock(client) => assert_eq!(client.call_count(), 0, "the LLM must never be invoked on this path"),
        _ => unreachable!(),
    }
}
