//! Answering questions against the session's active document: embed the
//! question, retrieve the closest chunks, assemble the prompt with the
//! session history, and call the selected chat model.
#![allow(clippy::missing_docs_in_private_items)]

pub mod index;
pub mod models;
pub mod prompt;
pub mod session;

use thiserror::Error;
use tracing::debug;

use common::{
    error::AppError,
    utils::{embedding::EmbeddingProvider, llm::LanguageModel},
};

use crate::session::DocumentSession;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("No document has been ingested for this session")]
    NoActiveDocument,
    #[error("Query failed: {0}")]
    Failed(String),
}

impl From<AppError> for QueryError {
    fn from(err: AppError) -> Self {
        QueryError::Failed(err.to_string())
    }
}

impl From<anyhow::Error> for QueryError {
    fn from(err: anyhow::Error) -> Self {
        QueryError::Failed(err.to_string())
    }
}

/// Answers a question against the session's active document and appends the
/// exchange to its history.
///
/// The caller holds the session lock for the whole call, so retrieval, the
/// model round trip, and the history append are atomic with respect to other
/// requests in the same session.
pub async fn answer(
    session: &mut DocumentSession,
    question: &str,
    model: &dyn LanguageModel,
    embedding: &EmbeddingProvider,
    top_k: usize,
) -> Result<String, QueryError> {
    let index = session.index.as_ref().ok_or(QueryError::NoActiveDocument)?;

    let query_embedding = embedding.embed(question).await?;
    let hits = index.search(&query_embedding, top_k);
    let context = hits
        .iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    debug!(
        model = model.model_id(),
        retrieved = hits.len(),
        history_turns = session.history.len(),
        "Dispatching chat completion"
    );

    let messages = prompt::build_chat_messages(&session.history, question, &context)?;
    let response = model.complete(messages).await?;

    session.record_exchange(question.to_owned(), response.clone());

    Ok(response)
}

#[cfg(test)]
mod tests {
    use async_openai::types::ChatCompletionRequestMessage;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::index::{Chunk, SearchIndex};
    use crate::session::Turn;

    struct CannedModel {
        reply: String,
        seen_messages: Mutex<Vec<usize>>,
    }

    impl CannedModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_owned(),
                seen_messages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        fn model_id(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            messages: Vec<ChatCompletionRequestMessage>,
        ) -> Result<String, AppError> {
            self.seen_messages.lock().await.push(messages.len());
            Ok(self.reply.clone())
        }
    }

    async fn session_with_document(embedding: &EmbeddingProvider) -> DocumentSession {
        let chunks = [
            "Rust has an ownership model with borrows and lifetimes.",
            "The tokio runtime schedules asynchronous tasks.",
            "SurrealDB can run embedded in memory for tests.",
        ];
        let vectors = embedding
            .embed_batch(chunks.iter().map(|c| (*c).to_owned()).collect())
            .await
            .expect("embed chunks");

        let pairs = vectors
            .into_iter()
            .zip(chunks.iter().enumerate())
            .map(|(vector, (i, text))| (vector, Chunk::new(*text, i as u32 + 1)))
            .collect();

        let mut session = DocumentSession::new();
        session.install_index(SearchIndex::from_pairs(pairs), "doc:test".into());
        session
    }

    #[tokio::test]
    async fn test_answer_without_document_is_rejected() {
        let embedding = EmbeddingProvider::new_hashed(32).expect("provider");
        let model = CannedModel::new("unused");
        let mut session = DocumentSession::new();

        let result = answer(&mut session, "anything?", &model, &embedding, 4).await;

        assert!(matches!(result, Err(QueryError::NoActiveDocument)));
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn test_answer_appends_exchange_in_order() {
        let embedding = EmbeddingProvider::new_hashed(32).expect("provider");
        let model = CannedModel::new("an answer about ownership");
        let mut session = session_with_document(&embedding).await;

        let reply = answer(&mut session, "What is ownership?", &model, &embedding, 2)
            .await
            .expect("answer");

        assert_eq!(reply, "an answer about ownership");
        assert_eq!(
            session.history,
            vec![
                Turn::Human("What is ownership?".into()),
                Turn::Assistant("an answer about ownership".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_history_grows_across_turns_and_feeds_prompt() {
        let embedding = EmbeddingProvider::new_hashed(32).expect("provider");
        let model = CannedModel::new("reply");
        let mut session = session_with_document(&embedding).await;

        answer(&mut session, "first question", &model, &embedding, 2)
            .await
            .expect("first answer");
        answer(&mut session, "second question", &model, &embedding, 2)
            .await
            .expect("second answer");

        assert_eq!(session.history.len(), 4);

        // First call sees no history (3 messages), second sees one exchange (5).
        let seen = model.seen_messages.lock().await;
        assert_eq!(*seen, vec![3, 5]);
    }

    #[tokio::test]
    async fn test_failed_model_call_leaves_history_untouched() {
        struct FailingModel;

        #[async_trait]
        impl LanguageModel for FailingModel {
            fn model_id(&self) -> &str {
                "failing"
            }

            async fn complete(
                &self,
                _messages: Vec<ChatCompletionRequestMessage>,
            ) -> Result<String, AppError> {
                Err(AppError::LLMParsing("backend unavailable".into()))
            }
        }

        let embedding = EmbeddingProvider::new_hashed(32).expect("provider");
        let mut session = session_with_document(&embedding).await;

        let result = answer(&mut session, "a question", &FailingModel, &embedding, 2).await;

        assert!(matches!(result, Err(QueryError::Failed(_))));
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_bounds_retrieved_context() {
        let embedding = EmbeddingProvider::new_hashed(32).expect("provider");
        let session = session_with_document(&embedding).await;
        let index = session.index.as_ref().expect("index");

        let query = embedding.embed("tokio runtime").await.expect("embed");
        assert_eq!(index.search(&query, 1).len(), 1);
        assert_eq!(index.search(&query, 10).len(), 3);
    }
}
