use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

use common::{
    storage::{db::SurrealDbClient, store::StorageManager, types::document::StoredDocument},
    utils::{embedding::EmbeddingProvider, llm::LanguageModel},
};
use query_pipeline::{
    index::{Chunk, SearchIndex},
    prompt::build_summary_messages,
    session::DocumentSession,
};

use crate::utils::{
    chunking::{clean_text, CharacterChunker},
    pdf_text::{is_pdf_upload, TextExtractor},
};

/// Ingestion failures, tagged by the stage that failed. There is no
/// rollback: a failure after the install step leaves the new index active.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid file type")]
    InvalidFileType,
    #[error("Failed to store document: {0}")]
    Storage(String),
    #[error("Failed to extract text: {0}")]
    Extraction(String),
    #[error("Invalid chunking configuration: {0}")]
    Chunking(String),
    #[error("Failed to embed chunks: {0}")]
    Embedding(String),
    #[error("Failed to summarize document: {0}")]
    Summarization(String),
}

/// What a successful ingestion produced.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub document_id: String,
    pub pages: usize,
    pub chunks: usize,
    pub summary: String,
}

/// Runs uploads end to end: validate, persist, extract, clean, chunk,
/// embed, install, summarize. One instance is shared by all requests.
pub struct IngestionPipeline {
    db: Arc<SurrealDbClient>,
    storage: Arc<StorageManager>,
    embedding: Arc<EmbeddingProvider>,
    summarizer: Arc<dyn LanguageModel>,
    extractor: Arc<dyn TextExtractor>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IngestionPipeline {
    pub fn new(
        db: Arc<SurrealDbClient>,
        storage: Arc<StorageManager>,
        embedding: Arc<EmbeddingProvider>,
        summarizer: Arc<dyn LanguageModel>,
        extractor: Arc<dyn TextExtractor>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            db,
            storage,
            embedding,
            summarizer,
            extractor,
            chunk_size,
            chunk_overlap,
        }
    }

    /// Ingests one uploaded file into the given session. The caller holds
    /// the session lock, so the install step and the history reset are
    /// atomic with respect to concurrent questions and uploads.
    pub async fn ingest(
        &self,
        file_name: &str,
        bytes: Bytes,
        session: &mut DocumentSession,
    ) -> Result<IngestReceipt, IngestError> {
        if !is_pdf_upload(file_name, &bytes) {
            return Err(IngestError::InvalidFileType);
        }

        let document = StoredDocument::create(file_name, bytes.clone(), &self.db, &self.storage)
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))?;
        let document_id = document.id.clone();

        let pages = self
            .extractor
            .extract_pages(bytes)
            .await
            .map_err(|err| IngestError::Extraction(err.to_string()))?;

        let chunker = CharacterChunker::new(self.chunk_size, self.chunk_overlap)
            .map_err(|err| IngestError::Chunking(err.to_string()))?;

        let mut chunks: Vec<Chunk> = Vec::new();
        for page in &pages {
            let cleaned = clean_text(&page.text);
            for text in chunker.chunk(&cleaned) {
                chunks.push(Chunk::new(text, page.number));
            }
        }

        if chunks.is_empty() {
            return Err(IngestError::Extraction(
                "document contained no usable text after cleanup".into(),
            ));
        }

        debug!(
            document_id = %document_id,
            pages = pages.len(),
            chunks = chunks.len(),
            "Embedding document chunks"
        );

        let vectors = self
            .embedding
            .embed_batch(chunks.iter().map(|chunk| chunk.text.clone()).collect())
            .await
            .map_err(|err| IngestError::Embedding(err.to_string()))?;

        let pairs = vectors.into_iter().zip(chunks.iter().cloned()).collect();
        let index = SearchIndex::from_pairs(pairs);
        let chunk_count = index.len();
        let page_count = pages.len();

        session.install_index(index, document_id.clone());

        let combined_text = chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let summary = self
            .summarize(&combined_text)
            .await
            .map_err(|err| IngestError::Summarization(err.to_string()))?;

        info!(
            document_id = %document_id,
            pages = page_count,
            chunks = chunk_count,
            "Ingested document"
        );

        Ok(IngestReceipt {
            document_id,
            pages: page_count,
            chunks: chunk_count,
            summary,
        })
    }

    async fn summarize(&self, document_text: &str) -> Result<String, common::error::AppError> {
        let messages = build_summary_messages(document_text)?;
        self.summarizer.complete(messages).await
    }
}
