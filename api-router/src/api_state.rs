use std::sync::Arc;

use axum_session::SessionStore;
use axum_session_surreal::SessionSurrealPool;
use surrealdb::engine::any::Any;

use common::{
    storage::{db::SurrealDbClient, store::StorageManager},
    utils::{config::AppConfig, embedding::EmbeddingProvider},
};
use ingestion_pipeline::IngestionPipeline;
use query_pipeline::{models::ModelCatalog, session::SessionRegistry};

/// Shared state for all routes.
#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<SurrealDbClient>,
    pub config: AppConfig,
    pub storage: Arc<StorageManager>,
    pub embedding: Arc<EmbeddingProvider>,
    pub models: Arc<ModelCatalog>,
    pub sessions: Arc<SessionRegistry>,
    pub pipeline: Arc<IngestionPipeline>,
    pub session_store: SessionStore<SessionSurrealPool<Any>>,
}
