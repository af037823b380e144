use std::sync::Arc;

use api_router::{api_state::ApiState, app_router};
use common::{
    storage::{db::SurrealDbClient, store::StorageManager},
    utils::{config::get_config, embedding::EmbeddingProvider},
};
use ingestion_pipeline::{utils::pdf_text::PdfTextExtractor, IngestionPipeline};
use query_pipeline::{models::ModelCatalog, session::SessionRegistry};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let config = get_config()?;

    let db = Arc::new(
        SurrealDbClient::new(
            &config.surrealdb_address,
            &config.surrealdb_username,
            &config.surrealdb_password,
            &config.surrealdb_namespace,
            &config.surrealdb_database,
        )
        .await?,
    );
    db.ensure_initialized().await?;

    let session_store = db.create_session_store().await?;

    let openai_client = Arc::new(async_openai::Client::with_config(
        async_openai::config::OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url),
    ));

    let embedding =
        Arc::new(EmbeddingProvider::from_config(&config, Some(openai_client.clone())).await?);
    info!(
        embedding_backend = embedding.backend_label(),
        embedding_dimension = embedding.dimension(),
        "Embedding provider initialized"
    );

    let models = Arc::new(ModelCatalog::from_config(&config));
    let storage = Arc::new(StorageManager::new(&config).await?);

    // Summaries always use the default model, regardless of session choice.
    let pipeline = Arc::new(IngestionPipeline::new(
        db.clone(),
        storage.clone(),
        embedding.clone(),
        models.default_model(),
        Arc::new(PdfTextExtractor),
        config.chunk_size,
        config.chunk_overlap,
    ));

    let state = ApiState {
        db,
        config: config.clone(),
        storage,
        embedding,
        models,
        sessions: Arc::new(SessionRegistry::new()),
        pipeline,
        session_store,
    };

    let app = app_router(&state);

    let serve_address = format!("0.0.0.0:{}", config.http_port);
    info!("Starting server listening on {serve_address}");
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
