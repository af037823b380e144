//! HTTP front door: upload, model selection, and chat endpoints plus the
//! static page, with per-route error mapping onto terse response bodies.
#![allow(clippy::missing_docs_in_private_items)]

use api_state::ApiState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use axum_session::{Session, SessionLayer};
use axum_session_surreal::SessionSurrealPool;
use surrealdb::engine::any::Any;
use uuid::Uuid;

use routes::{chat::chat, home::chat_page, model::update_model, upload::upload_pdf};

pub mod api_state;
pub mod error;
pub mod routes;

pub type SessionType = Session<SessionSurrealPool<Any>>;

/// Session key holding the id that scopes document state to this visitor.
pub const SESSION_CONTEXT_KEY: &str = "context_id";
/// Session key holding the visitor's model choice.
pub const SESSION_MODEL_KEY: &str = "current_model";

/// Builds the application router with the session layer applied.
pub fn app_router(app_state: &ApiState) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route(
            "/upload_pdf",
            post(upload_pdf).layer(DefaultBodyLimit::max(
                app_state.config.upload_max_body_bytes,
            )),
        )
        .route("/update_model", post(update_model))
        .route("/chat", post(chat))
        .layer(SessionLayer::new(app_state.session_store.clone()))
        .with_state(app_state.clone())
}

/// Returns the visitor's context id, minting one on first contact. All
/// document state for the visitor hangs off this id.
pub(crate) fn context_id(session: &SessionType) -> String {
    if let Some(existing) = session.get::<String>(SESSION_CONTEXT_KEY) {
        return existing;
    }
    let fresh = Uuid::new_v4().to_string();
    session.set(SESSION_CONTEXT_KEY, fresh.clone());
    fresh
}
