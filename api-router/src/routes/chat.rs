use axum::{extract::State, Form};
use serde::Deserialize;

use crate::{api_state::ApiState, context_id, error::ApiError, SessionType, SESSION_MODEL_KEY};

#[derive(Debug, Deserialize)]
pub struct ChatParams {
    pub question: String,
}

pub async fn chat(
    State(state): State<ApiState>,
    session: SessionType,
    Form(params): Form<ChatParams>,
) -> Result<String, ApiError> {
    let model_choice: Option<String> = session.get(SESSION_MODEL_KEY);
    let model = state.models.resolve(model_choice.as_deref());

    let context = context_id(&session);
    let entry = state.sessions.get_or_create(&context).await;
    let mut document_session = entry.lock().await;

    let reply = query_pipeline::answer(
        &mut document_session,
        &params.question,
        model.as_ref(),
        &state.embedding,
        state.config.retrieval_top_k,
    )
    .await?;

    Ok(reply)
}
