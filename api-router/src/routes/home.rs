use axum::response::Html;

/// Serves the embedded chat page.
pub async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../../assets/chat.html"))
}
