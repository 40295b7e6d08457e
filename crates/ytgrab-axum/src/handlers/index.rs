//! Embedded UI.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Serve the single-page polling UI.
pub async fn page() -> Html<&'static str> {
    Html(INDEX_HTML)
}
