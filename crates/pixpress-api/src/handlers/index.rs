use crate::constants::INDEX_HTML;
use axum::response::Html;

/// Upload page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
