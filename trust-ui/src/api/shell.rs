//! UI shell serving routes
//!
//! The shell is a static single page that drives the fragment API; all
//! assets are embedded at build time.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");
const TRUST_CSS: &str = include_str!("../ui/trust.css");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/trust.css
pub async fn serve_trust_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], TRUST_CSS).into_response()
}
