pub mod tasks;
pub mod web;

use axum::{routing::get, Router};

pub fn app(api: Router, web: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(api)
        .merge(web)
}
