pub mod todos;

use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::{config::AppConfig, http::types};

/// Mounts the todo routes under the configured base path and installs the
/// JSON 404 fallback for everything else.
pub fn app(router: Router, config: &AppConfig) -> Router {
    let mut app = Router::new().route("/health", get(|| async { "ok" }));
    if !config.production {
        app = app.route("/", get(|| async { Json(json!({ "message": "Welcome to the To-Do API! (for Development)" })) }));
    }
    let app = if config.base_path.is_empty() { app.merge(router) } else { app.nest(&config.base_path, router) };
    app.fallback(types::not_found)
}
