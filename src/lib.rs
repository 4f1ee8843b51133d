pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

use application::todo_service::TodoServiceImpl;
use axum::Router;
use config::AppConfig;
use http::routing::{self, todos};
use infrastructure::memory_repo::InMemoryTodoRepository;

/// Full application router over a freshly seeded store.
pub fn seeded_app(config: &AppConfig) -> Router {
    let service = TodoServiceImpl::new(InMemoryTodoRepository::seeded());
    routing::app(todos::router(todos::AppState { service }), config)
}
