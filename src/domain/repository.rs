use async_trait::async_trait;
use super::{error::TodoError, todo::{CreateTodo, Todo, TodoId, TodoPatch}};

/// Authoritative ordered collection of records. Each call runs to completion
/// before another can observe the collection.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError>;
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, TodoError>;
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;
}
