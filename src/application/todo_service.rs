use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId, TodoPatch};
use async_trait::async_trait;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError>;
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, TodoError>;
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self) -> Result<Vec<Todo>, TodoError> { self.repo.list().await }

    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        let result = self.repo.create(input).await;
        if let Err(e) = &result { tracing::debug!(error = %e, "create rejected"); }
        result
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, TodoError> {
        let result = self.repo.update(id.clone(), patch).await;
        if let Err(e) = &result { tracing::debug!(%id, error = %e, "update rejected"); }
        result
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let result = self.repo.delete(id.clone()).await;
        if let Err(e) = &result { tracing::debug!(%id, error = %e, "delete rejected"); }
        result
    }
}
