use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    error::TodoError,
    id_generator::IdGenerator,
    repository::TodoRepository,
    todo::{normalize_text, CreateTodo, Todo, TodoId, TodoPatch, TEXT_REQUIRED},
};

pub const SEED_ID: &str = "001";
pub const SEED_TEXT: &str = "Welcome to Not Forget To-Do!";

#[derive(Debug)]
struct Store {
    // Head is the newest record.
    todos: Vec<Todo>,
    ids: IdGenerator,
}

impl Store {
    fn position(&self, id: &TodoId) -> Option<usize> { self.todos.iter().position(|t| &t.id == id) }
}

/// Volatile store holding the canonical list. Clones share the same list.
#[derive(Clone, Debug)]
pub struct InMemoryTodoRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTodoRepository {
    /// Store holding the welcome record `001`; the next id handed out is `002`.
    pub fn seeded() -> Self {
        let seed = Todo { id: TodoId::from(SEED_ID), text: SEED_TEXT.to_string(), completed: false, due_date: None };
        Self::with_records(vec![seed], 2)
    }

    pub fn empty() -> Self { Self::with_records(Vec::new(), 1) }

    /// `next_id` must be greater than every numeric id in `todos`.
    pub fn with_records(todos: Vec<Todo>, next_id: u64) -> Self {
        Self { store: Arc::new(RwLock::new(Store { todos, ids: IdGenerator::starting_at(next_id) })) }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.store.read().await.todos.clone())
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        let text = normalize_text(&input.text, TEXT_REQUIRED)?;
        let mut store = self.store.write().await;
        let todo = Todo { id: store.ids.next(), text, completed: false, due_date: None };
        store.todos.insert(0, todo.clone());
        tracing::debug!(id = %todo.id, total = store.todos.len(), "todo created");
        Ok(todo)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, TodoError> {
        let mut store = self.store.write().await;
        let Some(index) = store.position(&id) else { return Err(TodoError::NotFound(id)) };
        let patch = patch.validate()?;
        let todo = &mut store.todos[index];
        patch.apply(todo);
        tracing::debug!(id = %todo.id, "todo updated");
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let mut store = self.store.write().await;
        let Some(index) = store.position(&id) else { return Err(TodoError::NotFound(id)) };
        store.todos.remove(index);
        tracing::debug!(%id, remaining = store.todos.len(), "todo deleted");
        Ok(())
    }
}
