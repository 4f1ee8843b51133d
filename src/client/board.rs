//! Local mirror of the server's todo list.
//!
//! The board only changes after the server has answered. A failed request
//! leaves the list as it was and records a message for the panel the action
//! came from: adding reports on the input panel, everything else on the list
//! panel.

use crate::domain::todo::{Todo, TodoId, TodoPatch};

use super::api::{ClientError, TodoApi};
use super::presentation::NoteStyle;

pub const LOAD_FAILED: &str = "Failed to load todos!";
pub const ADD_FAILED: &str = "Failed to add to-do!";
pub const TOGGLE_FAILED: &str = "Failed to update to-do.";
pub const RENAME_FAILED: &str = "Failed to rename to-do.";
pub const DELETE_FAILED: &str = "Failed to delete to-do.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItem {
    pub todo: Todo,
    pub note: NoteStyle,
}

impl From<Todo> for BoardItem {
    fn from(todo: Todo) -> Self {
        let note = NoteStyle::for_id(&todo.id);
        Self { todo, note }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

pub struct TodoBoard<A: TodoApi> {
    api: A,
    items: Vec<BoardItem>,
    input_error: Option<String>,
    list_error: Option<String>,
    adding: bool,
}

impl<A: TodoApi> TodoBoard<A> {
    pub fn new(api: A) -> Self {
        Self { api, items: Vec::new(), input_error: None, list_error: None, adding: false }
    }

    pub fn items(&self) -> &[BoardItem] { &self.items }

    pub fn input_error(&self) -> Option<&str> { self.input_error.as_deref() }

    pub fn list_error(&self) -> Option<&str> { self.list_error.as_deref() }

    pub fn is_adding(&self) -> bool { self.adding }

    pub fn api(&self) -> &A { &self.api }

    pub fn dismiss_list_error(&mut self) { self.list_error = None; }

    pub fn get(&self, id: &TodoId) -> Option<&BoardItem> { self.items.iter().find(|item| &item.todo.id == id) }

    pub fn progress(&self) -> Progress {
        let total = self.items.len();
        let completed = self.items.iter().filter(|item| item.todo.completed).count();
        let percent = if total == 0 { 0 } else { (completed as f64 / total as f64 * 100.0).round() as u8 };
        Progress { completed, total, percent }
    }

    /// Replaces the local list with the server's. Meant to run once at startup.
    pub async fn load(&mut self) -> bool {
        match self.api.fetch_todos().await {
            Ok(todos) => {
                self.items = todos.into_iter().map(BoardItem::from).collect();
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "load failed");
                self.input_error = Some(LOAD_FAILED.to_string());
                false
            }
        }
    }

    /// Whether an add with `text` would be sent right now.
    pub fn can_submit(&self, text: &str) -> bool { !self.adding && !text.trim().is_empty() }

    /// Marks an add as in flight and returns the text to send, or `None` if
    /// the text is blank or another add has not finished yet.
    pub fn begin_add(&mut self, text: &str) -> Option<String> {
        if !self.can_submit(text) {
            return None;
        }
        self.adding = true;
        self.input_error = None;
        Some(text.trim().to_string())
    }

    pub fn finish_add(&mut self, result: Result<Todo, ClientError>) {
        self.adding = false;
        match result {
            Ok(todo) => self.items.insert(0, BoardItem::from(todo)),
            Err(e) => self.input_error = Some(e.user_message(ADD_FAILED)),
        }
    }

    /// Returns `false` when nothing was sent.
    pub async fn add(&mut self, text: &str) -> bool {
        let Some(text) = self.begin_add(text) else { return false };
        let result = self.api.add_todo(&text).await;
        self.finish_add(result);
        true
    }

    pub async fn toggle(&mut self, id: &TodoId) -> bool {
        let Some(item) = self.get(id) else { return false };
        let patch = TodoPatch::completed(!item.todo.completed);
        self.list_error = None;
        match self.api.update_todo(id, &patch).await {
            Ok(updated) => self.replace(updated),
            Err(e) => self.list_error = Some(e.user_message(TOGGLE_FAILED)),
        }
        true
    }

    /// Completed notes, blank text, and unchanged text send nothing.
    pub async fn rename(&mut self, id: &TodoId, new_text: &str) -> bool {
        let Some(item) = self.get(id) else { return false };
        let trimmed = new_text.trim();
        if item.todo.completed || trimmed.is_empty() || trimmed == item.todo.text {
            return false;
        }
        let patch = TodoPatch::text(trimmed);
        self.list_error = None;
        match self.api.update_todo(id, &patch).await {
            Ok(updated) => self.replace(updated),
            Err(e) => self.list_error = Some(e.user_message(RENAME_FAILED)),
        }
        true
    }

    pub async fn delete(&mut self, id: &TodoId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.list_error = None;
        match self.api.delete_todo(id).await {
            Ok(()) => self.items.retain(|item| &item.todo.id != id),
            Err(e) => self.list_error = Some(e.user_message(DELETE_FAILED)),
        }
        true
    }

    fn replace(&mut self, todo: Todo) {
        if let Some(slot) = self.items.iter_mut().find(|item| item.todo.id == todo.id) {
            *slot = BoardItem::from(todo);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::application::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{error::TodoError, todo::CreateTodo};
    use crate::infrastructure::memory_repo::InMemoryTodoRepository;

    /// Talks to the service directly; `offline` makes every call fail like a dropped connection.
    struct InProcessApi {
        service: TodoServiceImpl<InMemoryTodoRepository>,
        offline: AtomicBool,
    }

    impl InProcessApi {
        fn seeded() -> Self {
            Self { service: TodoServiceImpl::new(InMemoryTodoRepository::seeded()), offline: AtomicBool::new(false) }
        }

        fn check(&self) -> Result<(), ClientError> {
            if self.offline.load(Ordering::SeqCst) { Err(ClientError::Status(503)) } else { Ok(()) }
        }
    }

    fn to_client(e: TodoError) -> ClientError {
        let status = match e { TodoError::Validation(_) => 400, TodoError::NotFound(_) => 404, TodoError::Internal(_) => 500 };
        ClientError::Api { status, message: e.to_string() }
    }

    #[async_trait]
    impl TodoApi for InProcessApi {
        async fn fetch_todos(&self) -> Result<Vec<Todo>, ClientError> {
            self.check()?;
            self.service.list().await.map_err(to_client)
        }
        async fn add_todo(&self, text: &str) -> Result<Todo, ClientError> {
            self.check()?;
            self.service.create(CreateTodo { text: text.into() }).await.map_err(to_client)
        }
        async fn update_todo(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError> {
            self.check()?;
            self.service.update(id.clone(), patch.clone()).await.map_err(to_client)
        }
        async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError> {
            self.check()?;
            self.service.delete(id.clone()).await.map_err(to_client)
        }
    }

    async fn loaded() -> TodoBoard<InProcessApi> {
        let mut board = TodoBoard::new(InProcessApi::seeded());
        assert!(board.load().await);
        board
    }

    fn ids<A: TodoApi>(board: &TodoBoard<A>) -> Vec<&str> { board.items().iter().map(|i| i.todo.id.as_str()).collect() }

    #[tokio::test]
    async fn load_mirrors_server_and_styles_notes() {
        let board = loaded().await;
        assert_eq!(ids(&board), vec!["001"]);
        assert_eq!(board.items()[0].note, NoteStyle::for_id(&"001".into()));
    }

    #[tokio::test]
    async fn load_failure_reports_on_input_panel() {
        let api = InProcessApi::seeded();
        api.offline.store(true, Ordering::SeqCst);
        let mut board = TodoBoard::new(api);
        assert!(!board.load().await);
        assert_eq!(board.input_error(), Some(LOAD_FAILED));
        assert!(board.items().is_empty());
    }

    #[tokio::test]
    async fn add_prepends_server_record() {
        let mut board = loaded().await;
        assert!(board.add("  Buy milk ").await);
        assert_eq!(ids(&board), vec!["002", "001"]);
        assert_eq!(board.items()[0].todo.text, "Buy milk");
        assert!(!board.is_adding());
    }

    #[tokio::test]
    async fn blank_add_sends_nothing() {
        let mut board = loaded().await;
        assert!(!board.add("   ").await);
        assert_eq!(ids(&board), vec!["001"]);
    }

    #[tokio::test]
    async fn second_add_refused_while_first_in_flight() {
        let mut board = loaded().await;
        assert_eq!(board.begin_add("one").as_deref(), Some("one"));
        assert!(board.is_adding());
        assert!(board.begin_add("two").is_none());
        assert!(!board.add("three").await);
        board.finish_add(Err(ClientError::Status(500)));
        assert_eq!(board.input_error(), Some(ADD_FAILED));
        assert!(board.can_submit("four"));
    }

    #[tokio::test]
    async fn split_add_waits_for_the_server_record() {
        let mut board = loaded().await;
        let text = board.begin_add(" Buy milk ").unwrap();
        let result = board.api().add_todo(&text).await;
        assert_eq!(ids(&board), vec!["001"]);
        assert!(board.is_adding());

        board.finish_add(result);
        assert_eq!(ids(&board), vec!["002", "001"]);
        assert!(!board.is_adding());
        assert_eq!(board.input_error(), None);
    }

    #[tokio::test]
    async fn dropped_add_frees_the_input() {
        let mut board = loaded().await;
        board.begin_add("Buy milk").unwrap();
        board.finish_add(Err(ClientError::Cancelled));
        assert_eq!(board.input_error(), Some(ADD_FAILED));
        assert!(board.can_submit("Buy milk"));
        assert_eq!(ids(&board), vec!["001"]);
    }

    #[tokio::test]
    async fn failed_mutations_leave_list_alone() {
        let mut board = loaded().await;
        board.add("Buy milk").await;
        let before = board.items().to_vec();
        board.api.offline.store(true, Ordering::SeqCst);

        board.toggle(&"002".into()).await;
        assert_eq!(board.list_error(), Some(TOGGLE_FAILED));
        board.rename(&"002".into(), "Buy oat milk").await;
        assert_eq!(board.list_error(), Some(RENAME_FAILED));
        board.delete(&"001".into()).await;
        assert_eq!(board.list_error(), Some(DELETE_FAILED));
        assert_eq!(board.input_error(), None);
        assert_eq!(board.items(), before.as_slice());

        board.dismiss_list_error();
        assert_eq!(board.list_error(), None);
    }

    #[tokio::test]
    async fn toggle_rename_delete_follow_server() {
        let mut board = loaded().await;
        board.add("Buy milk").await;

        assert!(board.rename(&"002".into(), " Buy oat milk ").await);
        assert_eq!(board.get(&"002".into()).unwrap().todo.text, "Buy oat milk");

        assert!(board.toggle(&"002".into()).await);
        assert!(board.get(&"002".into()).unwrap().todo.completed);
        assert_eq!(ids(&board), vec!["002", "001"]);
        assert_eq!(board.progress(), Progress { completed: 1, total: 2, percent: 50 });

        assert!(board.delete(&"001".into()).await);
        assert_eq!(ids(&board), vec!["002"]);
        assert_eq!(board.list_error(), None);
    }

    #[tokio::test]
    async fn rename_guards() {
        let mut board = loaded().await;
        let id: TodoId = "001".into();
        let text = board.get(&id).unwrap().todo.text.clone();
        assert!(!board.rename(&id, "   ").await);
        assert!(!board.rename(&id, &format!(" {text} ")).await);
        board.toggle(&id).await;
        assert!(!board.rename(&id, "something else").await);
        assert_eq!(board.get(&id).unwrap().todo.text, text);
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let mut board = loaded().await;
        // another client removed it behind our back
        board.api.service.delete("001".into()).await.unwrap();
        board.toggle(&"001".into()).await;
        assert_eq!(board.list_error(), Some("Todo not found: 001"));
        assert_eq!(ids(&board), vec!["001"]);
    }

    #[test]
    fn progress_rounds() {
        let mut board = TodoBoard::new(InProcessApi::seeded());
        assert_eq!(board.progress(), Progress { completed: 0, total: 0, percent: 0 });
        board.items = ["001", "002", "003"]
            .iter()
            .enumerate()
            .map(|(i, id)| BoardItem::from(Todo { id: (*id).into(), text: "t".into(), completed: i < 2, due_date: None }))
            .collect();
        assert_eq!(board.progress(), Progress { completed: 2, total: 3, percent: 67 });
    }
}
