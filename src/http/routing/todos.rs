use axum::{body::Bytes, extract::{Path, State}, routing::{get, put}, Router, Json};
use axum::http::StatusCode;
use serde_json::{Map, Value};

use crate::{
    application::todo_service::TodoService,
    domain::todo::{CreateTodo, FieldUpdate, MalformedField, Todo, TodoId, TodoPatch, TEXT_REQUIRED},
    http::types::{self, ApiError},
};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>).fallback(types::not_found))
        .route("/todos/:id", put(update_todo::<S>).delete(delete_todo::<S>).fallback(types::not_found))
        .with_state(state)
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, body: Bytes) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input = parse_create(json_object(&body)?)?;
    let todo = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, body: Bytes) -> Result<Json<Todo>, ApiError> {
    let patch = parse_patch(json_object(&body)?);
    let todo = state.service.update(TodoId(id), patch).await?;
    Ok(Json(todo))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.service.delete(TodoId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// An empty body reads as `{}`; anything else must be a JSON object.
fn json_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ApiError::BadRequest("request body must be a JSON object".into())),
        Err(e) => Err(ApiError::BadRequest(format!("invalid JSON body: {e}"))),
    }
}

/// `POST /todos` schema: `{ text: string }`.
fn parse_create(mut fields: Map<String, Value>) -> Result<CreateTodo, ApiError> {
    match fields.remove("text") {
        Some(Value::String(text)) => Ok(CreateTodo { text }),
        _ => Err(ApiError::BadRequest(TEXT_REQUIRED.into())),
    }
}

/// `PUT /todos/:id` schema: `{ text?: string, completed?: boolean, dueDate?: string | null }`.
///
/// Only JSON types are checked here. The first mistyped field (text, then
/// completed, then dueDate) rides along in the patch and is reported by the
/// store once the record has been found. Unknown keys are ignored.
fn parse_patch(mut fields: Map<String, Value>) -> TodoPatch {
    let mut patch = TodoPatch::default();
    let mut mistyped = Vec::new();
    match fields.remove("text") {
        None => {}
        Some(Value::String(raw)) => patch.text = Some(raw),
        Some(_) => mistyped.push(MalformedField::Text),
    }
    match fields.remove("completed") {
        None => {}
        Some(Value::Bool(completed)) => patch.completed = Some(completed),
        Some(_) => mistyped.push(MalformedField::Completed),
    }
    match fields.remove("dueDate") {
        None => {}
        Some(Value::Null) => patch.due_date = FieldUpdate::Clear,
        Some(Value::String(due)) => patch.due_date = FieldUpdate::Set(due),
        Some(_) => mistyped.push(MalformedField::DueDate),
    }
    patch.malformed = mistyped.first().copied();
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value { Value::Object(fields) => fields, other => panic!("not an object: {other}") }
    }

    fn message(err: ApiError) -> String {
        match err { ApiError::BadRequest(m) => m, other => panic!("expected 400, got {other:?}") }
    }

    #[test]
    fn create_requires_string_text() {
        assert_eq!(parse_create(object(json!({ "text": "milk" }))).unwrap(), CreateTodo { text: "milk".into() });
        assert_eq!(message(parse_create(object(json!({}))).unwrap_err()), TEXT_REQUIRED);
        assert_eq!(message(parse_create(object(json!({ "text": 5 }))).unwrap_err()), TEXT_REQUIRED);
    }

    #[test]
    fn patch_distinguishes_absent_and_null_due_date() {
        assert_eq!(parse_patch(object(json!({}))), TodoPatch::default());
        assert_eq!(parse_patch(object(json!({ "dueDate": null }))).due_date, FieldUpdate::Clear);
        assert_eq!(parse_patch(object(json!({ "dueDate": "2025-01-01" }))).due_date, FieldUpdate::Set("2025-01-01".into()));
    }

    #[test]
    fn patch_keeps_blank_text_for_the_store() {
        let patch = parse_patch(object(json!({ "text": "  " })));
        assert_eq!(patch, TodoPatch::text("  "));
    }

    #[test]
    fn patch_records_first_mistyped_field() {
        let patch = parse_patch(object(json!({ "text": 1, "completed": "yes", "dueDate": 7 })));
        assert_eq!(patch.malformed, Some(MalformedField::Text));
        let patch = parse_patch(object(json!({ "text": "ok", "completed": "yes", "dueDate": 7 })));
        assert_eq!(patch.text.as_deref(), Some("ok"));
        assert_eq!(patch.malformed, Some(MalformedField::Completed));
        let patch = parse_patch(object(json!({ "completed": false, "dueDate": 7 })));
        assert_eq!(patch.completed, Some(false));
        assert_eq!(patch.malformed, Some(MalformedField::DueDate));
    }

    #[test]
    fn patch_ignores_unknown_keys() {
        let patch = parse_patch(object(json!({ "completed": true, "noteColor": "#fff9c4" })));
        assert_eq!(patch, TodoPatch::completed(true));
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        assert!(json_object(b"").unwrap().is_empty());
        assert!(json_object(b" \n").unwrap().is_empty());
        assert!(message(json_object(b"[1]").unwrap_err()).contains("JSON object"));
        assert!(message(json_object(b"{not json").unwrap_err()).starts_with("invalid JSON body"));
    }
}
