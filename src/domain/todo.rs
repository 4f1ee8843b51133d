use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::{error::TodoError, id_generator::ID_WIDTH};

/// Record identifier. Compared as an exact string: `"2"` is not `"002"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TodoId(pub String);

impl TodoId {
    pub fn from_number(n: u64) -> Self { Self(format!("{n:0width$}", width = ID_WIDTH)) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self { Self(value) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub text: String,
}

/// Change requested for a field that can be removed from a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value as it is.
    #[default]
    Unchanged,
    /// Remove the field from the record.
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool { matches!(self, Self::Unchanged) }

    /// Applies the update to `slot`.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Self::Unchanged => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => value.serialize(serializer),
            Self::Unchanged | Self::Clear => serializer.serialize_none(),
        }
    }
}

/// Partial update of one record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(rename = "dueDate", skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub due_date: FieldUpdate<String>,
    /// First field (in text, completed, dueDate order) whose raw value had the
    /// wrong type. Reported by [`TodoPatch::validate`], not at parse time, so a
    /// missing record is still reported as not found.
    #[serde(skip)]
    pub malformed: Option<MalformedField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedField { Text, Completed, DueDate }

impl MalformedField {
    pub fn message(self) -> &'static str {
        match self {
            Self::Text => TEXT_CANNOT_BE_EMPTY,
            Self::Completed => COMPLETED_MUST_BE_BOOLEAN,
            Self::DueDate => DUE_DATE_MUST_BE_STRING,
        }
    }
}

impl TodoPatch {
    pub fn text(text: impl Into<String>) -> Self { Self { text: Some(text.into()), ..Self::default() } }

    pub fn completed(completed: bool) -> Self { Self { completed: Some(completed), ..Self::default() } }

    pub fn due_date(due_date: FieldUpdate<String>) -> Self { Self { due_date, ..Self::default() } }

    /// Checks every field and returns the patch in applicable form. Nothing is
    /// applied when this fails, so a rejected patch never half-updates a record.
    pub fn validate(self) -> Result<ValidPatch, TodoError> {
        if self.malformed == Some(MalformedField::Text) {
            return Err(TodoError::Validation(TEXT_CANNOT_BE_EMPTY.to_string()));
        }
        let text = match self.text {
            Some(raw) => Some(normalize_text(&raw, TEXT_CANNOT_BE_EMPTY)?),
            None => None,
        };
        if let Some(field) = self.malformed {
            return Err(TodoError::Validation(field.message().to_string()));
        }
        Ok(ValidPatch { text, completed: self.completed, due_date: self.due_date })
    }
}

/// A [`TodoPatch`] whose fields have all passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPatch {
    text: Option<String>,
    completed: Option<bool>,
    due_date: FieldUpdate<String>,
}

impl ValidPatch {
    pub fn apply(self, todo: &mut Todo) {
        if let Some(text) = self.text { todo.text = text; }
        if let Some(completed) = self.completed { todo.completed = completed; }
        self.due_date.apply_to(&mut todo.due_date);
    }
}

pub const TEXT_REQUIRED: &str = "text required";
pub const TEXT_CANNOT_BE_EMPTY: &str = "text cannot be empty";
pub const COMPLETED_MUST_BE_BOOLEAN: &str = "completed must be boolean";
pub const DUE_DATE_MUST_BE_STRING: &str = "dueDate must be a string or null";

/// Trims `raw`; whitespace-only text is rejected with `message`.
pub fn normalize_text(raw: &str, message: &str) -> Result<String, TodoError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}
