use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::error::TodoError;

/// Message returned for any failure whose detail must stay on the server.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// `{ "error": "<message>" }` body used by the todo endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody { pub error: String }

/// `{ "error": { "code": 404, "message": "Not Found" } }` body for unmatched routes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteErrorBody { pub error: RouteError }

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteError { pub code: u16, pub message: String }

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::Validation(message) => Self::BadRequest(message),
            TodoError::NotFound(_) => Self::NotFound("Todo not found".into()),
            TodoError::Internal(detail) => Self::Internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::BadRequest(message) | Self::NotFound(message) => message,
            Self::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };
        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}

pub async fn not_found() -> Response {
    let body = RouteErrorBody { error: RouteError { code: 404, message: "Not Found".into() } };
    (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
}
