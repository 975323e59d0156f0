//! 核心错误处理模块

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 错误响应结构，所有错误都序列化为 `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            CoreError::BadRequest(msg) | CoreError::NotFound(msg) => msg,
            CoreError::Database(e) => {
                error!("Database error: {}", e);
                "Database error".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(format!("Invalid request payload: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for CoreError {
    fn from(rejection: PathRejection) -> Self {
        CoreError::BadRequest(format!("Invalid product ID: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| {
                errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| "Validation error".to_string())
                })
            })
            .collect();
        messages.sort();

        CoreError::BadRequest(messages.join(", "))
    }
}
