use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Project not found: {0}")]
    ProjectNotFound(i32),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(i32),

    #[error("Id mismatch: path {path}, body {body}")]
    IdMismatch { path: i32, body: i32 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::ProjectNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::EmployeeNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::IdMismatch { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
