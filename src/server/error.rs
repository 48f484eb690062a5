//! API error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::content::ContentError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    Content(ContentError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Content(e) => match e {
                ContentError::NotFound(_) => StatusCode::NOT_FOUND,
                ContentError::Conflict(_) => StatusCode::CONFLICT,
                ContentError::Validation(_) => StatusCode::BAD_REQUEST,
                ContentError::Io(_) | ContentError::FrontMatter(_) | ContentError::Persist(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::BadRequest(_) => "validation",
            ApiError::Content(e) => e.kind(),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        ApiError::Content(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Content(e) if status.is_server_error() => {
                tracing::error!("Request failed: {}", e);
                "Internal error".to_string()
            }
            ApiError::Content(e) => e.to_string(),
        };

        (status, Json(json!({ "error": message, "kind": self.kind() }))).into_response()
    }
}
