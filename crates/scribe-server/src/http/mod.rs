mod routes;

pub use routes::create_router;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scribe_core::{Scribe, ScribeError};
use serde::Serialize;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scribe: Arc<Scribe>,
    pub start_time: std::time::Instant,
}

/// JSON response wrapper
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> JsonResponse<()> {
        JsonResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Custom error type for HTTP handlers.
///
/// Rejected calls (bad input) map to 400, missing records to 404;
/// everything else is a 500.
pub struct AppError(ScribeError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ScribeError::InvalidInput(_) | ScribeError::Validation(_) => StatusCode::BAD_REQUEST,
            ScribeError::SessionNotFound(_)
            | ScribeError::MessageNotFound(_)
            | ScribeError::ChatMessageNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(JsonResponse::<()>::err(self.0.to_string()))).into_response()
    }
}

impl From<ScribeError> for AppError {
    fn from(err: ScribeError) -> Self {
        Self(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
