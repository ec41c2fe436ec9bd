use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::application::AppError;
use crate::domain::InvalidDeviceState;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    InvalidState(#[from] InvalidDeviceState),

    #[error("{0}")]
    InvalidPaging(String),

    #[error(transparent)]
    App(#[from] AppError),
}

/// Problem-details style error body.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    fn status_and_title(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidState(_) => (StatusCode::BAD_REQUEST, "Invalid state"),
            ApiError::InvalidPaging(_) => (StatusCode::BAD_REQUEST, "Invalid paging"),
            ApiError::App(AppError::DeviceInUse(_)) => (StatusCode::BAD_REQUEST, "Device in use"),
            ApiError::App(AppError::NotFound(_)) => (StatusCode::NOT_FOUND, "Not found"),
            ApiError::App(AppError::Unknown(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title) = self.status_and_title();

        // Internal details stay in the logs
        let detail = if status.is_server_error() {
            tracing::error!("Unhandled error: {:#}", self);
            None
        } else {
            Some(self.to_string())
        };

        let body = ProblemDetails {
            title: title.to_string(),
            status: status.as_u16(),
            detail,
        };
        (status, Json(body)).into_response()
    }
}
