//! Request failures and their HTTP mapping.
//!
//! Every failure is answered with a bare status code. Bodies stay empty so a
//! caller cannot learn which step of the pipeline rejected the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("no interaction endpoint at this path")]
    NotFound,

    #[error("request did not come from the expected caller")]
    UnexpectedCaller,

    #[error("request signature could not be verified")]
    Unauthorized,

    #[error("unhandled interaction type {0}")]
    UnhandledType(i64),

    #[error("malformed interaction payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("request body could not be read: {0}")]
    BodyUnreadable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::NotFound => StatusCode::NOT_FOUND,
            WebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebhookError::UnexpectedCaller
            | WebhookError::UnhandledType(_)
            | WebhookError::MalformedPayload(_)
            | WebhookError::BodyUnreadable(_)
            | WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}
