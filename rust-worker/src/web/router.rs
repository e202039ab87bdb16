//! Router for the interaction endpoint.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::web::handlers::{interactions, not_found, AppState, INTERACTIONS_PATH};

/// Build the application router.
///
/// Every method on [`INTERACTIONS_PATH`] reaches the interaction handler.
/// Any other path is answered with an empty 404 before verification.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(INTERACTIONS_PATH, any(interactions))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into an empty 500.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "interaction_handler_panicked");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
