//! Web server module for the Discord interaction endpoint.
//!
//! This module provides a single authenticated endpoint that:
//! - Rejects requests on any path but `/`
//! - Rejects callers that do not identify as Discord
//! - Verifies the Ed25519 request signature
//! - Answers liveness pings
//!
//! Failures are answered with a bare status code.

pub mod error;
pub mod handlers;
pub mod router;
pub mod signature;

pub use error::WebhookError;
pub use handlers::{
    interactions, not_found, AppState, InteractionPayload, InteractionResponse, InteractionType,
    INTERACTIONS_PATH, JSON_CONTENT_TYPE,
};
pub use router::build_router;
pub use signature::{
    is_timestamp_fresh, signed_message, verify_interaction_signature, KeyError, PublicKey,
    SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
