//! Interaction endpoint handlers.
//!
//! A request passes through a fixed pipeline and is answered exactly once:
//! 1. Caller identity prefilter on `User-Agent`
//! 2. Ed25519 signature verification over the buffered body
//! 3. JSON dispatch on the interaction `type`
//!
//! Path routing happens before any of this in the router.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::util::is_expected_caller;
use crate::web::error::WebhookError;
use crate::web::signature::{verify_interaction_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::Config;

/// The single path interactions are accepted on.
pub const INTERACTIONS_PATH: &str = "/";

/// Content type sent with interaction responses.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Payload Types
// =============================================================================

/// Inbound interaction, parsed only after the signature checks out.
///
/// Only the `type` discriminator is needed; other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type")]
    pub kind: i64,
}

/// Interaction types this endpoint distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    /// Liveness check sent when the endpoint is registered
    Ping,
    /// Anything else, which this endpoint does not handle
    Other(i64),
}

impl From<i64> for InteractionType {
    fn from(kind: i64) -> Self {
        match kind {
            1 => InteractionType::Ping,
            other => InteractionType::Other(other),
        }
    }
}

/// Interaction response body.
#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: i64,
}

impl InteractionResponse {
    /// Reply to a ping.
    pub fn pong() -> Self {
        Self { kind: 1 }
    }
}

// =============================================================================
// Interaction Endpoint
// =============================================================================

/// Interaction endpoint, mounted on [`INTERACTIONS_PATH`] for every method.
///
/// The body is buffered once into `Bytes`, so the verifier and the JSON
/// parser both read the same bytes without consuming a stream.
pub async fn interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, WebhookError> {
    let user_agent = header_value(&headers, header::USER_AGENT.as_str());

    info!(
        user_agent = user_agent.unwrap_or_default(),
        has_signature = headers.contains_key(SIGNATURE_HEADER),
        has_timestamp = headers.contains_key(TIMESTAMP_HEADER),
        "interaction_received"
    );

    if !is_expected_caller(user_agent, &state.config.user_agent_prefix) {
        warn!(
            user_agent = user_agent.unwrap_or_default(),
            expected_prefix = %state.config.user_agent_prefix,
            "interaction_unexpected_caller"
        );
        return Err(WebhookError::UnexpectedCaller);
    }

    let body = body.map_err(|e| {
        warn!(error = %e, "interaction_body_unreadable");
        WebhookError::BodyUnreadable(e.to_string())
    })?;

    debug!(body = %String::from_utf8_lossy(&body), "interaction_body");

    let authentic = verify_interaction_signature(
        &state.config.public_key,
        header_value(&headers, SIGNATURE_HEADER),
        header_value(&headers, TIMESTAMP_HEADER),
        &body,
        state.config.signature_max_age,
    );

    if !authentic {
        warn!(body_length = body.len(), "interaction_unauthorized");
        return Err(WebhookError::Unauthorized);
    }

    let payload: InteractionPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "interaction_payload_malformed");
        WebhookError::from(e)
    })?;

    respond(payload)
}

/// Fallback for every path other than [`INTERACTIONS_PATH`].
pub async fn not_found(uri: Uri) -> WebhookError {
    info!(path = %uri.path(), "interaction_path_not_found");
    WebhookError::NotFound
}

/// Dispatch an authenticated interaction on its type.
fn respond(payload: InteractionPayload) -> Result<Response, WebhookError> {
    match InteractionType::from(payload.kind) {
        InteractionType::Ping => {
            info!("interaction_ping");
            json_response(&InteractionResponse::pong())
        }
        InteractionType::Other(kind) => {
            warn!(interaction_type = kind, "interaction_unhandled_type");
            Err(WebhookError::UnhandledType(kind))
        }
    }
}

fn json_response<T: Serialize>(value: &T) -> Result<Response, WebhookError> {
    let body = serde_json::to_vec(value).map_err(|e| WebhookError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
        body,
    )
        .into_response())
}

/// Read a header as text, treating empty and non-ASCII values as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::signature::{signed_message, PublicKey};
    use axum::http::HeaderValue;
    use ed25519_dalek::{Signer, SigningKey};

    const TIMESTAMP: &str = "1700000000";

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[3u8; 32])
    }

    fn test_state() -> AppState {
        AppState::new(Config::new(PublicKey::from(signing_key().verifying_key())))
    }

    fn signed_headers(body: &[u8], user_agent: &str) -> HeaderMap {
        let signature = signing_key().sign(&signed_message(TIMESTAMP, body));
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_str(user_agent).unwrap());
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&hex::encode(signature.to_bytes())).unwrap(),
        );
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static(TIMESTAMP));
        headers
    }

    async fn call(headers: HeaderMap, body: &'static [u8]) -> Response {
        interactions(State(test_state()), headers, Ok(Bytes::from_static(body)))
            .await
            .into_response()
    }

    #[test]
    fn test_interaction_type_from_i64() {
        assert_eq!(InteractionType::from(1), InteractionType::Ping);
        assert_eq!(InteractionType::from(2), InteractionType::Other(2));
        assert_eq!(InteractionType::from(-1), InteractionType::Other(-1));
    }

    #[test]
    fn test_payload_ignores_extra_fields() {
        let payload: InteractionPayload =
            serde_json::from_str(r#"{"type": 1, "id": "123", "application_id": "456"}"#).unwrap();
        assert_eq!(payload.kind, 1);
    }

    #[test]
    fn test_payload_requires_integer_type() {
        assert!(serde_json::from_str::<InteractionPayload>(r#"{"id": "123"}"#).is_err());
        assert!(serde_json::from_str::<InteractionPayload>(r#"{"type": "1"}"#).is_err());
    }

    #[test]
    fn test_pong_serialization() {
        let json = serde_json::to_string(&InteractionResponse::pong()).unwrap();
        assert_eq!(json, r#"{"type":1}"#);
    }

    #[test]
    fn test_header_value_treats_empty_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static(""));
        assert_eq!(header_value(&headers, TIMESTAMP_HEADER), None);
        assert_eq!(header_value(&headers, SIGNATURE_HEADER), None);
    }

    #[tokio::test]
    async fn test_ping_returns_pong() {
        let body = br#"{"type":1}"#;
        let response = call(signed_headers(body, "Discord-Interactions/1.0"), body).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"type":1}"#);
    }

    #[tokio::test]
    async fn test_unexpected_caller_rejected_before_verification() {
        let body = br#"{"type":1}"#;
        let mut headers = signed_headers(body, "curl/7.0");
        headers.remove(SIGNATURE_HEADER);
        let response = call(headers, body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_user_agent_rejected() {
        let body = br#"{"type":1}"#;
        let mut headers = signed_headers(body, "Discord");
        headers.remove(header::USER_AGENT);
        let response = call(headers, body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_signature_unauthorized() {
        let body = br#"{"type":1}"#;
        let mut headers = signed_headers(body, "Discord");
        headers.remove(SIGNATURE_HEADER);
        let response = call(headers, body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unhandled_type_is_internal_error() {
        let body = br#"{"type":2}"#;
        let response = call(signed_headers(body, "Discord"), body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_signed_invalid_json_is_internal_error() {
        let body = b"not json";
        let response = call(signed_headers(body, "Discord"), body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
