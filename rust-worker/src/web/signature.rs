//! Discord interaction signature verification.
//!
//! Discord signs every interaction request with Ed25519. The signed message is
//! the `X-Signature-Timestamp` header value followed by the raw request body,
//! and the detached signature arrives hex-encoded in `X-Signature-Ed25519`.
//! Reference: https://discord.com/developers/docs/interactions/overview#setting-up-an-endpoint-validating-security-request-headers

use std::time::{SystemTime, UNIX_EPOCH};

use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use thiserror::Error;
use tracing::warn;

use crate::util::hex_to_bytes;

/// Header carrying the hex-encoded Ed25519 signature (`X-Signature-Ed25519`).
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the decimal timestamp that prefixes the signed message
/// (`X-Signature-Timestamp`).
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Errors raised while loading the application public key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("public key must decode to {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("public key is not a valid Ed25519 point")]
    InvalidPoint,
}

/// The application's Ed25519 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Decode a key from its hex representation.
    ///
    /// Malformed hex decodes short and is reported as a length error.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        Self::from_bytes(&hex_to_bytes(hex.trim()))
    }

    /// Build a key from raw bytes, which must be exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            })?;

        VerifyingKey::from_bytes(&bytes)
            .map(Self)
            .map_err(|_| KeyError::InvalidPoint)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.0.as_bytes()
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key)
    }
}

/// Reconstruct the exact bytes Discord signed: timestamp followed by body.
pub fn signed_message(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    message
}

/// Verify a Discord interaction signature.
///
/// # Arguments
///
/// * `public_key` - The application's public key
/// * `signature` - The `X-Signature-Ed25519` header value, if present
/// * `timestamp` - The `X-Signature-Timestamp` header value, if present
/// * `body` - The raw request body, exactly as received
/// * `max_age_seconds` - Optional replay window for the timestamp
///
/// # Returns
///
/// `true` only if both headers are present and non-empty, the timestamp is
/// within the replay window (when one is configured), and the signature
/// verifies over `timestamp || body`. Every other outcome is `false`.
pub fn verify_interaction_signature(
    public_key: &PublicKey,
    signature: Option<&str>,
    timestamp: Option<&str>,
    body: &[u8],
    max_age_seconds: Option<u64>,
) -> bool {
    let (signature, timestamp) = match (signature, timestamp) {
        (Some(sig), Some(ts)) if !sig.is_empty() && !ts.is_empty() => (sig, ts),
        _ => {
            warn!(
                has_signature = signature.is_some_and(|s| !s.is_empty()),
                has_timestamp = timestamp.is_some_and(|t| !t.is_empty()),
                "interaction_signature_missing_headers"
            );
            return false;
        }
    };

    if let Some(max_age) = max_age_seconds {
        if !is_timestamp_fresh(timestamp, max_age) {
            return false;
        }
    }

    let signature_bytes = hex_to_bytes(signature);
    let signature_bytes: [u8; SIGNATURE_LENGTH] = match signature_bytes.as_slice().try_into() {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(
                expected_length = SIGNATURE_LENGTH,
                actual_length = signature_bytes.len(),
                "interaction_signature_malformed"
            );
            return false;
        }
    };

    let message = signed_message(timestamp, body);

    match public_key
        .0
        .verify_strict(&message, &Signature::from_bytes(&signature_bytes))
    {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "interaction_signature_mismatch");
            false
        }
    }
}

/// Check that a decimal Unix timestamp is within `max_age_seconds` of now.
pub fn is_timestamp_fresh(timestamp: &str, max_age_seconds: u64) -> bool {
    let signed_at: u64 = match timestamp.parse() {
        Ok(t) => t,
        Err(_) => {
            warn!(timestamp = %timestamp, "interaction_signature_invalid_timestamp");
            return false;
        }
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let age = now.abs_diff(signed_at);
    if age > max_age_seconds {
        warn!(
            signed_at = signed_at,
            current_time = now,
            age_seconds = age,
            max_age_seconds = max_age_seconds,
            "interaction_signature_stale"
        );
        return false;
    }

    true
}
