//! Discord interactions endpoint.
//!
//! A single signature-verified webhook that Discord calls with interaction
//! payloads. Only liveness pings are answered; every other request is
//! rejected with a bare status code.
//!
//! ## Request Pipeline
//!
//! ```text
//! path check → User-Agent prefilter → Ed25519 verification → type dispatch
//! ```

pub mod config;
pub mod util;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use web::{build_router, AppState, PublicKey, WebhookError};
