//! Small helpers shared by the web layer.

pub mod hex_codec;
pub mod user_agent;

pub use hex_codec::hex_to_bytes;
pub use user_agent::is_expected_caller;
