//! Caller identity prefilter based on the `User-Agent` header.

/// Check whether a request claims to come from the expected caller.
///
/// This is a coarse allow-list, not an authentication step: the match is a
/// case-sensitive prefix test, and a missing or non-ASCII header never matches.
pub fn is_expected_caller(user_agent: Option<&str>, expected_prefix: &str) -> bool {
    match user_agent {
        Some(agent) => agent.starts_with(expected_prefix),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expected_caller_prefix_match() {
        assert!(is_expected_caller(
            Some("Discord-Interactions/1.0 (+https://discord.com)"),
            "Discord"
        ));
        assert!(is_expected_caller(Some("Discord"), "Discord"));
    }

    #[test]
    fn test_is_expected_caller_mismatch() {
        assert!(!is_expected_caller(Some("curl/7.0"), "Discord"));
        assert!(!is_expected_caller(Some("Mozilla/5.0 Discord"), "Discord"));
    }

    #[test]
    fn test_is_expected_caller_case_sensitive() {
        assert!(!is_expected_caller(Some("discord-bot"), "Discord"));
    }

    #[test]
    fn test_is_expected_caller_missing_header() {
        assert!(!is_expected_caller(None, "Discord"));
        assert!(!is_expected_caller(None, ""));
    }
}
