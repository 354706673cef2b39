//! Query-string serialization for thumbnail requests.
//!
//! The thumbnail service ignores parameters it does not know, but empty
//! values change the URL text and defeat transport-level caching. This module
//! serializes an ordered option→value mapping into a query string, omitting
//! any pair whose value is empty, so that identical option sets always yield
//! identical query strings.

/// Serialize ordered key/value pairs into a query string.
///
/// Pairs with an empty value are omitted entirely. Values are
/// percent-encoded; keys are expected to be plain ASCII identifiers.
///
/// Returns an empty string when no pair survives.
pub fn serialize(pairs: &[(&str, String)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    parts.join("&")
}

// =============================================================================
// Tests
// =============================================================================
