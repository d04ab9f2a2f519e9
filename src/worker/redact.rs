//! Log redaction
//!
//! Worker lines carrying the configuration the windows submitted must not
//! end up in the host's logs. Detection is a plain substring match on the
//! serialized message type, not a parse of the line.

/// Substrings marking a line as configuration-bearing
pub const CONFIG_MARKERS: &[&str] = &["\"type\": \"config\"", "\"type\": \"running_config\""];

/// Text handed to the logging collaborator in place of a redacted line
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED SENSITIVE DATA]";

/// Whether a line contains any configuration marker
pub fn contains_config_marker(text: &str) -> bool {
    CONFIG_MARKERS.iter().any(|marker| text.contains(marker))
}

/// The form of `text` that may be written to logs
pub fn for_log(text: &str) -> &str {
    if contains_config_marker(text) {
        REDACTED_PLACEHOLDER
    } else {
        text
    }
}
