//! HTML escaping for rendered message bodies.

/// Escape HTML special characters.
///
/// Replacements run in a fixed order (`&` first) so that entities produced by
/// earlier replacements are not escaped again.
#[must_use]
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
