//! Text preprocessing for page extraction and response previews.

/// Maximum number of characters returned in a page preview.
pub const PREVIEW_CHARS: usize = 200;

/// Suffix appended to a preview when the page text was truncated.
pub const PREVIEW_ELLIPSIS: &str = "...";

/// Normalize raw page text into a single line suitable for speech.
///
/// Newlines and carriage returns become spaces, consecutive whitespace runs
/// collapse to a single space, and the result is trimmed.
#[must_use]
pub fn normalize_page_text(raw: &str) -> String {
    let flattened = raw.replace(['\n', '\r'], " ");
    flattened.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the preview shown to the caller when playback starts.
///
/// Counts characters, not bytes, so multi-byte text is never split inside a
/// code point.
#[must_use]
pub fn text_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{PREVIEW_ELLIPSIS}", &text[..cut]),
        None => text.to_owned(),
    }
}
