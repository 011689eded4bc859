/*!
 * Content sanitization for document embedding
 */

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

// Control characters that are illegal in document markup text. Tab, LF and
// CR are kept; everything else in C0, DEL and C1 is stripped.
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\u{9F}]").unwrap());

/// Strip NUL bytes and control characters from text.
///
/// Idempotent: sanitizing already-sanitized text returns it unchanged.
/// Must run over both tree text and file contents before either reaches
/// an exporter.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    CONTROL_CHARS.replace_all(text, "")
}
