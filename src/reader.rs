/*!
 * Encoding-tolerant file reading
 */

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::sanitize::sanitize;

/// Candidate encodings, tried in order with strict decoding
static ENCODINGS: &[&Encoding] = &[UTF_8, WINDOWS_1252];

/// Placeholder emitted when no candidate encoding decodes the file
pub const UNDECODABLE: &str = "[Error: unable to decode file with supported encodings]";

/// Read a file's content, trying each candidate encoding in order.
///
/// Returns sanitized text from the first encoding that decodes the bytes
/// without error. Decode and I/O failures are downgraded to diagnostic
/// placeholder strings; this function never fails.
pub fn read_file_content(path: &Path) -> String {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return format!("[Error reading file: {}]", e),
    };

    // A UTF-8 BOM is stripped up front so the strict decoders below never
    // see it as content.
    let bytes = bytes
        .strip_prefix("\u{feff}".as_bytes())
        .unwrap_or(&bytes[..]);

    for &encoding in ENCODINGS {
        if let Some(text) = decode_strict(encoding, bytes) {
            return sanitize(&text).into_owned();
        }
    }

    UNDECODABLE.to_string()
}

// Bytes with no assigned character in Windows-1252. The WHATWG decoder
// maps them to C1 controls instead of failing, so strictness has to be
// enforced here.
const CP1252_UNASSIGNED: [u8; 5] = [0x81, 0x8d, 0x8f, 0x90, 0x9d];

fn decode_strict<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<std::borrow::Cow<'a, str>> {
    if encoding == WINDOWS_1252 && bytes.iter().any(|b| CP1252_UNASSIGNED.contains(b)) {
        return None;
    }
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}
