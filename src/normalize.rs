//! Cleanup rules for text exported by the reader.
//!
//! Everything here is pure: no I/O, same input gives the same output.

use regex::Regex;
use std::sync::LazyLock;

/// Path prefix of every book stored on the device's internal storage.
pub const DEVICE_PATH_PREFIX: &str = "file:///mnt/onboard/";

/// Marker the device appends to highlights made from a dog-eared page.
pub const DOGEAR_MARKER: &str = "dogear";

// Checked in order, the longer one first.
const BOOK_SUFFIXES: [&str; 2] = [".kepub.epub", ".epub"];

static LEADING_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.\s]+").expect("leading numbering pattern is valid"));

/// Cleans a highlight text or annotation.
///
/// Returns `None` when nothing but whitespace, numbering or the dog-ear marker
/// is left.
pub fn clean(text: Option<&str>) -> Option<String> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    let text = LEADING_NUMBERING.replace(text, "");
    let text = text.strip_suffix(DOGEAR_MARKER).unwrap_or(&*text).trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Turns a raw volume identifier such as
/// `file:///mnt/onboard/Author_Name/Book_Title.kepub.epub` into a display title.
///
/// For `author/title` paths the title segment wins. Deeper paths also yield only
/// the second segment.
pub fn format_source(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let path = raw.strip_prefix(DEVICE_PATH_PREFIX).unwrap_or(raw);
    let path = BOOK_SUFFIXES
        .iter()
        .find_map(|suffix| path.strip_suffix(suffix))
        .unwrap_or(path);
    let path = path.replace('_', " ");

    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() > 1 {
        Some(segments[1].to_string())
    } else {
        Some(path)
    }
}
