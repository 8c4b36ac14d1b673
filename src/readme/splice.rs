// src/readme/splice.rs
// =============================================================================
// Replaces the text between the two sentinel comments in a README:
//
//   <!-- GIST-LIST:START -->
//   ...anything here is replaced...
//   <!-- GIST-LIST:END -->
//
// Both markers must appear exactly once, START before END. Otherwise nothing
// is changed and the caller gets a SpliceError.
// =============================================================================

use crate::error::SpliceError;

pub const START_MARKER: &str = "<!-- GIST-LIST:START -->";
pub const END_MARKER: &str = "<!-- GIST-LIST:END -->";

/// Returns `document` with the region between the markers set to
/// `"\n" + replacement + "\n"`. The markers themselves are kept.
pub fn splice(document: &str, replacement: &str) -> Result<String, SpliceError> {
    let start = find_once(document, START_MARKER)?;
    let end = find_once(document, END_MARKER)?;

    let content_start = start + START_MARKER.len();
    if end < content_start {
        return Err(SpliceError::MarkersOutOfOrder);
    }

    let mut updated = String::with_capacity(document.len() + replacement.len());
    updated.push_str(&document[..content_start]);
    updated.push('\n');
    updated.push_str(replacement);
    updated.push('\n');
    updated.push_str(&document[end..]);
    Ok(updated)
}

// Byte offset of the only occurrence of `marker`
fn find_once(document: &str, marker: &'static str) -> Result<usize, SpliceError> {
    let mut matches = document.match_indices(marker).map(|(index, _)| index);

    let first = matches.next().ok_or(SpliceError::MissingMarker(marker))?;
    if matches.next().is_some() {
        return Err(SpliceError::DuplicateMarker(marker));
    }
    Ok(first)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why refuse duplicate markers instead of using the first pair?
//    - Two START markers usually mean a copy/paste accident in the README
//    - Guessing which pair is meant could overwrite hand-written text, so
//      the run fails and the file stays as it is
//
// 2. Why byte offsets from match_indices?
//    - The markers are ASCII, so every match starts and ends on a char
//      boundary and slicing `document[..content_start]` cannot panic
// -----------------------------------------------------------------------------
