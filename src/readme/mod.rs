// src/readme/mod.rs
// =============================================================================
// Everything that produces or rewrites README text.
//
// Submodules:
// - format: gists -> markdown bullet list
// - splice: put a block of text between the GIST-LIST markers
//
// update_file() ties them to the file on disk: read, splice, compare, and
// only write when something actually changed.
// =============================================================================

mod format;
mod splice;

pub use format::format_gists;
pub use splice::{splice, END_MARKER, START_MARKER};

use crate::error::ReadmeError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// What update_file did (or would have done)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The file was rewritten
    Updated,
    /// The block was already up to date; nothing written
    Unchanged,
    /// Dry run: the file differs, but was left alone
    WouldUpdate,
}

/// Whether update_file may touch the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    DryRun,
}

/// Splices `block` into the README at `path`.
///
/// Marker problems and I/O failures leave the file as it was.
pub async fn update_file(
    path: &Path,
    block: &str,
    mode: WriteMode,
) -> Result<UpdateOutcome, ReadmeError> {
    let current = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReadmeError::from_io(path, e))?;

    let updated = splice(&current, block)?;

    if updated == current {
        debug!(path = %path.display(), "README already up to date");
        return Ok(UpdateOutcome::Unchanged);
    }

    if mode == WriteMode::DryRun {
        return Ok(UpdateOutcome::WouldUpdate);
    }

    // The write runs on the blocking pool; move owned copies into it
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_contents(&target, &updated))
        .await
        .map_err(|e| ReadmeError::from_io(path, std::io::Error::other(e)))??;

    debug!(path = %path.display(), "README rewritten");
    Ok(UpdateOutcome::Updated)
}

// Writes `contents` to a temporary file next to `path`, then renames it over
// `path`. Until the rename succeeds the old file is untouched; if anything
// fails the temporary file is removed when it is dropped.
fn replace_contents(path: &Path, contents: &str) -> Result<(), ReadmeError> {
    let io_error = |e: std::io::Error| ReadmeError::from_io(path, e);

    // "README.md" has an empty parent, which means the current directory
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Keep the README's mode; temp files are created owner-only
    let permissions = std::fs::metadata(path).map_err(io_error)?.permissions();

    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(contents.as_bytes()).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.as_file().set_permissions(permissions).map_err(io_error)?;

    temp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why compare before writing?
//    - The tool usually runs on a schedule (e.g. a GitHub Actions cron)
//    - If the list did not change, rewriting the file would still bump its
//      modification time, and a workflow that commits the README would
//      create an empty commit
//    - Comparing the spliced text with the current text makes the run
//      idempotent: same gists in, no write, exit code 0
//
// 2. Why a temporary file and a rename instead of fs::write?
//    - fs::write truncates the file first and then writes the new bytes
//    - A full disk, or Ctrl-C in between, would leave a half-written README
//    - rename() replaces the file in one step: readers see either the old
//      README or the new one, never something in between
//
// 3. Why spawn_blocking?
//    - tempfile and std::fs block the thread; tokio wants blocking work on
//      its dedicated pool so the runtime's worker threads stay free
// -----------------------------------------------------------------------------
