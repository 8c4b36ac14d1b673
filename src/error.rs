// src/error.rs
// =============================================================================
// Error types for every stage of the pipeline.
//
// main.rs works with anyhow::Result, but the stages underneath return these
// typed errors so the driver (and the tests) can tell the failure categories
// apart:
// - FetchError: talking to the GitHub API
// - FormatError: a single gist that cannot be rendered (skipped, never fatal)
// - SpliceError: the README markers are missing or malformed
// - ReadmeError: reading/writing the README file
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching gists.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or timeout (still failing after every retry).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// GitHub answered 403, which for this endpoint means rate limited.
    #[error("rate limited by GitHub (remaining: {remaining}, reset: {reset})")]
    RateLimited {
        /// Value of the `x-ratelimit-remaining` header, or "unknown".
        remaining: String,
        /// Value of the `x-ratelimit-reset` header, or "unknown".
        reset: String,
    },

    /// Any other non-success status. Not retried.
    #[error("GitHub API returned HTTP {status}")]
    Status { status: u16 },

    /// The configured API base URL cannot be used to build the endpoint.
    #[error("invalid API url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// A gist record that cannot be turned into a markdown line.
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("gist url '{url}' is not a usable link: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Problems with the sentinel markers in the README text.
#[derive(Debug, Error, PartialEq)]
pub enum SpliceError {
    #[error("marker '{0}' not found")]
    MissingMarker(&'static str),

    #[error("marker '{0}' appears more than once")]
    DuplicateMarker(&'static str),

    #[error("end marker appears before the start marker")]
    MarkersOutOfOrder,
}

/// Errors raised while updating the README file.
#[derive(Debug, Error)]
pub enum ReadmeError {
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot update README: {0}")]
    Markers(#[from] SpliceError),
}

impl ReadmeError {
    /// Maps an io::Error to NotFound or Io depending on its kind
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReadmeError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReadmeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ReadmeError::from_io(Path::new("README.md"), io);
        assert!(matches!(err, ReadmeError::NotFound { .. }));
        assert_eq!(err.to_string(), "README.md not found");
    }

    #[test]
    fn test_other_io_errors_stay_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = ReadmeError::from_io(Path::new("README.md"), io);
        assert!(matches!(err, ReadmeError::Io { .. }));
    }
}
