// src/github/gist.rs
// =============================================================================
// The shape of a gist as returned by GET /users/{user}/gists.
//
// We only model the fields we render. serde ignores everything else the API
// sends back (owner, forks, comments, ...).
// =============================================================================

use serde::Deserialize;
use std::collections::BTreeMap;

/// One gist from the GitHub API
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GistRecord {
    /// Free text; GitHub sends null (or "") when the author left it empty
    #[serde(default)]
    pub description: Option<String>,

    /// Link to the gist page on gist.github.com
    #[serde(rename = "html_url")]
    pub url: String,

    /// ISO-8601 timestamp, kept raw so a malformed value can still be rendered
    pub created_at: String,

    /// Filename -> file metadata, iterated in filename order
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GistFile {
    #[serde(default)]
    pub language: Option<String>,
}

impl GistRecord {
    /// Language declared by the first file, if any
    pub fn primary_language(&self) -> Option<&str> {
        self.files
            .values()
            .next()
            .and_then(|file| file.language.as_deref())
            .filter(|language| !language.trim().is_empty())
    }
}
