// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// - gist:  the GistRecord type decoded from the API's JSON
// - fetch: the HTTP call, rate-limit handling and retries
// =============================================================================

mod fetch;
mod gist;

pub use fetch::{FetchSettings, GistFetcher, DEFAULT_API_URL};
pub use gist::GistRecord;
