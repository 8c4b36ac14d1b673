// src/github/fetch.rs
// =============================================================================
// This module fetches a user's public gists from the GitHub REST API.
//
// Strategy:
// - One GET to {api}/users/{username}/gists (newest first, per the API)
// - Optional bearer token for the higher authenticated rate limit
// - Up to 3 attempts, through retry::with_backoff:
//     403 (rate limited)        -> wait 60s and retry; give up with no gists
//     timeout / transport error -> wait 10s and retry; give up with an error
//     404 (unknown user)        -> no gists, no retry
//     anything else non-2xx     -> error, no retry
// - Private gists are dropped and only the first `limit` are kept
// =============================================================================

use crate::error::FetchError;
use crate::github::GistRecord;
use crate::retry;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Timeouts and retry budget for the fetch
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub max_attempts: u32,
    /// Wait after a 403
    pub rate_limit_wait: Duration,
    /// Wait after a timeout or transport error
    pub network_wait: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_wait: Duration::from_secs(60),
            network_wait: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct GistFetcher {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    settings: FetchSettings,
}

impl GistFetcher {
    // Builds the client and the endpoint URL up front, so a bad --api-url
    // fails before any network traffic
    pub fn new(
        api_url: &str,
        username: &str,
        token: Option<String>,
        settings: FetchSettings,
    ) -> Result<Self, FetchError> {
        let endpoint = gists_endpoint(api_url, username)?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        // An empty GITHUB_TOKEN is the same as no token at all
        let token = token.filter(|t| !t.trim().is_empty());

        Ok(Self {
            client,
            endpoint,
            token,
            settings,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns up to `limit` public gists in API order.
    ///
    /// Only transport failures that survive every retry (and unexpected HTTP
    /// statuses) come back as errors. A missing user or a rate limit that
    /// never lifts yields an empty list.
    pub async fn fetch(&self, limit: usize) -> Result<Vec<GistRecord>, FetchError> {
        let outcome = retry::with_backoff(
            self.settings.max_attempts,
            |attempt| self.request(attempt),
            |error| self.backoff_for(error),
        )
        .await;

        match outcome {
            Ok(items) => Ok(select_public(items, limit)),
            Err(FetchError::RateLimited { remaining, reset }) => {
                warn!(
                    %remaining,
                    %reset,
                    attempts = self.settings.max_attempts,
                    "still rate limited after the last attempt, continuing without gists"
                );
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }

    // One HTTP round trip. Returns the raw JSON items of the response.
    async fn request(&self, attempt: u32) -> Result<Vec<Value>, FetchError> {
        debug!(attempt, url = %self.endpoint, "requesting gists");

        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(API_VERSION_HEADER, API_VERSION);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        read_response(response).await
    }

    fn backoff_for(&self, error: &FetchError) -> Option<Duration> {
        match error {
            FetchError::RateLimited { .. } => Some(self.settings.rate_limit_wait),
            FetchError::Network(_) => Some(self.settings.network_wait),
            _ => None,
        }
    }
}

// Turns one response into JSON items, or an error the retry loop can classify
async fn read_response(response: reqwest::Response) -> Result<Vec<Value>, FetchError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        warn!("GitHub returned 404, the user does not exist or has no gists endpoint");
        return Ok(Vec::new());
    }

    if status == StatusCode::FORBIDDEN {
        return Err(rate_limited(response.headers()));
    }

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(other) => {
            warn!(kind = json_kind(&other), "expected a JSON array of gists, ignoring payload");
            Ok(Vec::new())
        }
        Err(e) => {
            warn!(error = %e, "response body is not valid JSON, ignoring payload");
            Ok(Vec::new())
        }
    }
}

// Reads the rate-limit headers for the diagnostic
fn rate_limited(headers: &HeaderMap) -> FetchError {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    };

    let remaining = header("x-ratelimit-remaining");
    let limit = header("x-ratelimit-limit");
    let reset = describe_reset(&header("x-ratelimit-reset"));

    warn!(%remaining, %limit, %reset, "GitHub rate limit hit (HTTP 403)");

    FetchError::RateLimited { remaining, reset }
}

// x-ratelimit-reset is a unix timestamp; show it as a date when we can
fn describe_reset(raw: &str) -> String {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| raw.to_string())
}

// Drops private gists, decodes the rest and keeps the first `limit`.
// A gist that does not decode is skipped and does not use up a slot.
fn select_public(items: Vec<Value>, limit: usize) -> Vec<GistRecord> {
    let total = items.len();

    let gists: Vec<GistRecord> = items
        .into_iter()
        .filter(|item| item.get("public").and_then(Value::as_bool).unwrap_or(true))
        .filter_map(|item| match serde_json::from_value::<GistRecord>(item) {
            Ok(gist) => Some(gist),
            Err(e) => {
                warn!(error = %e, "skipping gist that could not be decoded");
                None
            }
        })
        // Iterators are lazy: decoding stops as soon as `limit` gists are kept
        .take(limit)
        .collect();

    info!(received = total, kept = gists.len(), "gists selected");
    gists
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Builds {api_url}/users/{username}/gists. The username is pushed as a
// single path segment, so it gets percent-encoded instead of adding paths.
fn gists_endpoint(api_url: &str, username: &str) -> Result<Url, FetchError> {
    let invalid = |reason: &str| FetchError::InvalidEndpoint {
        url: api_url.to_string(),
        reason: reason.to_string(),
    };

    if username.trim().is_empty() {
        return Err(invalid("username is empty"));
    }

    let mut url = Url::parse(api_url).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }

    url.path_segments_mut()
        .map_err(|_| invalid("url cannot be a base"))?
        .pop_if_empty()
        .extend(["users", username, "gists"]);

    Ok(url)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is 403 treated as a rate limit?
//    - For unauthenticated calls GitHub answers 403 once the 60 req/hour
//      budget is spent, with x-ratelimit-remaining: 0
//    - Setting GITHUB_TOKEN raises that budget considerably
//
// 2. Why return an empty list instead of an error on 403/404?
//    - The README job should not fail the whole workflow because GitHub is
//      throttling us; the list just renders its empty state
//    - Transport failures are different: something is wrong with the runner
//      or the network, so they surface as an error and a non-zero exit
// -----------------------------------------------------------------------------
