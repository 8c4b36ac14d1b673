// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Every option has a default, so a plain `gist-readme` run inside the
// profile repository does the whole job:
//   fetch the latest 5 public gists of the default user and rewrite README.md
// =============================================================================

use crate::github::DEFAULT_API_URL;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_USER: &str = "weskerty";
pub const DEFAULT_COUNT: usize = 5;
pub const DEFAULT_README: &str = "README.md";

#[derive(Parser, Debug)]
#[command(
    name = "gist-readme",
    version,
    about = "Writes a list of your latest public gists into your README",
    long_about = "gist-readme fetches the most recent public gists of a GitHub user and \
                  replaces the section between <!-- GIST-LIST:START --> and \
                  <!-- GIST-LIST:END --> in a README. The file is only written when the \
                  list actually changed, which makes it safe to run on a schedule."
)]
pub struct Cli {
    /// GitHub user whose gists are listed
    #[arg(long, default_value = DEFAULT_USER, value_parser = non_empty)]
    pub user: String,

    /// How many gists to list
    #[arg(long, default_value_t = DEFAULT_COUNT, value_parser = at_least_one)]
    pub count: usize,

    /// README file to update
    #[arg(long, default_value = DEFAULT_README)]
    pub readme: PathBuf,

    /// API token, raises the rate limit (never printed)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API (for GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Print the rendered list instead of writing the README
    #[arg(long)]
    pub dry_run: bool,

    /// Log debug output (GIST_README_LOG overrides)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn at_least_one(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
