// src/main.rs
// =============================================================================
// Entry point of gist-readme.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing)
// 3. Fetch gists -> format the list -> splice it into the README
// 4. Exit with proper code (0 = updated or already up to date, 1 = any failure)
//
// Ctrl-C is raced against the whole run and reported as its own failure.
// =============================================================================

mod cli;
mod error;
mod github;
mod readme;
mod retry;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use error::ReadmeError;
use github::{FetchSettings, GistFetcher};
use readme::{UpdateOutcome, WriteMode};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    let exit_code = tokio::select! {
        result = run(cli, FetchSettings::default()) => match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("❌ Error: {:#}", e);
                1
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("⛔ Interrupted");
            1
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GIST_README_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}

// Returns the exit code; Err means a failure that main reports.
// Retry timing comes in separately so tests can run without the real waits.
async fn run(cli: Cli, settings: FetchSettings) -> Result<i32> {
    println!("🔍 Fetching public gists of {}", cli.user);

    let fetcher = GistFetcher::new(
        &cli.api_url,
        &cli.user,
        cli.token.clone(),
        settings,
    )?;

    let gists = fetcher
        .fetch(cli.count)
        .await
        .with_context(|| format!("could not fetch gists from {}", fetcher.endpoint()))?;

    println!("📄 Got {} gist(s)", gists.len());

    let block = readme::format_gists(&gists);

    let mode = if cli.dry_run {
        println!("{}", block);
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };

    let outcome = readme::update_file(&cli.readme, &block, mode)
        .await
        .map_err(|e| match e {
            ReadmeError::Markers(_) => anyhow::Error::new(e).context(format!(
                "{} needs one `{}` line followed by one `{}` line",
                cli.readme.display(),
                readme::START_MARKER,
                readme::END_MARKER
            )),
            other => other.into(),
        })?;

    match outcome {
        UpdateOutcome::Updated => println!("✅ {} updated", cli.readme.display()),
        UpdateOutcome::Unchanged => println!("✅ {} already up to date", cli.readme.display()),
        UpdateOutcome::WouldUpdate => {
            println!("📝 Dry run: {} would be updated", cli.readme.display())
        }
    }

    Ok(0)
}
