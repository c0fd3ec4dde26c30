//! CLI for the create-discussion action.
//!
//! Renders a discussion template and opens a GitHub Discussion from it. Every
//! flag falls back to the environment variable GitHub Actions sets for it.

use clap::Parser;
use create_discussion::{error_annotation, CreatedDiscussion, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Create Discussion - Open a GitHub Discussion from a Markdown template.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Name of the discussion category to file the discussion under.
    #[arg(long, env = "INPUT_CATEGORY")]
    category: String,

    /// Path to the discussion template.
    #[arg(long, env = "INPUT_FILENAME")]
    filename: Option<PathBuf>,

    /// Repository in `owner/name` form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// GitHub API base URI (for GitHub Enterprise Server).
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// GitHub GraphQL endpoint (for GitHub Enterprise Server).
    #[arg(long, env = "GITHUB_GRAPHQL_URL")]
    graphql_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Both ring and aws-lc-rs may be compiled in; pick one before any TLS use
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(discussion) => {
            info!(number = discussion.number, url = %discussion.url, "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !e.is_logged() {
                error!(error = %e, "Action failed");
            }
            println!("{}", error_annotation(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
/// - Output on stderr, leaving stdout to workflow commands and step outputs
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<CreatedDiscussion, RunnerError> {
    let config = RunnerConfig::from_env(args.filename, args.category, &args.repository, args.token)?
        .with_api_url(args.api_url)
        .with_graphql_url(args.graphql_url);
    let runner = Runner::new(config)?;
    runner.run().await
}
