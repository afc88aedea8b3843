use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    integrations::github::{GithubTracker, IssueTracker},
    models::{BatchRequest, BatchResult},
    settings::Settings,
};

mod batch_file;
mod creator;
mod error;
mod integrations;
mod models;
mod report;
mod settings;

/// Create a predefined batch of GitHub issues
#[derive(Parser, Debug)]
#[command(name = "issuebatch", version)]
struct Cli {
    /// Batch definition file (overrides batch.path)
    #[arg(long)]
    batch: Option<String>,
    /// Target repository as owner/name (overrides github.repo)
    #[arg(long)]
    repo: Option<String>,
}

impl Cli {
    fn apply(self, settings: &mut Settings) {
        if let Some(batch) = self.batch {
            settings.batch.path = batch;
        }
        if let Some(repo) = self.repo {
            settings.github.repo = repo;
        }
    }
}

async fn run<T: IssueTracker + ?Sized>(tracker: &T, request: &BatchRequest) -> BatchResult {
    info!(
        "Creating {} issues in {}",
        request.payloads.len(),
        request.collection
    );
    creator::create_all(tracker, &request.collection, &request.payloads).await
}

fn exit_status(result: &BatchResult) -> u8 {
    if result.all_succeeded() {
        0
    } else {
        1
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::new().context("Failed to load settings")?;
    Cli::parse().apply(&mut settings);

    let request = BatchRequest::from_settings(&settings)?;
    let tracker = GithubTracker::new(&request.credential, &settings.github.api_base)
        .context("Failed to build GitHub client")?;

    let result = run(&tracker, &request).await;
    print!("{}", report::render(&request.collection, &result));

    Ok(ExitCode::from(exit_status(&result)))
}
