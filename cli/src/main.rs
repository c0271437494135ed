use anyhow::{Context, Result};
use clap::Parser;
use explorer_orchestrator::ExplorerContext;
use tracing::info;

mod app;
mod attachments;
mod cli;
mod config;
mod logging;
mod output;

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = config::resolve(&args)?;
    let ctx = ExplorerContext::from_config(&config).context("Failed to initialize the explorer")?;
    info!(
        model = config.model_name(),
        vndb = config.vndb_endpoint(),
        "Explorer ready"
    );

    let attachments = args
        .attach
        .iter()
        .map(|path| attachments::load(path))
        .collect::<Result<Vec<_>>>()?;

    match &args.prompt {
        Some(prompt) => app::run_single_query(&ctx, prompt, attachments).await,
        None => app::run_interactive_chat(&ctx, attachments).await,
    }
}
