mod api;
mod cli;
mod logging;
mod model;
mod orchestrator;
#[cfg(test)]
mod test_support;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init(&args)?;
    tracing::debug!(base_url = %args.base_url, command = ?args.command, "starting");

    cli::run(args).await
}
