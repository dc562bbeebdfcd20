//! snippetlib CLI: build a local component library from a component site.
//!
//! Fetches every component page listed on the site, runs each snippet through
//! the configured transformers and writes the files plus a catalog.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
