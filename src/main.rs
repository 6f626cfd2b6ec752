use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use optchain_feed::config::FeedConfig;
use optchain_feed::run::SourceChoice;
use optchain_feed::{columns, process, run, schema};

mod cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Run {
            source,
            snapshot,
            spot,
            once,
            config,
        } => {
            let feed = FeedConfig::resolve(config.config.as_deref(), &config.overrides())?;
            let source = match source {
                cli::SourceKind::Nse => SourceChoice::Nse,
                cli::SourceKind::File => SourceChoice::File {
                    path: snapshot.context("--snapshot is required with --source file")?,
                    spot,
                },
            };
            run::run(feed, source, once)
        }
        cli::Command::Process {
            snapshot,
            spot,
            config,
        } => {
            let feed = FeedConfig::resolve(config.config.as_deref(), &config.overrides())?;
            process::run(&snapshot, spot, &feed)
        }
        cli::Command::Columns => columns::run(),
        cli::Command::ConfigSchema => schema::run(),
    }
}
