use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use optchain_feed::config::ConfigOverrides;

/// Option-chain feed: snapshot an options chain, add deltas, publish a sheet.
#[derive(Parser)]
#[command(name = "optchain-feed", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the fetch → parse → delta → publish loop
    Run {
        /// Where snapshots come from
        #[arg(long, value_enum, default_value = "nse")]
        source: SourceKind,

        /// Snapshot CSV file (required with --source file)
        #[arg(long, required_if_eq("source", "file"))]
        snapshot: Option<PathBuf>,

        /// Spot price to use with --source file
        #[arg(long, default_value = "0.0")]
        spot: f64,

        /// Run a single cycle then exit (for external cron)
        #[arg(long)]
        once: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Process one saved snapshot and print the sheet as CSV to stdout
    Process {
        /// Snapshot CSV file
        snapshot: PathBuf,

        /// Spot price of the underlying
        #[arg(long, default_value = "0.0")]
        spot: f64,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List the raw snapshot columns and the published column order
    Columns,

    /// Output the JSON schema for the config file
    ConfigSchema,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// NSE option-chain JSON API
    Nse,
    /// A CSV snapshot file, re-read every cycle
    File,
}

/// Settings shared by `run` and `process`. Flags override the config file.
#[derive(Args)]
pub struct ConfigArgs {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Underlying symbol (e.g. NIFTY, BANKNIFTY)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Output sheet path
    #[arg(long)]
    pub destination: Option<String>,

    /// Seconds between cycles
    #[arg(long)]
    pub refresh_seconds: Option<u64>,

    /// Headless retrieval
    #[arg(long)]
    pub headless: bool,

    /// Days to expiry used for delta
    #[arg(long)]
    pub days_to_expiry: Option<f64>,

    /// Risk-free rate as a decimal (0.10 = 10%)
    #[arg(long)]
    pub risk_free_rate: Option<f64>,

    /// Leading snapshot rows to skip as headers
    #[arg(long)]
    pub header_rows: Option<usize>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            symbol: self.symbol.clone(),
            destination: self.destination.clone(),
            refresh_seconds: self.refresh_seconds,
            headless: self.headless,
            days_to_expiry: self.days_to_expiry,
            risk_free_rate: self.risk_free_rate,
            header_rows: self.header_rows,
        }
    }
}
