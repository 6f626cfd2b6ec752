use schemars::schema_for;

use crate::config::FeedConfig;

/// Generate and print the JSON Schema for the feed config file.
pub fn run() -> anyhow::Result<()> {
    let schema = schema_for!(FeedConfig);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}
