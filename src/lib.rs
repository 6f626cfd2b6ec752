pub mod chain;
pub mod columns;
pub mod config;
pub mod greeks;
pub mod pipeline;
pub mod records;
pub mod schema;
pub mod sinks;

#[cfg(feature = "full")]
pub mod process;
#[cfg(feature = "full")]
pub mod run;
#[cfg(feature = "full")]
pub mod sources;
