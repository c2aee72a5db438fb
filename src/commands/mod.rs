use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

pub mod agents;
pub mod config;
pub mod deploy;
pub mod messages;
pub mod request;
pub mod tasks;

pub use config::{ConnectOptions, connect};

/// Parses a JSON document given on the command line.
pub fn parse_json_arg(raw: &str, what: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("Invalid JSON for {}: {}", what, raw))
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}
