//! CLI command implementations for Tapesoup.

pub(crate) mod react;
pub(crate) mod run;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One block per generation listing every entity.
    Text,
    /// Machine-readable JSON document with every snapshot.
    Json,
    /// Long-format time series for plotting.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<tapesoup::ConfigError> for CliError {
    fn from(e: tapesoup::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<tapesoup::LoadError> for CliError {
    fn from(e: tapesoup::LoadError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Parse a hex machine encoding, with or without a `0x` prefix.
pub(crate) fn parse_hex_u16(s: &str) -> Result<u16, String> {
    u16::from_str_radix(strip_hex_prefix(s), 16).map_err(|e| format!("invalid hex '{s}': {e}"))
}

/// Parse a hex tape value, with or without a `0x` prefix.
pub(crate) fn parse_hex_u64(s: &str) -> Result<u64, String> {
    u64::from_str_radix(strip_hex_prefix(s), 16).map_err(|e| format!("invalid hex '{s}': {e}"))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_u16("f018"), Ok(0xF018));
        assert_eq!(parse_hex_u16("0x1002"), Ok(0x1002));
        assert_eq!(parse_hex_u64("0X7f"), Ok(0x7F));
        assert!(parse_hex_u16("10000").is_err());
        assert!(parse_hex_u64("zz").is_err());
    }
}
