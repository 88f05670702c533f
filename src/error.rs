//! Error types for persistence and configuration.
//!
//! None of these are fatal to the simulation: callers log them and fall back
//! to an empty ranking or default configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reading or writing the ranking store
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("ranking file {} could not be read: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ranking file {} could not be written: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single record did not parse. Loads skip these rather than fail.
    #[error("malformed ranking record on line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}

/// Failure loading or validating settings/tuning files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} could not be accessed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Tuning value outside its safe range
    #[error("tuning value '{name}' = {value} is outside safe range {safe_range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        safe_range: &'static str,
    },
}

pub type RankingResult<T> = Result<T, RankingError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
