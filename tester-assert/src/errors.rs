//! Error types for configuration loading.
//!
//! Assertion failures are not errors: they are reported through a
//! [`Reporter`](crate::Reporter) and returned as failed
//! [`AssertionResult`](crate::AssertionResult)s.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading `tester.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A configured pattern is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
