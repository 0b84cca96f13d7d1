//! Error types for fixture loading.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading test cases.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The fixture file is not a JSON object.
    #[error(transparent)]
    Parse(serde_json::Error),

    /// The document has no cases under the cases key, or an empty array.
    #[error("ddt: cannot load test cases from {file}")]
    NoCases { file: String },

    /// The cases do not fit the requested case type.
    #[error("ddt: cannot decode test cases from {file}: {source}")]
    Decode {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// No frame on the stack belongs to a function with a test prefix.
    #[error("ddt: cannot find a calling function named {prefixes}*")]
    NoCaller { prefixes: String },
}

tester_assert::error_text!(FixtureError);

/// Result type for fixture loading.
pub type FixtureResult<T> = Result<T, FixtureError>;
