//! Error types shared by the generator, the Dakota exchange and the study tools.
//!
//! Nothing here is retried: every variant is either a misconfiguration or a
//! precondition the external driver failed to meet.

use std::path::Path;

use thiserror::Error;

/// Top-level error type for windfarm-uq.
#[derive(Debug, Error)]
pub enum UqError {
    // Configuration

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown uncertain_var option \"{0}\", valid options \"speed\" or \"direction\"")]
    UnknownVariable(String),

    #[error("unknown method \"{0}\", valid options \"rect\" or \"dakota\"")]
    UnknownMethod(String),

    #[error("distribution domain {domain} is incompatible with the {variable} variable")]
    IncompatibleDomain { variable: String, domain: String },

    #[error(
        "parameters file declares {declared} uncertain variable(s) but {expected} were expected"
    )]
    VariableCountMismatch { declared: usize, expected: usize },

    // Wire formats

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("missing key \"{0}\" in parameters file")]
    MissingKey(String),

    #[error("invalid value \"{value}\" for \"{key}\": {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("active set requests {kind} for function {index} but none was provided")]
    MissingResponse { index: usize, kind: &'static str },

    #[error("length mismatch: {0}")]
    LengthMismatch(String),

    // Infrastructure

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl UqError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// IO error for a failed operation on `path`.
    pub fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("cannot {action} \"{}\"", path.display()), source)
    }

    /// True for errors caused by configuration rather than file contents or I/O.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::UnknownVariable(_)
                | Self::UnknownMethod(_)
                | Self::IncompatibleDomain { .. }
                | Self::VariableCountMismatch { .. }
        )
    }
}

/// Result type alias for windfarm-uq.
pub type Result<T> = std::result::Result<T, UqError>;
