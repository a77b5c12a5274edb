//! Custom error types for loading and cleaning crime datasets.
//!
//! Every failure the loader and cleaner can hit maps onto one variant of
//! [`CrimeDataError`]. Errors are serializable so they can be handed to a
//! dashboard frontend as `{code, message}` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the crime data pipeline.
#[derive(Error, Debug)]
pub enum CrimeDataError {
    /// The dataset directory does not exist or could not be listed.
    #[error("Cannot read dataset directory '{}': {source}", .path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file or column could not be parsed.
    #[error("Failed to parse {location}: {reason}")]
    Parse { location: String, reason: String },

    /// A required column is absent from the combined schema.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A statistic was needed but the column holds no observed values.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// The dataset directory contains no matching files.
    #[error("No CSV files found in '{}'", .0.display())]
    NoData(PathBuf),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CrimeDataError>,
    },
}

impl CrimeDataError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CrimeDataError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DirectoryAccess { .. } => "DIRECTORY_ACCESS",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::NoData(_) => "NO_DATA",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the input data rather than the environment.
    ///
    /// Data errors mean the CSV exports themselves need fixing; everything
    /// else (missing directory, bad config, disk failures) is an operator issue.
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::Parse { .. } | Self::ColumnNotFound(_) | Self::NoValidValues(_) => true,
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for CrimeDataError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CrimeDataError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CrimeDataError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CrimeDataError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for crime data operations.
pub type Result<T> = std::result::Result<T, CrimeDataError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CrimeDataError::Polars(e).with_context(context))
    }
}
