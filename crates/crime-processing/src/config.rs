//! Configuration types for the crime data pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults reproduce the street-level crime export layout published by
//! UK police forces.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Column names of the street-level crime export.
pub mod columns {
    pub const CRIME_ID: &str = "Crime ID";
    pub const LONGITUDE: &str = "Longitude";
    pub const LATITUDE: &str = "Latitude";
    pub const LSOA_CODE: &str = "LSOA code";
    pub const LSOA_NAME: &str = "LSOA name";
    pub const CRIME_TYPE: &str = "Crime type";
    pub const LAST_OUTCOME_CATEGORY: &str = "Last outcome category";
    pub const CONTEXT: &str = "Context";
}

/// Order in which discovered files are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FileOrder {
    /// Whatever order the filesystem lists entries in
    #[default]
    Listing,
    /// Sorted by file name
    Name,
}

/// Which value wins when several share the highest frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModeTieBreak {
    /// Smallest value in byte-wise string order
    #[default]
    Lexicographic,
    /// Value that appears first in row order
    FirstEncountered,
}

/// What to do when the dataset directory holds no matching files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmptyDirectoryPolicy {
    /// Fail with `CrimeDataError::NoData`
    #[default]
    Fail,
    /// Return an empty table with no rows and no columns
    Empty,
}

/// Configuration for the crime data pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use crime_processing::config::{PipelineConfig, FileOrder};
///
/// let config = PipelineConfig::builder()
///     .dataset_dir("data/met-police")
///     .file_order(FileOrder::Name)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned for CSV exports.
    /// Default: "Dataset"
    pub dataset_dir: PathBuf,

    /// File extension (without the dot) of files to load, compared
    /// case-insensitively.
    /// Default: "csv"
    pub file_extension: String,

    /// Order in which discovered files are concatenated.
    /// Default: Listing
    pub file_order: FileOrder,

    /// Columns removed before imputation. Absent columns are ignored.
    /// Default: Crime ID, Last outcome category, Context
    pub drop_columns: Vec<String>,

    /// Columns that must exist in the combined table.
    /// Default: Longitude, Latitude, LSOA code, LSOA name, Crime type
    pub required_columns: Vec<String>,

    /// Numeric columns whose missing values are filled with the column mean.
    /// Default: Longitude, Latitude
    pub mean_columns: Vec<String>,

    /// Categorical columns whose missing values are filled with the column mode.
    /// Default: LSOA code, LSOA name
    pub mode_columns: Vec<String>,

    /// Tie-break for mode imputation.
    /// Default: Lexicographic
    pub mode_tie_break: ModeTieBreak,

    /// Behaviour for a directory without matching files.
    /// Default: Fail
    pub empty_directory: EmptyDirectoryPolicy,

    /// Additionally drop any other column whose missing fraction is above
    /// this threshold (0.0 - 1.0). Required and imputed columns are exempt.
    /// Default: None (disabled)
    pub missing_column_threshold: Option<f64>,
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_drop_columns() -> Vec<String> {
    to_strings(&[
        columns::CRIME_ID,
        columns::LAST_OUTCOME_CATEGORY,
        columns::CONTEXT,
    ])
}

fn default_required_columns() -> Vec<String> {
    to_strings(&[
        columns::LONGITUDE,
        columns::LATITUDE,
        columns::LSOA_CODE,
        columns::LSOA_NAME,
        columns::CRIME_TYPE,
    ])
}

fn default_mean_columns() -> Vec<String> {
    to_strings(&[columns::LONGITUDE, columns::LATITUDE])
}

fn default_mode_columns() -> Vec<String> {
    to_strings(&[columns::LSOA_CODE, columns::LSOA_NAME])
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("Dataset"),
            file_extension: "csv".to_string(),
            file_order: FileOrder::default(),
            drop_columns: default_drop_columns(),
            required_columns: default_required_columns(),
            mean_columns: default_mean_columns(),
            mode_columns: default_mode_columns(),
            mode_tie_break: ModeTieBreak::default(),
            empty_directory: EmptyDirectoryPolicy::default(),
            missing_column_threshold: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(threshold) = self.missing_column_threshold
            && !(0.0..=1.0).contains(&threshold)
        {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "missing_column_threshold".to_string(),
                value: threshold,
            });
        }

        if self.file_extension.trim().is_empty() {
            return Err(ConfigValidationError::EmptyFileExtension);
        }

        // A column cannot be both dropped and kept for imputation or charting.
        for column in self
            .required_columns
            .iter()
            .chain(&self.mean_columns)
            .chain(&self.mode_columns)
        {
            if self.drop_columns.contains(column) {
                return Err(ConfigValidationError::ConflictingColumn(column.clone()));
            }
        }

        if let Some(column) = self
            .mean_columns
            .iter()
            .find(|c| self.mode_columns.contains(c))
        {
            return Err(ConfigValidationError::ConflictingColumn(column.clone()));
        }

        Ok(())
    }

    /// True when `column` must survive threshold-based dropping.
    pub fn is_protected_column(&self, column: &str) -> bool {
        self.required_columns
            .iter()
            .chain(&self.mean_columns)
            .chain(&self.mode_columns)
            .any(|c| c == column)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("File extension must not be empty")]
    EmptyFileExtension,

    #[error("Column '{0}' is configured both to be dropped and to be kept")]
    ConflictingColumn(String),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    dataset_dir: Option<PathBuf>,
    file_extension: Option<String>,
    file_order: Option<FileOrder>,
    drop_columns: Option<Vec<String>>,
    required_columns: Option<Vec<String>>,
    mean_columns: Option<Vec<String>>,
    mode_columns: Option<Vec<String>>,
    mode_tie_break: Option<ModeTieBreak>,
    empty_directory: Option<EmptyDirectoryPolicy>,
    missing_column_threshold: Option<f64>,
}

impl PipelineConfigBuilder {
    /// Set the directory scanned for CSV exports.
    pub fn dataset_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_dir = Some(path.into());
        self
    }

    /// Set the file extension to load. A leading dot is stripped.
    pub fn file_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.file_extension = Some(extension.trim_start_matches('.').to_string());
        self
    }

    /// Set the order in which files are concatenated.
    pub fn file_order(mut self, order: FileOrder) -> Self {
        self.file_order = Some(order);
        self
    }

    /// Replace the list of columns removed before imputation.
    pub fn drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of columns that must be present.
    pub fn required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of mean-imputed columns.
    pub fn mean_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mean_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of mode-imputed columns.
    pub fn mode_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mode_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the tie-break used by mode imputation.
    pub fn mode_tie_break(mut self, tie_break: ModeTieBreak) -> Self {
        self.mode_tie_break = Some(tie_break);
        self
    }

    /// Set the behaviour for a directory without matching files.
    pub fn empty_directory(mut self, policy: EmptyDirectoryPolicy) -> Self {
        self.empty_directory = Some(policy);
        self
    }

    /// Drop non-protected columns whose missing fraction exceeds `threshold`.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.7 = 70%)
    pub fn missing_column_threshold(mut self, threshold: f64) -> Self {
        self.missing_column_threshold = Some(threshold);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            dataset_dir: self
                .dataset_dir
                .unwrap_or_else(|| PathBuf::from("Dataset")),
            file_extension: self.file_extension.unwrap_or_else(|| "csv".to_string()),
            file_order: self.file_order.unwrap_or_default(),
            drop_columns: self.drop_columns.unwrap_or_else(default_drop_columns),
            required_columns: self
                .required_columns
                .unwrap_or_else(default_required_columns),
            mean_columns: self.mean_columns.unwrap_or_else(default_mean_columns),
            mode_columns: self.mode_columns.unwrap_or_else(default_mode_columns),
            mode_tie_break: self.mode_tie_break.unwrap_or_default(),
            empty_directory: self.empty_directory.unwrap_or_default(),
            missing_column_threshold: self.missing_column_threshold,
        };

        config.validate()?;
        Ok(config)
    }
}
