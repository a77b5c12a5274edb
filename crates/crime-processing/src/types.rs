use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Loading
// ============================================================================

/// One CSV file that contributed rows to the combined table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// The combined table plus the files it came from, in load order.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub data: DataFrame,
    pub files: Vec<LoadedFile>,
}

impl LoadedDataset {
    /// True when no file matched in the dataset directory.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of the row counts of every loaded file.
    pub fn source_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }
}

// ============================================================================
// Cleaning
// ============================================================================

/// Statistic used to fill a column's missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputationStrategy {
    Mean,
    Mode,
}

/// The value written into missing cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImputedValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for ImputedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputedValue::Number(v) => write!(f, "{:.6}", v),
            ImputedValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// Record of one imputation applied to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub strategy: ImputationStrategy,
    pub value: ImputedValue,
    /// Number of cells that were filled.
    pub filled: usize,
}

impl ImputationRecord {
    /// Human-readable description, e.g. for the CLI summary.
    pub fn describe(&self) -> String {
        let method = match self.strategy {
            ImputationStrategy::Mean => "mean",
            ImputationStrategy::Mode => "mode",
        };
        format!(
            "Filled {} missing values in '{}' with {}: {}",
            self.filled, self.column, method, self.value
        )
    }
}

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// What the cleaner did to the combined table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Columns removed, fixed drops first, then threshold drops.
    pub dropped_columns: Vec<String>,
    pub imputations: Vec<ImputationRecord>,
    pub missing_before: Vec<ColumnMissing>,
    pub missing_after: Vec<ColumnMissing>,
    /// Ordered log of cleaning actions.
    pub actions: Vec<String>,
}

impl CleaningReport {
    pub fn total_missing_before(&self) -> usize {
        self.missing_before.iter().map(|m| m.missing).sum()
    }

    pub fn total_missing_after(&self) -> usize {
        self.missing_after.iter().map(|m| m.missing).sum()
    }
}

/// The cleaned crime table handed to the dashboard.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    data: DataFrame,
    report: CleaningReport,
}

impl CleanedTable {
    pub fn new(data: DataFrame, report: CleaningReport) -> Self {
        Self { data, report }
    }

    /// A table with no rows and no columns, produced for an empty directory
    /// when the pipeline is configured to tolerate one.
    pub fn empty() -> Self {
        let mut report = CleaningReport::default();
        report
            .actions
            .push("No input files; produced an empty table".to_string());
        Self {
            data: DataFrame::empty(),
            report,
        }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }
}

// ============================================================================
// Profiling
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub non_null_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub shape: (usize, usize),
    pub column_profiles: Vec<ColumnProfile>,
    pub total_missing: usize,
}

/// Descriptive statistics of a numeric column. Statistics are `None` when
/// the column has too few observed values to define them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Everything a single pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub input_dir: PathBuf,
    pub files: Vec<LoadedFile>,
    /// Profile of the combined table before cleaning.
    pub profile_before: DatasetProfile,
    pub cleaned: CleanedTable,
}
