//! Crime Data Processing Library
//!
//! Loads a directory of police crime-report CSV exports, combines them into
//! one table and cleans it for a dashboard, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Loading**: every `.csv` file in a directory, concatenated in load order
//!   with columns unioned across files
//! - **Cleaning**: bookkeeping columns dropped, coordinates mean-imputed,
//!   LSOA fields mode-imputed
//! - **Profiling**: shape, missing values and `describe`-style summaries
//! - **Charts**: scatter plot and histogram configuration for a dashboard
//! - **Reporting**: JSON reports and the cleaned table written to disk
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use crime_processing::load_and_clean;
//!
//! let cleaned = load_and_clean("Dataset")?;
//! println!("{} incidents", cleaned.height());
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to customize loading and cleaning:
//!
//! ```rust,ignore
//! use crime_processing::{FileOrder, ModeTieBreak, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .dataset_dir("data/met-police")
//!     .file_order(FileOrder::Name)                    // Sort files by name
//!     .mode_tie_break(ModeTieBreak::FirstEncountered) // First value wins ties
//!     .missing_column_threshold(0.9)                  // Drop columns with >90% missing
//!     .build()?;
//!
//! let result = Pipeline::builder().config(config).build()?.process()?;
//! ```

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

use std::path::Path;

// Re-exports for convenient access
pub use charts::{Dashboard, DashboardConfig};
pub use cleaner::DataCleaner;
pub use config::{
    ConfigValidationError, EmptyDirectoryPolicy, FileOrder, ModeTieBreak, PipelineConfig,
    PipelineConfigBuilder,
};
pub use error::{CrimeDataError, Result as CrimeDataResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::DatasetLoader;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use profiler::DataProfiler;
pub use reporting::{ComprehensiveReport, ReportGenerator};
pub use types::{
    CategoricalSummary, CleanedTable, CleaningReport, ColumnProfile, DatasetProfile,
    ImputationRecord, LoadedDataset, LoadedFile, NumericSummary, PipelineResult,
};

/// Load every CSV file in `dir` and clean the combined table with the
/// default configuration.
pub fn load_and_clean(dir: impl AsRef<Path>) -> CrimeDataResult<CleanedTable> {
    Pipeline::builder()
        .build()?
        .load_and_clean(dir.as_ref())
}
