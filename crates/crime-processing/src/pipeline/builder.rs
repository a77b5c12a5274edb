//! Main crime data pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! loading a dataset directory and cleaning the combined table.

use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::Result;
use crate::loader::DatasetLoader;
use crate::profiler::DataProfiler;
use crate::types::{CleanedTable, PipelineResult};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// The crime data pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use crime_processing::{Pipeline, PipelineConfig, FileOrder};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().file_order(FileOrder::Name).build()?)
///     .dataset_dir("data/met-police")
///     .build()?
///     .process()?;
///
/// println!("{} rows after cleaning", result.cleaned.height());
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    loader: DatasetLoader,
    cleaner: DataCleaner,
}

// The pipeline holds no interior state and may be shared across threads
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline over the configured dataset directory.
    pub fn process(&self) -> Result<PipelineResult> {
        self.process_dir(&self.config.dataset_dir)
    }

    /// Run the pipeline over `dir`, ignoring the configured directory.
    pub fn process_dir(&self, dir: &Path) -> Result<PipelineResult> {
        self.process_internal(dir).inspect_err(|e| error!("Pipeline error: {}", e))
    }

    /// Load every matching file in `dir` and return the cleaned table.
    ///
    /// # Errors
    ///
    /// `DirectoryAccess` if `dir` cannot be listed, `Parse` for malformed
    /// files or non-numeric coordinates, `ColumnNotFound` for a missing
    /// required column, `NoValidValues` if an imputed column has nothing to
    /// impute from, and `NoData` for an empty directory unless the config
    /// allows one.
    pub fn load_and_clean(&self, dir: &Path) -> Result<CleanedTable> {
        self.process_dir(dir).map(|result| result.cleaned)
    }

    fn process_internal(&self, dir: &Path) -> Result<PipelineResult> {
        info!("Starting crime data pipeline for {}", dir.display());

        let loaded = self.loader.load_directory(dir)?;
        let profile_before = DataProfiler::profile(&loaded.data);

        let cleaned = if loaded.is_empty() {
            CleanedTable::empty()
        } else {
            self.cleaner.clean(&loaded.data)?
        };

        info!(
            "Pipeline complete: {} files, {} rows, {} columns",
            loaded.files.len(),
            cleaned.height(),
            cleaned.width()
        );

        Ok(PipelineResult {
            input_dir: dir.to_path_buf(),
            files: loaded.files,
            profile_before,
            cleaned,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    dataset_dir: Option<PathBuf>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the dataset directory of the configuration.
    pub fn dataset_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_dir = Some(path.into());
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(dir) = self.dataset_dir {
            config.dataset_dir = dir;
        }
        config.validate()?;

        Ok(Pipeline {
            loader: DatasetLoader::new(&config),
            cleaner: DataCleaner::new(&config),
            config,
        })
    }
}
