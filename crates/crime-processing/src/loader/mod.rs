//! Dataset loading module.
//!
//! This module turns a directory of monthly crime exports into one table:
//! - Discovering the CSV files in a directory
//! - Parsing each file into string columns
//! - Concatenating the per-file tables, filling absent columns with nulls

mod concat;
mod discovery;
mod reader;

use crate::config::{EmptyDirectoryPolicy, FileOrder, PipelineConfig};
use crate::error::{CrimeDataError, Result};
use crate::types::{LoadedDataset, LoadedFile};
use std::path::Path;
use tracing::{debug, info, warn};

/// Loads every matching file of a dataset directory into one table.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    extension: String,
    order: FileOrder,
    empty_directory: EmptyDirectoryPolicy,
}

impl DatasetLoader {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            extension: config.file_extension.clone(),
            order: config.file_order,
            empty_directory: config.empty_directory,
        }
    }

    /// Load and concatenate all matching files in `dir`.
    ///
    /// Rows keep file order, then in-file order. A directory without
    /// matching files is an error unless the policy is
    /// [`EmptyDirectoryPolicy::Empty`].
    pub fn load_directory(&self, dir: &Path) -> Result<LoadedDataset> {
        let paths = discovery::discover_files(dir, &self.extension, self.order)?;

        if paths.is_empty() {
            return match self.empty_directory {
                EmptyDirectoryPolicy::Fail => Err(CrimeDataError::NoData(dir.to_path_buf())),
                EmptyDirectoryPolicy::Empty => {
                    warn!("No .{} files in {}", self.extension, dir.display());
                    Ok(LoadedDataset {
                        data: polars::prelude::DataFrame::empty(),
                        files: Vec::new(),
                    })
                }
            };
        }

        info!("Loading {} files from {}", paths.len(), dir.display());

        let mut frames = Vec::with_capacity(paths.len());
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let df = reader::read_csv_file(&path)?;
            debug!("Loaded {}: {:?}", path.display(), df.shape());
            files.push(LoadedFile {
                path,
                rows: df.height(),
                columns: df.width(),
            });
            frames.push(df);
        }

        let data = concat::concat_diagonal(frames)?;
        info!("Combined dataset shape: {:?}", data.shape());

        Ok(LoadedDataset { data, files })
    }
}
