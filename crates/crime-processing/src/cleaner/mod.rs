//! Data cleaning module for combined crime tables.
//!
//! This module provides functionality for:
//! - Dropping the sparse bookkeeping columns of the export
//! - Optionally dropping other columns with high missing rates
//! - Checking that the columns the dashboard needs are present
//! - Imputing coordinates with means and LSOA fields with modes

use crate::config::PipelineConfig;
use crate::error::{CrimeDataError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::types::{CleanedTable, CleaningReport, ColumnMissing};
use crate::utils::column_names;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Data cleaner for combined crime tables.
#[derive(Debug, Clone)]
pub struct DataCleaner {
    config: PipelineConfig,
}

impl DataCleaner {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Clean a combined table.
    ///
    /// Steps, in order:
    /// 1. Drop the configured columns that are present
    /// 2. Drop other columns above the missing threshold, if one is set
    /// 3. Verify the required columns exist
    /// 4. Mean-impute the numeric columns (parsing them to Float64)
    /// 5. Mode-impute the categorical columns
    ///
    /// The row count never changes and `df` is left untouched.
    pub fn clean(&self, df: &DataFrame) -> Result<CleanedTable> {
        info!("Cleaning combined dataset {:?}...", df.shape());

        let mut report = CleaningReport {
            rows_before: df.height(),
            columns_before: df.width(),
            missing_before: missing_counts(df),
            ..Default::default()
        };

        // 1. Fixed drops
        let present: Vec<String> = self
            .config
            .drop_columns
            .iter()
            .filter(|c| df.column(c.as_str()).is_ok())
            .cloned()
            .collect();
        let mut current = drop_columns(df, &present);
        if present.is_empty() {
            report
                .actions
                .push("No configured drop columns present".to_string());
        } else {
            debug!("Dropped columns {:?}", present);
            report
                .actions
                .push(format!("Dropped {} columns: {:?}", present.len(), present));
            report.dropped_columns.extend(present);
        }

        // 2. Threshold drops
        if let Some(threshold) = self.config.missing_column_threshold {
            let sparse = self.sparse_columns(&current, threshold);
            if !sparse.is_empty() {
                warn!(
                    "Dropping {} columns with >{:.0}% missing values: {:?}",
                    sparse.len(),
                    threshold * 100.0,
                    sparse
                );
                current = drop_columns(&current, &sparse);
                report.actions.push(format!(
                    "Dropped {} columns with >{:.0}% missing values: {:?}",
                    sparse.len(),
                    threshold * 100.0,
                    sparse
                ));
                report.dropped_columns.extend(sparse);
            }
        }

        // 3. Schema check
        self.check_required_columns(&current)?;

        // 4. Mean imputation
        for col_name in &self.config.mean_columns {
            if current.column(col_name.as_str()).is_err() {
                debug!("Skipping mean imputation for absent column '{}'", col_name);
                continue;
            }
            let (next, record) = StatisticalImputer::impute_mean(&current, col_name)
                .context(format!("Mean imputation of '{}'", col_name))?;
            current = next;
            if let Some(record) = record {
                report.actions.push(record.describe());
                report.imputations.push(record);
            }
        }

        // 5. Mode imputation
        for col_name in &self.config.mode_columns {
            if current.column(col_name.as_str()).is_err() {
                debug!("Skipping mode imputation for absent column '{}'", col_name);
                continue;
            }
            let (next, record) =
                StatisticalImputer::impute_mode(&current, col_name, self.config.mode_tie_break)
                    .context(format!("Mode imputation of '{}'", col_name))?;
            current = next;
            if let Some(record) = record {
                report.actions.push(record.describe());
                report.imputations.push(record);
            }
        }

        report.rows_after = current.height();
        report.columns_after = current.width();
        report.missing_after = missing_counts(&current);

        info!(
            "Cleaning complete: {} rows, {} -> {} columns, {} -> {} missing values",
            report.rows_after,
            report.columns_before,
            report.columns_after,
            report.total_missing_before(),
            report.total_missing_after()
        );

        Ok(CleanedTable::new(current, report))
    }

    fn check_required_columns(&self, df: &DataFrame) -> Result<()> {
        match self
            .config
            .required_columns
            .iter()
            .find(|c| df.column(c.as_str()).is_err())
        {
            Some(missing) => Err(CrimeDataError::ColumnNotFound(missing.clone())),
            None => Ok(()),
        }
    }

    fn sparse_columns(&self, df: &DataFrame, threshold: f64) -> Vec<String> {
        if df.height() == 0 {
            return Vec::new();
        }
        let height = df.height() as f64;
        df.get_columns()
            .iter()
            .filter(|col| !self.config.is_protected_column(col.name().as_str()))
            .filter(|col| col.null_count() as f64 / height > threshold)
            .map(|col| col.name().to_string())
            .collect()
    }
}

fn drop_columns(df: &DataFrame, names: &[String]) -> DataFrame {
    if names.is_empty() {
        return df.clone();
    }
    let cols: Vec<PlSmallStr> = names.iter().map(|s| s.as_str().into()).collect();
    df.drop_many(cols)
}

/// Missing-value count of every column, in column order.
pub(crate) fn missing_counts(df: &DataFrame) -> Vec<ColumnMissing> {
    column_names(df)
        .into_iter()
        .zip(df.get_columns())
        .map(|(column, col)| ColumnMissing {
            column,
            missing: col.null_count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn combined_frame() -> DataFrame {
        df![
            "Crime ID" => [Some("a1"), None, Some("a3")],
            "Month" => ["2023-01", "2023-01", "2023-02"],
            "Longitude" => [Some("-0.1"), None, Some("-0.3")],
            "Latitude" => [Some("51.5"), Some("51.7"), None],
            "LSOA code" => [Some("E01"), None, Some("E01")],
            "LSOA name" => [Some("City 001A"), Some("City 001B"), None],
            "Crime type" => ["Burglary", "Drugs", "Burglary"],
            "Last outcome category" => [Option::<&str>::None, None, None],
            "Context" => [Option::<&str>::None, None, None],
        ]
        .unwrap()
    }

    #[test]
    fn test_clean_drops_and_imputes() {
        let cleaner = DataCleaner::new(&PipelineConfig::default());
        let df = combined_frame();

        let cleaned = cleaner.clean(&df).unwrap();
        let data = cleaned.data();

        assert_eq!(data.height(), 3);
        assert_eq!(
            column_names(data),
            vec!["Month", "Longitude", "Latitude", "LSOA code", "LSOA name", "Crime type"]
        );
        for name in ["Longitude", "Latitude", "LSOA code", "LSOA name"] {
            assert_eq!(data.column(name).unwrap().null_count(), 0, "{}", name);
        }

        let lon = data.column("Longitude").unwrap().get(1).unwrap();
        assert!((lon.try_extract::<f64>().unwrap() - -0.2).abs() < 1e-12);
        let lat = data.column("Latitude").unwrap().get(2).unwrap();
        assert!((lat.try_extract::<f64>().unwrap() - 51.6).abs() < 1e-12);
        assert_eq!(
            data.column("LSOA code").unwrap().get(1).unwrap().get_str(),
            Some("E01")
        );
        // "City 001A" and "City 001B" tie; lexicographic picks the smaller
        assert_eq!(
            data.column("LSOA name").unwrap().get(2).unwrap().get_str(),
            Some("City 001A")
        );

        let report = cleaned.report();
        assert_eq!(report.columns_before, 9);
        assert_eq!(report.columns_after, 6);
        assert_eq!(report.imputations.len(), 4);
        assert_eq!(
            report.dropped_columns,
            vec!["Crime ID", "Last outcome category", "Context"]
        );
        assert_eq!(report.total_missing_after(), 0);
    }

    #[test]
    fn test_clean_does_not_mutate_input() {
        let cleaner = DataCleaner::new(&PipelineConfig::default());
        let df = combined_frame();
        let snapshot = df.clone();

        cleaner.clean(&df).unwrap();
        assert!(df.equals_missing(&snapshot));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let cleaner = DataCleaner::new(&PipelineConfig::default());

        let once = cleaner.clean(&combined_frame()).unwrap();
        let twice = cleaner.clean(once.data()).unwrap();

        assert!(twice.data().equals_missing(once.data()));
        assert!(twice.report().imputations.is_empty());
        assert!(twice.report().dropped_columns.is_empty());
    }

    #[test]
    fn test_clean_missing_required_column() {
        let cleaner = DataCleaner::new(&PipelineConfig::default());
        let df = combined_frame().drop("Crime type").unwrap();

        let err = cleaner.clean(&df).unwrap_err();
        assert!(matches!(err, CrimeDataError::ColumnNotFound(ref c) if c == "Crime type"));
    }

    #[test]
    fn test_clean_all_missing_coordinate() {
        let cleaner = DataCleaner::new(&PipelineConfig::default());
        let df = df![
            "Longitude" => [Option::<&str>::None, None],
            "Latitude" => ["51.5", "51.6"],
            "LSOA code" => ["E01", "E02"],
            "LSOA name" => ["A", "B"],
            "Crime type" => ["Drugs", "Drugs"],
        ]
        .unwrap();

        let err = cleaner.clean(&df).unwrap_err();
        assert_eq!(err.error_code(), "NO_VALID_VALUES");
        assert!(err.to_string().contains("Mean imputation of 'Longitude'"));
    }

    #[test]
    fn test_clean_missing_column_threshold() {
        let config = PipelineConfig::builder()
            .missing_column_threshold(0.5)
            .build()
            .unwrap();
        let cleaner = DataCleaner::new(&config);
        let df = df![
            "Location" => [Option::<&str>::None, None, Some("On or near Park Lane")],
            "Longitude" => [Some("-0.1"), None, Some("-0.3")],
            "Latitude" => ["51.5", "51.7", "51.6"],
            "LSOA code" => ["E01", "E01", "E02"],
            "LSOA name" => ["A", "A", "B"],
            "Crime type" => ["Burglary", "Drugs", "Burglary"],
        ]
        .unwrap();

        let cleaned = cleaner.clean(&df).unwrap();

        assert!(cleaned.data().column("Location").is_err());
        // Longitude is a third missing but protected
        assert!(cleaned.data().column("Longitude").is_ok());
        assert!(
            cleaned
                .report()
                .dropped_columns
                .contains(&"Location".to_string())
        );
    }

    #[test]
    fn test_missing_counts() {
        let counts = missing_counts(&combined_frame());
        assert_eq!(counts[0].column, "Crime ID");
        assert_eq!(counts[0].missing, 1);
        assert_eq!(counts[8].missing, 3);
    }
}
