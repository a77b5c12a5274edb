//! Data profiling module for dataset summaries.
//!
//! This module provides the overview printed around cleaning:
//! - Shape and per-column missing counts
//! - Descriptive statistics for numeric columns
//! - Count / unique / top / freq for text columns

mod statistics;

use crate::config::ModeTieBreak;
use crate::error::Result;
use crate::types::{CategoricalSummary, ColumnProfile, DatasetProfile, NumericSummary};
use crate::utils::{is_numeric_dtype, is_string_dtype, non_null_f64, pick_mode, value_counts};
use polars::prelude::*;

/// Data profiler for summarising a crime table.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile the shape and missingness of every column.
    pub fn profile(df: &DataFrame) -> DatasetProfile {
        let height = df.height();
        let column_profiles: Vec<ColumnProfile> = df
            .get_columns()
            .iter()
            .map(|col| {
                let null_count = col.null_count();
                let null_percentage = if height > 0 {
                    (null_count as f64 / height as f64) * 100.0
                } else {
                    0.0
                };
                ColumnProfile {
                    name: col.name().to_string(),
                    dtype: format!("{:?}", col.dtype()),
                    non_null_count: height - null_count,
                    null_count,
                    null_percentage,
                }
            })
            .collect();

        let total_missing = column_profiles.iter().map(|c| c.null_count).sum();

        DatasetProfile {
            shape: (height, df.width()),
            column_profiles,
            total_missing,
        }
    }

    /// First `n` rows, for previews.
    pub fn head(df: &DataFrame, n: usize) -> DataFrame {
        df.head(Some(n))
    }

    /// Descriptive statistics of every numeric column.
    pub fn describe_numeric(df: &DataFrame) -> Result<Vec<NumericSummary>> {
        let mut summaries = Vec::new();

        for col in df.get_columns() {
            if !is_numeric_dtype(col.dtype()) {
                continue;
            }
            let mut values = non_null_f64(col.as_materialized_series())?;
            values.sort_by(|a, b| a.total_cmp(b));

            summaries.push(NumericSummary {
                column: col.name().to_string(),
                count: values.len(),
                mean: statistics::mean(&values),
                std: statistics::sample_std(&values),
                min: values.first().copied(),
                q25: statistics::quantile_sorted(&values, 0.25),
                median: statistics::quantile_sorted(&values, 0.5),
                q75: statistics::quantile_sorted(&values, 0.75),
                max: values.last().copied(),
            });
        }

        Ok(summaries)
    }

    /// Count, distinct values, most frequent value and its frequency for
    /// every text column. Ties for the top value resolve lexicographically.
    pub fn describe_categorical(df: &DataFrame) -> Result<Vec<CategoricalSummary>> {
        let mut summaries = Vec::new();

        for col in df.get_columns() {
            if !is_string_dtype(col.dtype()) {
                continue;
            }
            let counts = value_counts(col.as_materialized_series())?;
            let top = pick_mode(&counts, ModeTieBreak::Lexicographic);

            summaries.push(CategoricalSummary {
                column: col.name().to_string(),
                count: counts.iter().map(|vc| vc.count).sum(),
                unique: counts.len(),
                top: top.map(|vc| vc.value.clone()),
                freq: top.map(|vc| vc.count).unwrap_or(0),
            });
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_frame() -> DataFrame {
        df![
            "Longitude" => [Some(-0.1), Some(-0.3), None, Some(-0.2)],
            "Crime type" => [Some("Burglary"), Some("Drugs"), Some("Burglary"), None],
        ]
        .unwrap()
    }

    #[test]
    fn test_profile() {
        let profile = DataProfiler::profile(&sample_frame());

        assert_eq!(profile.shape, (4, 2));
        assert_eq!(profile.total_missing, 2);
        assert_eq!(profile.column_profiles[0].name, "Longitude");
        assert_eq!(profile.column_profiles[0].non_null_count, 3);
        assert_eq!(profile.column_profiles[0].null_percentage, 25.0);
    }

    #[test]
    fn test_profile_empty_frame() {
        let profile = DataProfiler::profile(&DataFrame::empty());
        assert_eq!(profile.shape, (0, 0));
        assert!(profile.column_profiles.is_empty());
    }

    #[test]
    fn test_describe_numeric() {
        let summaries = DataProfiler::describe_numeric(&sample_frame()).unwrap();

        assert_eq!(summaries.len(), 1);
        let lon = &summaries[0];
        assert_eq!(lon.column, "Longitude");
        assert_eq!(lon.count, 3);
        assert_eq!(lon.min, Some(-0.3));
        assert_eq!(lon.max, Some(-0.1));
        assert_eq!(lon.median, Some(-0.2));
        assert!((lon.mean.unwrap() - -0.2).abs() < 1e-12);
    }

    #[test]
    fn test_describe_categorical() {
        let summaries = DataProfiler::describe_categorical(&sample_frame()).unwrap();

        assert_eq!(
            summaries,
            vec![CategoricalSummary {
                column: "Crime type".to_string(),
                count: 3,
                unique: 2,
                top: Some("Burglary".to_string()),
                freq: 2,
            }]
        );
    }

    #[test]
    fn test_head() {
        assert_eq!(DataProfiler::head(&sample_frame(), 2).height(), 2);
    }
}
