//! Shared utilities for the crime data pipeline.
//!
//! This module contains the Series-level helpers used by the loader,
//! cleaner, imputers, profiler and chart builders.

use crate::config::ModeTieBreak;
use crate::error::{CrimeDataError, Result};
use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds text.
#[inline]
pub fn is_string_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

/// Look up a column, mapping a miss onto [`CrimeDataError::ColumnNotFound`].
pub fn require_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| CrimeDataError::ColumnNotFound(name.to_string()))
}

/// Column names of a DataFrame as owned strings.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Parse a trimmed string as f64. Blank strings are treated as missing.
pub fn parse_numeric_string(s: &str) -> Option<std::result::Result<f64, String>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        trimmed
            .parse::<f64>()
            .map_err(|_| format!("value '{}' is not a number", trimmed)),
    )
}

/// Convert a column to Float64.
///
/// Numeric columns are cast directly. String columns are parsed value by
/// value and any non-blank value that is not a number is an error.
pub fn coerce_to_float(series: &Series) -> Result<Series> {
    if is_numeric_dtype(series.dtype()) {
        return Ok(series.cast(&DataType::Float64)?);
    }

    let strings = series.cast(&DataType::String)?;
    let mut values: Vec<Option<f64>> = Vec::with_capacity(strings.len());

    for (row, value) in strings.str()?.into_iter().enumerate() {
        match value.and_then(parse_numeric_string) {
            None => values.push(None),
            Some(Ok(v)) => values.push(Some(v)),
            Some(Err(reason)) => {
                return Err(CrimeDataError::Parse {
                    location: format!("column '{}'", series.name()),
                    reason: format!("{} (row {})", reason, row),
                });
            }
        }
    }

    Ok(Series::new(series.name().clone(), values))
}

/// Turn blank or whitespace-only strings into nulls.
///
/// Non-string columns are returned unchanged.
pub fn blank_strings_to_null(series: &Series) -> PolarsResult<Series> {
    if !matches!(series.dtype(), DataType::String) {
        return Ok(series.clone());
    }

    let ca = series.str()?;
    let has_blank = ca.into_iter().flatten().any(|v| v.trim().is_empty());
    if !has_blank {
        return Ok(series.clone());
    }

    let values: Vec<Option<String>> = ca
        .into_iter()
        .map(|v| v.filter(|s| !s.trim().is_empty()).map(str::to_string))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Frequency of one distinct value in a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
    /// Row index of the first occurrence.
    pub first_seen: usize,
}

/// Count the non-null values of a Series, in order of first appearance.
pub fn value_counts(series: &Series) -> PolarsResult<Vec<ValueCount>> {
    let strings = series.cast(&DataType::String)?;
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for (row, value) in strings.str()?.into_iter().enumerate() {
        let Some(value) = value else { continue };
        match index.get(value) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                    first_seen: row,
                });
            }
        }
    }

    Ok(counts)
}

/// Pick the most frequent entry, resolving ties with `tie_break`.
pub fn pick_mode(counts: &[ValueCount], tie_break: ModeTieBreak) -> Option<&ValueCount> {
    let max_count = counts.iter().map(|vc| vc.count).max()?;
    let tied = counts.iter().filter(|vc| vc.count == max_count);

    match tie_break {
        ModeTieBreak::Lexicographic => tied.min_by(|a, b| a.value.cmp(&b.value)),
        ModeTieBreak::FirstEncountered => tied.min_by_key(|vc| vc.first_seen),
    }
}

/// Calculate the mode (most frequent value) of a Series as a string.
pub fn string_mode(series: &Series, tie_break: ModeTieBreak) -> PolarsResult<Option<String>> {
    let counts = value_counts(series)?;
    Ok(pick_mode(&counts, tie_break).map(|vc| vc.value.clone()))
}

/// Non-null values of a numeric Series as f64.
pub fn non_null_f64(series: &Series) -> PolarsResult<Vec<f64>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().flatten().collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = floats
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let strings = series.cast(&DataType::String)?;
    let values: Vec<String> = strings
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value).to_string())
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Read a column as optional f64 values, one per row.
pub fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = require_series(df, name)?;
    let floats = coerce_to_float(series)?;
    Ok(floats.f64()?.into_iter().collect())
}

/// Read a column as optional strings, one per row.
pub fn column_as_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = require_series(df, name)?;
    let strings = series.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
