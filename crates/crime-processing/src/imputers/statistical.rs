//! Statistical imputation methods.
//!
//! Provides mean and mode imputation. Every method borrows the input frame
//! and returns a new one; the input is never modified.

use crate::config::ModeTieBreak;
use crate::error::{CrimeDataError, Result};
use crate::types::{ImputationRecord, ImputationStrategy, ImputedValue};
use crate::utils::{
    coerce_to_float, fill_numeric_nulls, fill_string_nulls, require_series, string_mode,
};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing values of a numeric column with the mean of its
    /// observed values.
    ///
    /// String columns are parsed to Float64 first, so the output column is
    /// always Float64. Returns `None` as the record when nothing was missing.
    ///
    /// # Errors
    ///
    /// `ColumnNotFound` if the column is absent, `Parse` if a value is not a
    /// number, `NoValidValues` if every value is missing.
    pub fn impute_mean(
        df: &DataFrame,
        col_name: &str,
    ) -> Result<(DataFrame, Option<ImputationRecord>)> {
        let floats = coerce_to_float(require_series(df, col_name)?)?;
        let missing = floats.null_count();

        if missing == 0 {
            return Ok((Self::with_replaced(df, col_name, floats)?, None));
        }

        let mean_val = floats
            .mean()
            .ok_or_else(|| CrimeDataError::NoValidValues(col_name.to_string()))?;
        let filled = fill_numeric_nulls(&floats, mean_val)?;
        debug!("Filled {} nulls in '{}' with mean {}", missing, col_name, mean_val);

        Ok((
            Self::with_replaced(df, col_name, filled)?,
            Some(ImputationRecord {
                column: col_name.to_string(),
                strategy: ImputationStrategy::Mean,
                value: ImputedValue::Number(mean_val),
                filled: missing,
            }),
        ))
    }

    /// Fill missing values of a categorical column with its most frequent
    /// observed value. Ties are resolved by `tie_break`.
    ///
    /// # Errors
    ///
    /// `ColumnNotFound` if the column is absent, `NoValidValues` if every
    /// value is missing.
    pub fn impute_mode(
        df: &DataFrame,
        col_name: &str,
        tie_break: ModeTieBreak,
    ) -> Result<(DataFrame, Option<ImputationRecord>)> {
        let series = require_series(df, col_name)?;
        let missing = series.null_count();

        if missing == 0 {
            return Ok((df.clone(), None));
        }

        let mode_val = string_mode(series, tie_break)?
            .ok_or_else(|| CrimeDataError::NoValidValues(col_name.to_string()))?;
        let filled = fill_string_nulls(series, &mode_val)?;
        debug!("Filled {} nulls in '{}' with mode '{}'", missing, col_name, mode_val);

        Ok((
            Self::with_replaced(df, col_name, filled)?,
            Some(ImputationRecord {
                column: col_name.to_string(),
                strategy: ImputationStrategy::Mode,
                value: ImputedValue::Text(mode_val),
                filled: missing,
            }),
        ))
    }

    /// Copy of `df` with one column swapped out.
    fn with_replaced(df: &DataFrame, col_name: &str, series: Series) -> Result<DataFrame> {
        let mut out = df.clone();
        out.replace(col_name, series)?;
        Ok(out)
    }
}
