//! CSV parsing for a single crime export.

use crate::error::{CrimeDataError, Result};
use crate::utils::blank_strings_to_null;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;

/// Read one CSV file into a DataFrame of string columns.
///
/// Schema inference is disabled so that every file yields the same dtypes
/// regardless of which cells happen to be empty; typing happens after
/// concatenation. Blank cells become nulls.
pub(crate) fn read_csv_file(path: &Path) -> Result<DataFrame> {
    let parse_error = |e: PolarsError| CrimeDataError::Parse {
        location: format!("'{}'", path.display()),
        reason: e.to_string(),
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_missing_is_null(true),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    normalize_blanks(df).map_err(parse_error)
}

fn normalize_blanks(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for name in names {
        let normalized = blank_strings_to_null(df.column(&name)?.as_materialized_series())?;
        df.replace(&name, normalized)?;
    }

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_csv_file_reads_strings_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2023-01-street.csv");
        fs::write(
            &path,
            "Longitude,Latitude,LSOA code,Crime type\n\
             -0.1,51.5,E01000001,Burglary\n\
             ,,,Drugs\n",
        )
        .unwrap();

        let df = read_csv_file(&path).unwrap();

        assert_eq!(df.shape(), (2, 4));
        assert_eq!(df.column("Longitude").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Longitude").unwrap().null_count(), 1);
        assert_eq!(df.column("LSOA code").unwrap().null_count(), 1);
        assert_eq!(df.column("Crime type").unwrap().null_count(), 0);
    }

    #[test]
    fn test_read_csv_file_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty-month.csv");
        fs::write(&path, "Longitude,Latitude,Crime type\n").unwrap();

        let df = read_csv_file(&path).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_read_csv_file_ragged_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2023-04-street.csv");
        fs::write(
            &path,
            "Longitude,Latitude,LSOA code,LSOA name,Crime type\n\
             1,2,E,N,B,extra,more\n",
        )
        .unwrap();

        let err = read_csv_file(&path).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.to_string().contains("2023-04-street.csv"));
    }

    #[test]
    fn test_read_csv_file_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2023-05-street.csv");
        fs::write(&path, b"Longitude,Crime type\n\xff\xfe,Burglary\n").unwrap();

        let err = read_csv_file(&path).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.to_string().contains("2023-05-street.csv"));
    }
}
