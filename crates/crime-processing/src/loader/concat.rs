//! Diagonal concatenation of per-file tables.

use crate::error::Result;
use crate::utils::column_names;
use polars::prelude::*;

/// Union of the column names of `frames`, in first-seen order.
pub(crate) fn union_columns(frames: &[DataFrame]) -> Vec<String> {
    let mut union: Vec<String> = Vec::new();
    for frame in frames {
        for name in column_names(frame) {
            if !union.contains(&name) {
                union.push(name);
            }
        }
    }
    union
}

/// Stack `frames` row-wise, preserving their order.
///
/// The result carries the union of all columns; a frame lacking a column
/// contributes nulls for it. An empty slice yields an empty DataFrame.
pub(crate) fn concat_diagonal(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let union = union_columns(&frames);
    let mut combined: Option<DataFrame> = None;

    for mut frame in frames {
        let height = frame.height();
        for name in &union {
            if frame.column(name).is_err() {
                let dtype = DataType::String;
                frame.with_column(Series::full_null(name.as_str().into(), height, &dtype))?;
            }
        }
        let aligned = frame.select(union.iter().map(|s| s.as_str()))?;

        match combined.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&aligned)?;
            }
            None => combined = Some(aligned),
        }
    }

    Ok(combined.unwrap_or_else(DataFrame::empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_columns_first_seen_order() {
        let a = df!["x" => ["1"], "y" => ["2"]].unwrap();
        let b = df!["z" => ["3"], "x" => ["4"]].unwrap();
        assert_eq!(union_columns(&[a, b]), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_concat_diagonal_fills_missing_columns() {
        let a = df![
            "Crime type" => ["Burglary", "Drugs"],
            "Context" => [Some("note"), None],
        ]
        .unwrap();
        let b = df!["Crime type" => ["Robbery"]].unwrap();

        let combined = concat_diagonal(vec![a, b]).unwrap();

        assert_eq!(combined.shape(), (3, 2));
        let context = combined.column("Context").unwrap();
        assert_eq!(context.null_count(), 2);
        let crime: Vec<Option<&str>> = combined
            .column("Crime type")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(crime, vec![Some("Burglary"), Some("Drugs"), Some("Robbery")]);
    }

    #[test]
    fn test_concat_diagonal_empty_input() {
        let combined = concat_diagonal(Vec::new()).unwrap();
        assert_eq!(combined.shape(), (0, 0));
    }
}
