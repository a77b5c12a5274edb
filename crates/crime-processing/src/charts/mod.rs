//! Dashboard chart configuration.
//!
//! Builds the declarative description of the two dashboard charts from a
//! cleaned table. Rendering and serving are left to whatever consumes the
//! serialised [`Dashboard`].

use crate::config::columns;
use crate::error::Result;
use crate::types::CleanedTable;
use crate::utils::{column_as_f64, column_as_strings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const SCATTER_CHART_ID: &str = "crime-scatter-plot";
pub const HISTOGRAM_CHART_ID: &str = "crime-histogram";

/// Titles and column bindings of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub scatter_title: String,
    pub histogram_title: String,
    pub x_column: String,
    pub y_column: String,
    /// Column used for colour grouping, hover labels and histogram bins.
    pub category_column: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Crime Data Dashboard".to_string(),
            scatter_title: "Crime Incidents Scatter Plot".to_string(),
            histogram_title: "Crime Types Histogram".to_string(),
            x_column: columns::LONGITUDE.to_string(),
            y_column: columns::LATITUDE.to_string(),
            category_column: columns::CRIME_TYPE.to_string(),
        }
    }
}

/// A single plotted incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Hover label.
    pub label: String,
}

/// Points sharing one category, drawn in one colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub id: String,
    pub title: String,
    pub x: String,
    pub y: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Count of rows in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub id: String,
    pub title: String,
    pub x: String,
    pub bins: Vec<HistogramBin>,
}

impl HistogramChart {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Both dashboard charts, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub title: String,
    pub scatter: ScatterChart,
    pub histogram: HistogramChart,
}

impl Dashboard {
    /// Build the chart configuration from a cleaned table.
    ///
    /// Categories keep their first-appearance order in both charts. Rows
    /// with a missing category or coordinate are left out of the scatter
    /// plot; rows with a missing category are left out of the histogram.
    ///
    /// # Errors
    ///
    /// `ColumnNotFound` if one of the configured columns is absent.
    pub fn new(config: &DashboardConfig, table: &CleanedTable) -> Result<Self> {
        let df = table.data();
        let categories = column_as_strings(df, &config.category_column)?;
        let xs = column_as_f64(df, &config.x_column)?;
        let ys = column_as_f64(df, &config.y_column)?;

        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut series: Vec<ScatterSeries> = Vec::new();
        let mut bins: Vec<HistogramBin> = Vec::new();

        for ((category, x), y) in categories.into_iter().zip(xs).zip(ys) {
            let Some(category) = category else { continue };
            let slot = *slots.entry(category.clone()).or_insert_with(|| {
                series.push(ScatterSeries {
                    name: category.clone(),
                    points: Vec::new(),
                });
                bins.push(HistogramBin {
                    category: category.clone(),
                    count: 0,
                });
                bins.len() - 1
            });

            bins[slot].count += 1;
            if let (Some(x), Some(y)) = (x, y) {
                series[slot].points.push(ScatterPoint { x, y, label: category });
            }
        }

        debug!(
            "Built dashboard with {} categories over {} rows",
            bins.len(),
            df.height()
        );

        Ok(Self {
            title: config.title.clone(),
            scatter: ScatterChart {
                id: SCATTER_CHART_ID.to_string(),
                title: config.scatter_title.clone(),
                x: config.x_column.clone(),
                y: config.y_column.clone(),
                series,
            },
            histogram: HistogramChart {
                id: HISTOGRAM_CHART_ID.to_string(),
                title: config.histogram_title.clone(),
                x: config.category_column.clone(),
                bins,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrimeDataError;
    use crate::types::CleaningReport;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn cleaned_table() -> CleanedTable {
        let df = df![
            "Longitude" => [-0.1, -0.2, -0.3, -0.4],
            "Latitude" => [51.5, 51.6, 51.7, 51.8],
            "Crime type" => ["Burglary", "Drugs", "Burglary", "Vehicle crime"],
        ]
        .unwrap();
        CleanedTable::new(df, CleaningReport::default())
    }

    #[test]
    fn test_dashboard_defaults() {
        let dashboard = Dashboard::new(&DashboardConfig::default(), &cleaned_table()).unwrap();

        assert_eq!(dashboard.title, "Crime Data Dashboard");
        assert_eq!(dashboard.scatter.id, "crime-scatter-plot");
        assert_eq!(dashboard.scatter.title, "Crime Incidents Scatter Plot");
        assert_eq!(dashboard.histogram.id, "crime-histogram");
        assert_eq!(dashboard.histogram.title, "Crime Types Histogram");
        assert_eq!(dashboard.histogram.x, "Crime type");
    }

    #[test]
    fn test_scatter_groups_by_category_in_first_appearance_order() {
        let dashboard = Dashboard::new(&DashboardConfig::default(), &cleaned_table()).unwrap();

        let names: Vec<&str> = dashboard
            .scatter
            .series
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Burglary", "Drugs", "Vehicle crime"]);
        assert_eq!(
            dashboard.scatter.series[0].points,
            vec![
                ScatterPoint { x: -0.1, y: 51.5, label: "Burglary".to_string() },
                ScatterPoint { x: -0.3, y: 51.7, label: "Burglary".to_string() },
            ]
        );
    }

    #[test]
    fn test_histogram_counts_sum_to_row_count() {
        let table = cleaned_table();
        let dashboard = Dashboard::new(&DashboardConfig::default(), &table).unwrap();

        assert_eq!(dashboard.histogram.total(), table.height());
        assert_eq!(
            dashboard.histogram.bins[0],
            HistogramBin { category: "Burglary".to_string(), count: 2 }
        );
    }

    #[test]
    fn test_scatter_skips_missing_coordinates() {
        let df = df![
            "Longitude" => [Some(-0.1), None],
            "Latitude" => [Some(51.5), Some(51.6)],
            "Crime type" => ["Drugs", "Drugs"],
        ]
        .unwrap();
        let table = CleanedTable::new(df, CleaningReport::default());

        let dashboard = Dashboard::new(&DashboardConfig::default(), &table).unwrap();
        assert_eq!(dashboard.scatter.point_count(), 1);
        assert_eq!(dashboard.histogram.total(), 2);
    }

    #[test]
    fn test_missing_chart_column() {
        let config = DashboardConfig {
            category_column: "Outcome".to_string(),
            ..Default::default()
        };

        let err = Dashboard::new(&config, &cleaned_table()).unwrap_err();
        assert!(matches!(err, CrimeDataError::ColumnNotFound(ref c) if c == "Outcome"));
    }

    #[test]
    fn test_independent_dashboards() {
        let table = cleaned_table();
        let first = Dashboard::new(&DashboardConfig::default(), &table).unwrap();
        let second = Dashboard::new(
            &DashboardConfig {
                title: "Second".to_string(),
                ..Default::default()
            },
            &table,
        )
        .unwrap();

        assert_eq!(first.title, "Crime Data Dashboard");
        assert_eq!(second.title, "Second");
        assert_eq!(first.histogram, second.histogram);
    }

    #[test]
    fn test_dashboard_serializes_to_json() {
        let dashboard = Dashboard::new(&DashboardConfig::default(), &cleaned_table()).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(json["scatter"]["id"], "crime-scatter-plot");
        assert_eq!(json["histogram"]["bins"][1]["category"], "Drugs");
        assert_eq!(json["histogram"]["bins"][1]["count"], 1);
    }
}
