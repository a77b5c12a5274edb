use crate::charts::Dashboard;
use crate::error::{Result, ResultExt};
use crate::profiler::DataProfiler;
use crate::types::{
    CategoricalSummary, CleanedTable, CleaningReport, DatasetProfile, LoadedFile, NumericSummary,
    PipelineResult,
};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Comprehensive Report Types
// ============================================================================

/// Everything known about one run, for `--json` output, `--emit-report`
/// files and library callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    /// Local time the report was built
    pub generated_at: String,
    /// Dataset directory that was loaded
    pub input_dir: String,
    /// Cleaned CSV path, if one was written
    pub output_file: Option<String>,
    /// Files read, in load order
    pub files: Vec<LoadedFile>,
    pub cleaning: CleaningReport,
    /// Profile of the combined table before cleaning
    pub profile_before: DatasetProfile,
    pub profile_after: DatasetProfile,
    pub numeric_summary: Vec<NumericSummary>,
    pub categorical_summary: Vec<CategoricalSummary>,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes reports, cleaned tables and chart configuration under one output
/// directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Build a comprehensive report from a pipeline run.
    pub fn build_comprehensive_report(
        result: &PipelineResult,
        output_file: Option<&Path>,
    ) -> Result<ComprehensiveReport> {
        let cleaned = result.cleaned.data();

        Ok(ComprehensiveReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_dir: result.input_dir.display().to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            files: result.files.clone(),
            cleaning: result.cleaned.report().clone(),
            profile_before: result.profile_before.clone(),
            profile_after: DataProfiler::profile(cleaned),
            numeric_summary: DataProfiler::describe_numeric(cleaned)?,
            categorical_summary: DataProfiler::describe_categorical(cleaned)?,
        })
    }

    /// Write a comprehensive report to `<base>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &ComprehensiveReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        self.write_json(&report_path, report)?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the chart configuration to `<name>_dashboard.json`.
    pub fn write_dashboard(&self, dashboard: &Dashboard, name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}_dashboard.json", name));
        self.write_json(&path, dashboard)?;

        info!("Dashboard configuration saved: {}", path.display());
        Ok(path)
    }

    /// Save the cleaned table to `<name>.csv`.
    pub fn save_cleaned_dataset(&self, table: &CleanedTable, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(format!("{}.csv", name));
        let mut file = File::create(&output_path)?;

        let mut df = table.data().clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .context(format!("Writing '{}'", output_path.display()))?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::DashboardConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn pipeline_result() -> PipelineResult {
        let df = df![
            "Longitude" => [-0.1, -0.2],
            "Latitude" => [51.5, 51.6],
            "Crime type" => ["Burglary", "Drugs"],
        ]
        .unwrap();
        PipelineResult {
            input_dir: PathBuf::from("Dataset"),
            files: vec![LoadedFile {
                path: PathBuf::from("Dataset/2023-01-street.csv"),
                rows: 2,
                columns: 3,
            }],
            profile_before: DataProfiler::profile(&df),
            cleaned: CleanedTable::new(df, CleaningReport::default()),
        }
    }

    #[test]
    fn test_build_comprehensive_report() {
        let report = ReportGenerator::build_comprehensive_report(&pipeline_result(), None).unwrap();

        assert_eq!(report.input_dir, "Dataset");
        assert_eq!(report.output_file, None);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.profile_after.shape, (2, 3));
        assert_eq!(report.numeric_summary.len(), 2);
        assert_eq!(report.categorical_summary[0].column, "Crime type");
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = TempDir::new().unwrap();
        let generator = ReportGenerator::new(dir.path().join("out"));
        let report = ReportGenerator::build_comprehensive_report(&pipeline_result(), None).unwrap();

        let path = generator.write_report_to_file(&report, "crimes").unwrap();

        assert_eq!(path, dir.path().join("out").join("crimes_report.json"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["input_dir"], "Dataset");
        assert_eq!(json["files"][0]["rows"], 2);
    }

    #[test]
    fn test_save_cleaned_dataset() {
        let dir = TempDir::new().unwrap();
        let generator = ReportGenerator::new(dir.path());
        let result = pipeline_result();

        let path = generator.save_cleaned_dataset(&result.cleaned, "crimes_cleaned").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Longitude,Latitude,Crime type"));
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_write_dashboard() {
        let dir = TempDir::new().unwrap();
        let generator = ReportGenerator::new(dir.path());
        let result = pipeline_result();
        let dashboard = Dashboard::new(&DashboardConfig::default(), &result.cleaned).unwrap();

        let path = generator.write_dashboard(&dashboard, "crimes").unwrap();

        assert!(path.ends_with("crimes_dashboard.json"));
        let parsed: Dashboard =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, dashboard);
    }
}
