//! Report generation module.
//!
//! Builds the [`ComprehensiveReport`] of a run and writes it, the cleaned
//! table and the dashboard configuration to an output directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use crime_processing::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_comprehensive_report(&result, None)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "crimes")?;
//! ```

mod generator;

pub use generator::{ComprehensiveReport, ReportGenerator};
