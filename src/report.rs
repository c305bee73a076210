//! # Report Module
//!
//! This module provides functionality for generating machine-readable reports
//! of a check run in JSON or CSV.
//!
//! A report holds the run's summary counts and one record per violation,
//! including whether its fix was applied.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::processor::CheckRun;
use crate::violation::Violation;

/// One violation as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
  /// Project-relative path of the file
  pub path: String,
  /// 1-based line of the first mismatch
  pub line: usize,
  pub kind: String,
  pub message: String,
  /// Description of the fix
  pub fix: String,
  /// Whether the fix was applied during this run
  pub fixed: bool,
}

impl ViolationReport {
  pub fn new(violation: &Violation, fixed: bool) -> Self {
    Self {
      path: violation.display_path().to_string(),
      line: violation.line + 1,
      kind: violation.kind.to_string(),
      message: violation.message.clone(),
      fix: violation.fix_description().to_string(),
      fixed,
    }
  }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

/// Error returned when parsing a string into a ReportFormat fails
#[derive(Debug, thiserror::Error)]
#[error("Invalid report format: {0}")]
pub struct ParseReportFormatError(pub String);

impl std::str::FromStr for ReportFormat {
  type Err = ParseReportFormatError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "json" => Ok(ReportFormat::Json),
      "csv" => Ok(ReportFormat::Csv),
      _ => Err(ParseReportFormatError(s.to_string())),
    }
  }
}

/// Summary of a check run
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  pub files_checked: usize,
  pub files_ok: usize,
  pub files_with_violations: usize,
  pub files_ignored: usize,
  /// Number of violations found
  pub violations: usize,
  /// Number of violations whose fix was applied
  pub fixed: usize,
  /// Number of files that could not be checked
  pub errors: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: std::time::Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the report was generated
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl ProcessingSummary {
  /// Create a summary from a check run and the number of applied fixes
  pub fn from_run(run: &CheckRun, fixed: usize, processing_time: std::time::Duration) -> Self {
    Self {
      files_checked: run.files_checked,
      files_ok: run.files_ok(),
      files_with_violations: run.files_with_violations(),
      files_ignored: run.files_ignored,
      violations: run.violations.len(),
      fixed,
      errors: run.errors.len(),
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Some(Local::now().timestamp()),
    }
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  summary: &'a ProcessingSummary,
  violations: &'a [ViolationReport],
}

/// Report Generator for writing run reports
pub struct ReportGenerator<'a> {
  /// Format of the report to generate
  format: ReportFormat,
  /// Path where the report will be saved
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  /// Create a new report generator
  ///
  /// # Parameters
  ///
  /// * `format` - The format to use for the report
  /// * `output_path` - The path where the report will be saved
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  /// Generate a report and write it to the output path
  ///
  /// # Errors
  ///
  /// Returns an error if the report cannot be serialized or written.
  pub fn generate(&self, violations: &[ViolationReport], summary: &ProcessingSummary) -> Result<()> {
    let content = self.render(violations, summary)?;

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write {} report to {}", self.format, self.output_path.display()))
  }

  /// Render the report content without writing it
  ///
  /// # Errors
  ///
  /// Returns an error if JSON serialization fails.
  pub fn render(&self, violations: &[ViolationReport], summary: &ProcessingSummary) -> Result<String> {
    match self.format {
      ReportFormat::Json => Self::generate_json(violations, summary),
      ReportFormat::Csv => Ok(Self::generate_csv(violations, summary)),
    }
  }

  fn generate_json(violations: &[ViolationReport], summary: &ProcessingSummary) -> Result<String> {
    let report = JsonReport { summary, violations };
    serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")
  }

  fn generate_csv(violations: &[ViolationReport], summary: &ProcessingSummary) -> String {
    let mut csv = String::new();

    csv.push_str("path,line,kind,message,fix,fixed\n");

    for violation in violations {
      csv.push_str(&format!(
        "{},{},{},{},{},{}\n",
        csv_field(&violation.path),
        violation.line,
        csv_field(&violation.kind),
        csv_field(&violation.message),
        csv_field(&violation.fix),
        violation.fixed
      ));
    }

    csv.push_str("\n# Summary\n");
    csv.push_str(&format!("Files checked,{}\n", summary.files_checked));
    csv.push_str(&format!("Files OK,{}\n", summary.files_ok));
    csv.push_str(&format!("Files with violations,{}\n", summary.files_with_violations));
    csv.push_str(&format!("Files ignored,{}\n", summary.files_ignored));
    csv.push_str(&format!("Violations,{}\n", summary.violations));
    csv.push_str(&format!("Fixed,{}\n", summary.fixed));
    csv.push_str(&format!("Errors,{}\n", summary.errors));
    csv.push_str(&format!(
      "Processing time (seconds),{:.2}\n",
      summary.processing_time.as_secs_f64()
    ));
    csv.push_str(&format!("Generated on,{}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    csv
  }
}

/// Quotes a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use tempfile::TempDir;

  use super::*;

  fn sample() -> (Vec<ViolationReport>, ProcessingSummary) {
    let violations = vec![ViolationReport {
      path: "/src/a.py".to_string(),
      line: 1,
      kind: "License Header Mismatch".to_string(),
      message: "\"# Copyright 2023 Acme\" != \"# Copyright 2024 Acme\"".to_string(),
      fix: "Replace Header".to_string(),
      fixed: false,
    }];

    let run = CheckRun {
      files_checked: 3,
      files_ignored: 1,
      ..CheckRun::default()
    };
    let mut summary = ProcessingSummary::from_run(&run, 0, Duration::from_millis(250));
    summary.files_with_violations = 1;
    summary.files_ok = 2;
    summary.violations = 1;

    (violations, summary)
  }

  #[test]
  fn test_parse_report_format() {
    assert_eq!("json".parse::<ReportFormat>().expect("json"), ReportFormat::Json);
    assert_eq!("CSV".parse::<ReportFormat>().expect("csv"), ReportFormat::Csv);
    assert!("html".parse::<ReportFormat>().is_err());
  }

  #[test]
  fn test_json_report() {
    let (violations, summary) = sample();
    let content = ReportGenerator::new(ReportFormat::Json, Path::new("unused"))
      .render(&violations, &summary)
      .expect("render json");

    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["summary"]["files_checked"], 3);
    assert_eq!(value["summary"]["files_with_violations"], 1);
    assert_eq!(value["summary"]["processing_time_seconds"], 0.25);
    assert_eq!(value["violations"][0]["path"], "/src/a.py");
    assert_eq!(value["violations"][0]["fix"], "Replace Header");
    assert_eq!(value["violations"][0]["fixed"], false);
  }

  #[test]
  fn test_csv_report_quotes_fields() {
    let (violations, summary) = sample();
    let content = ReportGenerator::new(ReportFormat::Csv, Path::new("unused"))
      .render(&violations, &summary)
      .expect("render csv");

    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("path,line,kind,message,fix,fixed"));
    assert_eq!(
      lines.next(),
      Some("/src/a.py,1,License Header Mismatch,\"\"\"# Copyright 2023 Acme\"\" != \"\"# Copyright 2024 Acme\"\"\",Replace Header,false")
    );
    assert!(content.contains("Files checked,3\n"));
    assert!(content.contains("Files ignored,1\n"));
  }

  #[test]
  fn test_generate_writes_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let output = temp_dir.path().join("report.json");
    let (violations, summary) = sample();

    ReportGenerator::new(ReportFormat::Json, &output)
      .generate(&violations, &summary)
      .expect("generate report");

    assert!(output.exists());
  }

  #[test]
  fn test_csv_field() {
    assert_eq!(csv_field("plain"), "plain");
    assert_eq!(csv_field("a,b"), "\"a,b\"");
    assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
  }
}
