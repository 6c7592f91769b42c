//! Output formats for chunk reports.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks. A [`ChunkReport`] can be written as:
//!
//! - [`Csv`](OutputFormat::Csv) - one semicolon-delimited row per chunk
//! - [`Json`](OutputFormat::Json) - the full report as one pretty-printed object
//! - [`Jsonl`](OutputFormat::Jsonl) - one chunk summary per line
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> tgpress::Result<()> {
//! use tgpress::core::{ChunkOptions, ChunkReport};
//! use tgpress::format::{OutputFormat, report_to_string};
//!
//! let report = ChunkReport::new("llamasass", &ChunkOptions::default(), &[]);
//! let csv = report_to_string(&report, OutputFormat::Csv)?;
//! assert!(csv.starts_with("Index;Posts;Comments;Weight;DateFrom;DateTo"));
//!
//! let format = OutputFormat::from_path("report.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::chunking::ChunkReport;
use crate::error::{PressError, Result};

/// Output format for chunk reports.
///
/// # Example
///
/// ```rust
/// use tgpress::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("jsonl").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV with semicolon delimiter, one row per chunk
    Csv,

    /// The full report as a JSON object (default)
    #[default]
    Json,

    /// JSON Lines - one chunk summary per line
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/x-ndjson",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// ```rust
    /// use tgpress::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/chunks.CSV").unwrap(), OutputFormat::Csv);
    /// assert!(OutputFormat::from_path("chunks.txt").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(PressError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: csv, json, jsonl"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

#[cfg(feature = "csv-output")]
fn report_to_csv(report: &ChunkReport) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(["Index", "Posts", "Comments", "Weight", "DateFrom", "DateTo"])?;
    for chunk in &report.chunks {
        writer.write_record([
            chunk.index.to_string(),
            chunk.posts_count.to_string(),
            chunk.comments_count.to_string(),
            chunk.total_weight.to_string(),
            chunk.date_from.clone().unwrap_or_default(),
            chunk.date_to.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PressError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(feature = "json-output")]
fn report_to_jsonl(report: &ChunkReport) -> Result<String> {
    let mut out = String::new();
    for chunk in &report.chunks {
        out.push_str(&serde_json::to_string(chunk)?);
        out.push('\n');
    }
    Ok(out)
}

/// Converts a report to a string in the specified format.
#[allow(unused_variables)]
pub fn report_to_string(report: &ChunkReport, format: OutputFormat) -> Result<String> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => report_to_csv(report),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => report_to_jsonl(report),
        #[allow(unreachable_patterns)]
        _ => Err(PressError::invalid_format(
            "output",
            format!(
                "Output format {:?} requires the '{}' feature to be enabled",
                format,
                match format {
                    OutputFormat::Csv => "csv-output",
                    OutputFormat::Json | OutputFormat::Jsonl => "json-output",
                }
            ),
        )),
    }
}

/// Writes a report to `path` in the specified format.
pub fn write_report(report: &ChunkReport, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let content = report_to_string(report, format)?;
    fs::write(path, content)?;
    Ok(())
}
