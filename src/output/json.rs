//! Plot document output.
//!
//! The plot document is the hand-off to the renderer: every composed plot,
//! its bottom panel and the list of histograms that kept their original
//! binning, written as pretty-printed JSON.

use crate::derived::{BottomMode, SignificanceFormula};
use crate::pipeline::{PipelineReport, PlotProduct, SkipRecord};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Top-level document written for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDocument {
    /// Schema version for compatibility checking
    pub version: String,

    /// RFC 3339 timestamp of the run
    pub generated_at: String,

    /// Bottom panel actually drawn, `None` when only the top panel is
    pub bottom_mode: Option<BottomMode>,

    pub formula: SignificanceFormula,

    pub plots: Vec<PlotProduct>,

    /// Histograms drawn with their original binning
    pub skipped: Vec<SkipRecord>,
}

impl PlotDocument {
    /// Stamp a pipeline report with the schema version and current time
    pub fn from_report(report: &PipelineReport) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            bottom_mode: report.bottom_mode,
            formula: report.formula,
            plots: report.plots.clone(),
            skipped: report.skipped.clone(),
        }
    }
}

/// Write a plot document to a JSON file
///
/// # Arguments
/// * `document` - Document to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = run_pipeline(&samples, &binning, &style, &bottom)?;
/// write_plot_document(&PlotDocument::from_report(&report), "plots.json")?;
/// ```
pub fn write_plot_document(
    document: &PlotDocument,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing plot document to: {}", output_path.display());
    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    info!(
        "Plot document written successfully ({} plots, {} bytes)",
        document.plots.len(),
        calculate_file_size(output_path)
    );
    Ok(())
}

/// Read a plot document back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_plot_document(input_path: impl AsRef<Path>) -> Result<PlotDocument, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading plot document from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let document: PlotDocument = serde_json::from_reader(BufReader::new(file))
        .map_err(OutputError::SerializationFailed)?;

    debug!(
        "Plot document loaded: version {}, {} plots",
        document.version,
        document.plots.len()
    );
    Ok(document)
}

/// Validate `path` and create its parent directories
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_output_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
