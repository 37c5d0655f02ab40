//! Event-count logfile.
//!
//! A LaTeX table with one column per sample (data, then background, then
//! signal) and one row per directory holding an `Events` histogram. Each
//! cell is the content of the reported bin; simulated samples also show
//! its error.

use crate::aggregator::Category;
use crate::parser::store::Sample;
use crate::utils::config::{EVENTS_HISTOGRAM, EVENTS_REPORT_BIN};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::Path;

/// One cell of the event table
#[derive(Debug, Clone, PartialEq)]
pub enum EventCell {
    /// Reported count; `error` is `None` for data
    Count { content: f64, error: Option<f64> },
    /// The sample has no `Events` histogram here
    Missing,
}

impl fmt::Display for EventCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCell::Count {
                content,
                error: None,
            } => write!(f, "{:.1}", content),
            EventCell::Count {
                content,
                error: Some(error),
            } => write!(f, "{:.1} $\\pm$ {:.1}", content, error),
            EventCell::Missing => f.write_str("-"),
        }
    }
}

/// Event counts of one directory across all samples
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub directory: String,
    pub cells: Vec<EventCell>,
}

impl EventRow {
    /// Read the `Events` counts at `path` from every sample.
    ///
    /// `samples` must already be in column order.
    pub fn collect(directory: impl Into<String>, path: &[String], samples: &[&Sample]) -> Self {
        let cells = samples
            .iter()
            .map(|sample| {
                let Some(events) = sample.histogram_at(path, EVENTS_HISTOGRAM) else {
                    debug!(
                        "'{}' has no {} histogram at /{}",
                        sample.title,
                        EVENTS_HISTOGRAM,
                        path.join("/")
                    );
                    return EventCell::Missing;
                };
                let Some(bin) = events.bins.get(EVENTS_REPORT_BIN) else {
                    return EventCell::Missing;
                };
                EventCell::Count {
                    content: bin.content,
                    error: (sample.category != Category::Data).then_some(bin.error),
                }
            })
            .collect();

        Self {
            directory: directory.into(),
            cells,
        }
    }
}

/// Full event table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    /// Sample titles, in column order
    pub header: Vec<String>,
    pub rows: Vec<EventRow>,
}

impl EventLog {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: EventRow) {
        self.rows.push(row);
    }

    /// Render the table as LaTeX
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("\\begin{{tabular}}{{l|{}}}\n", "c".repeat(self.header.len())));
        out.push_str(&format!(" & {} \\\\ \\hline\n", self.header.join(" & ")));
        for row in &self.rows {
            let cells: Vec<String> = row.cells.iter().map(EventCell::to_string).collect();
            out.push_str(&format!("{} & {} \\\\\n", row.directory, cells.join(" & ")));
        }
        out.push_str("\\end{tabular}\n");
        out
    }
}

/// Write the event table to `path`
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty or a directory
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_event_log(log: &EventLog, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    super::json::prepare_output_path(path)?;

    fs::write(path, log.render())?;
    info!("Event counts written to: {} ({} rows)", path.display(), log.rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{Bin, Histogram};
    use crate::parser::store::StoreEntry;
    use pretty_assertions::assert_eq;

    fn events(count: f64, error: f64) -> StoreEntry {
        StoreEntry::Histogram1D(
            Histogram::new(
                EVENTS_HISTOGRAM,
                vec![0.0, 1.0, 2.0],
                vec![Bin::new(100.0, 10.0), Bin::new(count, error)],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_cells_by_category() {
        let data = Sample::new(Category::Data, "data", vec![events(42.0, 6.5)]);
        let ttbar = Sample::new(Category::Background, "ttbar", vec![events(40.24, 2.04)]);
        let empty = Sample::new(Category::Signal, "stop", Vec::new());

        let row = EventRow::collect("root", &[], &[&data, &ttbar, &empty]);
        let cells: Vec<String> = row.cells.iter().map(ToString::to_string).collect();
        assert_eq!(cells, vec!["42.0", "40.2 $\\pm$ 2.0", "-"]);
    }

    #[test]
    fn test_render_table() {
        let mut log = EventLog::new(vec!["data".to_string(), "ttbar".to_string()]);
        log.push(EventRow {
            directory: "SR".to_string(),
            cells: vec![
                EventCell::Count {
                    content: 3.0,
                    error: None,
                },
                EventCell::Count {
                    content: 2.5,
                    error: Some(0.5),
                },
            ],
        });

        let expected = "\\begin{tabular}{l|cc}\n \
                        & data & ttbar \\\\ \\hline\n\
                        SR & 3.0 & 2.5 $\\pm$ 0.5 \\\\\n\
                        \\end{tabular}\n";
        assert_eq!(log.render(), expected);
    }

    #[test]
    fn test_write_event_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/events.log");
        write_event_log(&EventLog::new(vec!["bg".to_string()]), &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("\\begin{tabular}"));
    }
}
