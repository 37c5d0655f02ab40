//! Output writers for the renderer and the operator.
//!
//! This module handles writing:
//! - The JSON plot document consumed by the renderer
//! - The LaTeX event-count logfile

pub mod json;
pub mod logfile;

// Re-export main functions
pub use json::{read_plot_document, write_plot_document, PlotDocument};
pub use logfile::{write_event_log, EventCell, EventLog, EventRow};
