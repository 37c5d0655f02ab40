//! Input readers.
//!
//! This module handles:
//! - Parsing the explicit-binning file
//! - Loading sample stores (directory trees of histograms)

pub mod binning;
pub mod store;

// Re-export main types
pub use binning::{load_binning, parse_binning, ExplicitBinning};
pub use store::{load_sample, Directory, Sample, StoreEntry};
