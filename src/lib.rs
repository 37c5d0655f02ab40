//! Histstack
//!
//! Aggregation of per-sample histograms into stacked comparison plots:
//! category sums, statistics-driven (or preset) rebinning, integral-ordered
//! background stacks, and ratio or significance series for the bottom
//! panel.
//!
//! This crate provides the core implementation for the `histstack` CLI
//! tool. Rendering is left to whatever consumes the plot document.
//!
//! ## Getting Started
//!
//! ```bash
//! histstack plot --background ttbar.json --data data.json --output plots.json
//! histstack --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod derived;
pub mod histogram;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod rebin;
pub mod utils;
