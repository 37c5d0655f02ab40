//! Aggregation of per-sample histograms into one plot.
//!
//! This module turns raw samples into:
//! - Category totals (data sum, background stack and error, signals)
//! - A composed plot with every histogram on common edges
//! - An integral-ordered background stack

pub mod category;
pub mod stack_builder;

// Re-export main types and functions
pub use category::{aggregate, Category, CategoryInputs, CategoryTotals};
pub use stack_builder::{compose, sort_stack, ComposedPlot};
