//! Histogram value types shared by every pipeline stage.

pub mod model;

pub use model::{check_edges, Bin, Histogram};
