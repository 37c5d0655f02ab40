//! Utility modules for configuration and error handling.

pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use config::{BottomConfig, RunConfig, SampleSpec, StyleConfig};
pub use error::{
    BinningError, ConfigError, HistogramError, OutputError, PipelineError, StoreError,
};
