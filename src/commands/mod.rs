//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod plot;
pub mod utils;

// Re-export main command functions
pub use models::PlotArgs;
pub use plot::{execute_plot, resolve_config, validate_args};
pub use utils::{check_binning_file, display_schema, display_version};
