use crate::derived::BottomMode;
use std::path::PathBuf;

/// Arguments for the plot command
///
/// **Public** - used by main.rs to construct from CLI args. Every field left
/// unset falls back to the run configuration file (or its defaults).
#[derive(Debug, Clone, Default)]
pub struct PlotArgs {
    /// TOML run configuration
    pub config: Option<PathBuf>,

    /// Extra samples given on the command line
    pub data: Vec<PathBuf>,
    pub background: Vec<PathBuf>,
    pub signal: Vec<PathBuf>,

    /// Explicit-binning file
    pub binning: Option<PathBuf>,

    /// Output path for the plot document
    pub output: Option<PathBuf>,

    /// Output path for the event-count logfile
    pub logfile: Option<PathBuf>,

    /// Requested bottom panel
    pub bottom_mode: Option<BottomMode>,

    /// Use S/sqrt(B) instead of S/sqrt(S+B)
    pub s_over_sqrt_b: bool,

    /// Draw the top panel only
    pub only_top: bool,

    /// Target relative statistical error per merged bin
    pub rebin_limit: Option<f64>,

    /// Divide bins by their width
    pub divide_bins: bool,
}
