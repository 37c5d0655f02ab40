//! Configuration and constants for the plotting pipeline.
//!
//! A [`RunConfig`] is the only configuration the pipeline sees. It is loaded
//! from TOML, optionally overridden from the command line, and then passed
//! down explicitly so every run is reproducible from the value alone.

use crate::aggregator::Category;
use crate::derived::{BottomMode, SignificanceFormula};
use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current plot document schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Tolerance used when walking preset bin widths up to the axis maximum
pub const EDGE_EPSILON: f64 = 1e-4;

/// Default target relative statistical error per merged bin
pub const DEFAULT_REBIN_LIMIT: f64 = 0.3;

/// Name of the cut-flow histogram reported in the logfile
pub const EVENTS_HISTOGRAM: &str = "Events";

/// Bin (0-based) of the cut-flow histogram holding the reported count
pub const EVENTS_REPORT_BIN: usize = 1;

/// Complete run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Where the plot document is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Where the event-count logfile is written
    #[serde(default = "default_logfile")]
    pub logfile: PathBuf,

    /// Optional explicit-binning file
    #[serde(default)]
    pub binning: Option<PathBuf>,

    #[serde(default)]
    pub style: StyleConfig,

    #[serde(default)]
    pub bottom: BottomConfig,

    /// Input samples, in the order they are listed
    #[serde(default, rename = "sample")]
    pub samples: Vec<SampleSpec>,
}

/// Rebinning and normalisation options
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleConfig {
    /// Target maximum relative statistical error per merged bin
    #[serde(default = "default_rebin_limit")]
    pub rebin_limit: f64,

    /// Rebinning is applied only if it produces more edges than this
    #[serde(default)]
    pub bin_limit: usize,

    /// Divide every bin by its width before hand-off
    #[serde(default)]
    pub divide_bins: bool,
}

/// Bottom panel options
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BottomConfig {
    #[serde(default)]
    pub mode: BottomMode,

    #[serde(default)]
    pub formula: SignificanceFormula,

    /// Skip the bottom panel entirely
    #[serde(default)]
    pub only_top: bool,
}

/// One input sample file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SampleSpec {
    pub category: Category,
    pub path: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("output.json")
}

fn default_logfile() -> PathBuf {
    PathBuf::from("events.log")
}

fn default_rebin_limit() -> f64 {
    DEFAULT_REBIN_LIMIT
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            rebin_limit: DEFAULT_REBIN_LIMIT,
            bin_limit: 0,
            divide_bins: false,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            logfile: default_logfile(),
            binning: None,
            style: StyleConfig::default(),
            bottom: BottomConfig::default(),
            samples: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Sample paths of one category, in configuration order
    pub fn samples_of(&self, category: Category) -> impl Iterator<Item = &Path> {
        self.samples
            .iter()
            .filter(move |s| s.category == category)
            .map(|s| s.path.as_path())
    }

    /// Make relative sample and binning paths relative to `base`
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        for sample in &mut self.samples {
            if sample.path.is_relative() {
                sample.path = base.join(&sample.path);
            }
        }
        if let Some(binning) = self.binning.take() {
            self.binning = Some(if binning.is_relative() {
                base.join(binning)
            } else {
                binning
            });
        }
        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.style.rebin_limit.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "rebin_limit must be finite, got {}",
                self.style.rebin_limit
            )));
        }
        Ok(())
    }
}

/// Load a run configuration from a TOML file
///
/// Relative sample paths are resolved against the directory holding the file.
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
/// * `ConfigError::Invalid` - If a value is out of range
pub fn load_config(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: RunConfig = toml::from_str(&contents)?;
    config.validate()?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.resolve_paths(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let text = r#"
            output = "plots.json"
            binning = "style/sample.binning"

            [style]
            rebin_limit = 0.2
            bin_limit = 3
            divide_bins = true

            [bottom]
            mode = "sig_right"
            formula = "s_over_sqrt_b"

            [[sample]]
            category = "data"
            path = "data.json"

            [[sample]]
            category = "background"
            path = "ttbar.json"
        "#;

        let config: RunConfig = toml::from_str(text).unwrap();
        assert_eq!(config.output, PathBuf::from("plots.json"));
        assert_eq!(config.style.rebin_limit, 0.2);
        assert_eq!(config.style.bin_limit, 3);
        assert!(config.style.divide_bins);
        assert_eq!(config.bottom.mode, BottomMode::SignificanceCumulativeRight);
        assert_eq!(config.bottom.formula, SignificanceFormula::SOverSqrtB);
        assert_eq!(config.samples_of(Category::Background).count(), 1);
        assert_eq!(config.samples_of(Category::Signal).count(), 0);
    }

    #[test]
    fn test_defaults() {
        let config: RunConfig = toml::from_str("").unwrap();
        assert_eq!(config.style.rebin_limit, DEFAULT_REBIN_LIMIT);
        assert_eq!(config.bottom.mode, BottomMode::Ratio);
        assert_eq!(config.bottom.formula, SignificanceFormula::SOverSqrtSPlusB);
        assert!(!config.bottom.only_top);
        assert!(config.samples.is_empty());
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = RunConfig::default();
        config.samples.push(SampleSpec {
            category: Category::Data,
            path: PathBuf::from("data.json"),
        });
        config.binning = Some(PathBuf::from("bins.txt"));

        let config = config.resolve_paths(Path::new("/runs/a"));
        assert_eq!(config.samples[0].path, PathBuf::from("/runs/a/data.json"));
        assert_eq!(config.binning, Some(PathBuf::from("/runs/a/bins.txt")));
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "[style\nrebin_limit = 0.3").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }
}
