//! Bottom-panel series derived from a composed plot.
//!
//! This module handles:
//! - Choosing the bottom panel that the available samples can support
//! - Data/expectation ratios with their error band
//! - Expected-significance series (cumulative or per bin)
//! - Bin-width normalization of the top panel

pub mod band;
pub mod normalize;
pub mod ratio;
pub mod significance;

use crate::aggregator::ComposedPlot;
use crate::histogram::Histogram;
use crate::utils::error::HistogramError;
use log::warn;
use serde::{Deserialize, Serialize};

pub use band::ErrorBand;
pub use normalize::{divide_by_bin_width, normalize_plot};
pub use ratio::{divide, ratio_series};
pub use significance::{significance, significance_series};

/// What the bottom panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BottomMode {
    /// Data divided by the expectation
    #[default]
    #[serde(rename = "ratio")]
    Ratio,

    /// Significance integrated from the first bin up to each bin
    #[serde(rename = "sig_left")]
    SignificanceCumulativeLeft,

    /// Significance integrated from each bin up to the last bin
    #[serde(rename = "sig_right")]
    SignificanceCumulativeRight,

    /// Significance of each bin on its own
    #[serde(rename = "sig_bin")]
    SignificancePerBin,
}

impl BottomMode {
    pub fn is_significance(self) -> bool {
        !matches!(self, BottomMode::Ratio)
    }
}

impl std::fmt::Display for BottomMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BottomMode::Ratio => "ratio",
            BottomMode::SignificanceCumulativeLeft => "sig_left",
            BottomMode::SignificanceCumulativeRight => "sig_right",
            BottomMode::SignificancePerBin => "sig_bin",
        };
        f.write_str(label)
    }
}

/// Significance estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceFormula {
    /// `S / sqrt(S + B)`
    #[default]
    SOverSqrtSPlusB,

    /// `S / sqrt(B)`
    SOverSqrtB,
}

impl SignificanceFormula {
    /// Axis label used for the bottom panel
    pub fn label(self) -> &'static str {
        match self {
            SignificanceFormula::SOverSqrtSPlusB => "S/sqrt(S+B)",
            SignificanceFormula::SOverSqrtB => "S/sqrt(B)",
        }
    }
}

/// Series drawn in the bottom panel of one plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottomPanel {
    pub mode: BottomMode,

    /// Set for significance panels only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<SignificanceFormula>,

    pub series: Vec<Histogram>,

    /// Unity band for ratio panels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<ErrorBand>,
}

/// Decide which bottom panel the available samples allow.
///
/// Returns `None` when only the top panel can be drawn:
/// * no data and no signal
/// * a ratio requested without data falls back to left-cumulative significance
/// * a significance requested without signal falls back to the ratio
pub fn resolve_bottom_mode(
    requested: BottomMode,
    only_top: bool,
    has_data: bool,
    has_signal: bool,
) -> Option<BottomMode> {
    if only_top {
        return None;
    }

    if !has_data {
        if !has_signal {
            warn!("No data and no signal samples, drawing the top panel only");
            return None;
        }
        if requested == BottomMode::Ratio {
            warn!("No data sample for a ratio, switching to left-cumulative significance");
            return Some(BottomMode::SignificanceCumulativeLeft);
        }
    } else if !has_signal && requested.is_significance() {
        warn!("No signal sample for a significance, switching to the data/MC ratio");
        return Some(BottomMode::Ratio);
    }

    Some(requested)
}

/// Compute the bottom panel of `plot` from raw (not width-normalized) counts.
///
/// Returns `Ok(None)` for a ratio panel on a plot without data.
pub fn derive_bottom(
    plot: &ComposedPlot,
    mode: BottomMode,
    formula: SignificanceFormula,
) -> Result<Option<BottomPanel>, HistogramError> {
    let panel = match mode {
        BottomMode::Ratio => {
            let Some(data) = plot.data.as_ref() else {
                return Ok(None);
            };
            BottomPanel {
                mode,
                formula: None,
                series: ratio_series(data, &plot.error_histogram, &plot.signals)?,
                band: Some(ErrorBand::ratio(&plot.error_histogram)),
            }
        }
        _ => BottomPanel {
            mode,
            formula: Some(formula),
            series: significance_series(&plot.signals, &plot.error_histogram, mode, formula)?,
            band: None,
        },
    };
    Ok(Some(panel))
}
