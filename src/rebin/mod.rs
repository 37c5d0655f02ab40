//! Target bin edges for each plotted histogram.
//!
//! Edges come either from an explicit preset (when the histogram's name is
//! in the binning file) or from the adaptive rebinner run on the combined
//! content of everything drawn. Both produce decreasing edges; [`plan_rebin`]
//! reverses and validates them, and reports why rebinning was skipped when
//! the edges are unusable.

pub mod adaptive;
pub mod preset;

pub use adaptive::adaptive_edges;
pub use preset::{preset_edges, BinRule};

use crate::histogram::Histogram;
use crate::parser::binning::ExplicitBinning;
use crate::utils::config::StyleConfig;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Where a set of edges came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSource {
    Adaptive,
    Preset,
}

/// Why a histogram keeps its original binning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The edge walk produced nothing to rebin on
    NoUsableEdges,
    /// The produced edges were not strictly monotonic
    NonMonotonic,
    /// Fewer edges than the configured bin limit
    BelowBinLimit,
}

/// Result of planning the rebin of one named histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RebinOutcome {
    /// Rebin onto these strictly increasing edges
    Rebinned { source: EdgeSource, edges: Vec<f64> },
    /// Keep the original binning
    Kept { source: EdgeSource, reason: SkipReason },
}

impl RebinOutcome {
    /// Target edges, if rebinning goes ahead
    pub fn edges(&self) -> Option<&[f64]> {
        match self {
            RebinOutcome::Rebinned { edges, .. } => Some(edges),
            RebinOutcome::Kept { .. } => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            RebinOutcome::Rebinned { .. } => None,
            RebinOutcome::Kept { reason, .. } => Some(*reason),
        }
    }
}

/// Reverse decreasing edges into increasing ones.
///
/// Returns `None` unless every adjacent pair is strictly decreasing.
pub fn ascending_edges(descending: &[f64]) -> Option<Vec<f64>> {
    if descending.windows(2).any(|w| !(w[0] > w[1])) {
        return None;
    }
    Some(descending.iter().rev().copied().collect())
}

/// Decide the target edges for histogram `name`.
///
/// # Arguments
/// * `name` - Histogram name, looked up in `binning`
/// * `reference` - Combined histogram driving the adaptive walk
/// * `binning` - Explicit per-name presets
/// * `style` - Rebin limit and bin limit
pub fn plan_rebin(
    name: &str,
    reference: &Histogram,
    binning: &ExplicitBinning,
    style: &StyleConfig,
) -> RebinOutcome {
    let (source, descending) = match binning.rules_for(name) {
        Some(rules) => {
            debug!("'{}': using preset binning ({} rules)", name, rules.len());
            (
                EdgeSource::Preset,
                preset_edges(rules, reference.x_min(), reference.x_max()),
            )
        }
        None => (
            EdgeSource::Adaptive,
            adaptive_edges(reference, style.rebin_limit),
        ),
    };

    if descending.is_empty() {
        info!("'{}': no usable rebinning, keeping original bins", name);
        return RebinOutcome::Kept {
            source,
            reason: SkipReason::NoUsableEdges,
        };
    }

    let Some(edges) = ascending_edges(&descending) else {
        warn!(
            "'{}': rebin edges are not monotonic {:?}, keeping original bins",
            name, descending
        );
        return RebinOutcome::Kept {
            source,
            reason: SkipReason::NonMonotonic,
        };
    };

    if edges.len() < 2 {
        info!("'{}': a single edge cannot form a bin, keeping original bins", name);
        return RebinOutcome::Kept {
            source,
            reason: SkipReason::NoUsableEdges,
        };
    }

    if edges.len() <= style.bin_limit {
        info!(
            "'{}': {} edges do not exceed the bin limit {}, keeping original bins",
            name,
            edges.len(),
            style.bin_limit
        );
        return RebinOutcome::Kept {
            source,
            reason: SkipReason::BelowBinLimit,
        };
    }

    debug!("'{}': rebinning onto {} bins", name, edges.len() - 1);
    RebinOutcome::Rebinned { source, edges }
}
