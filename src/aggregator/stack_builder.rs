//! Put every histogram of a plot onto common edges and order the stack.
//!
//! Stack members are ordered by integral, smallest first, so the smallest
//! contribution sits at the bottom of the stack and the largest on top.

use super::category::CategoryTotals;
use crate::histogram::Histogram;
use crate::utils::error::HistogramError;
use log::debug;

/// All histograms of one plot, aligned on the same edges
#[derive(Debug, Clone)]
pub struct ComposedPlot {
    /// Background members, ascending by integral
    pub stack: Vec<Histogram>,

    pub signals: Vec<Histogram>,

    pub data: Option<Histogram>,

    /// Sum of stack members (zero errors)
    pub background_total: Histogram,

    /// Background sum carrying the combined statistical error
    pub error_histogram: Histogram,
}

impl ComposedPlot {
    /// Edges shared by every histogram in the plot
    pub fn edges(&self) -> &[f64] {
        &self.error_histogram.edges
    }
}

/// Rebin everything in `totals` onto `edges` and order the stack.
///
/// With `edges` set to `None` the original binning is kept. The inputs are
/// never modified; the returned plot owns fresh copies.
///
/// # Errors
/// * `HistogramError` - `edges` are not strictly increasing
pub fn compose(
    totals: &CategoryTotals,
    edges: Option<&[f64]>,
) -> Result<ComposedPlot, HistogramError> {
    let align = |hist: &Histogram| -> Result<Histogram, HistogramError> {
        match edges {
            Some(edges) => hist.rebin(edges),
            None => Ok(hist.clone()),
        }
    };

    let stack = totals
        .background_members
        .iter()
        .map(&align)
        .collect::<Result<Vec<_>, _>>()?;
    let signals = totals
        .signals
        .iter()
        .map(&align)
        .collect::<Result<Vec<_>, _>>()?;
    let data = totals.data.as_ref().map(&align).transpose()?;
    let background_total = align(&totals.background_total)?;
    let error_histogram = align(&totals.error_histogram)?;

    Ok(ComposedPlot {
        stack: sort_stack(stack),
        signals,
        data,
        background_total,
        error_histogram,
    })
}

/// Order stack members ascending by integral.
///
/// Selection procedure: repeatedly take the remaining member with the
/// smallest integral. Ties go to the member that came first, so equal
/// integrals keep their input order.
pub fn sort_stack(mut members: Vec<Histogram>) -> Vec<Histogram> {
    let mut ordered = Vec::with_capacity(members.len());

    while members.len() > 1 {
        let mut smallest = 0;
        for (index, member) in members.iter().enumerate().skip(1) {
            if members[smallest].integral() > member.integral() {
                smallest = index;
            }
        }
        ordered.push(members.remove(smallest));
    }
    ordered.extend(members);

    debug!(
        "Stack order: {:?}",
        ordered.iter().map(|h| h.title.as_str()).collect::<Vec<_>>()
    );
    ordered
}
