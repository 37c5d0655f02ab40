//! Statistics-driven bin merging.
//!
//! Bins are walked from the highest edge down. Consecutive bins are merged
//! until the accumulated relative statistical error drops below the limit,
//! at which point the merged bin is closed at its lower edge.

use crate::histogram::Histogram;
use log::debug;

/// Compute merged bin edges for `hist`, in decreasing order.
///
/// Returns an empty vector when the histogram has nothing to rebin on
/// (no content, or a non-positive integral). A `limit` of zero or below
/// closes a merged bin at every bin with positive content.
///
/// # Algorithm
/// 1. Bins with content <= 0 are skipped (absorbed by their neighbours)
/// 2. The upper edge of the first positive bin is the first edge
/// 3. Each visited bin rescales the running relative error squared by
///    `(acc / (acc + content))^2` and adds `2 * error^2 / acc^2`
/// 4. Once the relative error squared is below `limit^2` the lower edge
///    is emitted and the accumulators reset
/// 5. The lowest edge reached (and the axis minimum, when non-negative)
///    is appended if the walk did not end on it
pub fn adaptive_edges(hist: &Histogram, limit: f64) -> Vec<f64> {
    let mut edges = Vec::new();

    let has_entries = hist.bins.iter().any(|b| b.content != 0.0);
    if !has_entries || hist.integral() <= 0.0 {
        debug!("'{}' has no positive content, no adaptive edges", hist.name);
        return edges;
    }

    let limit2 = limit * limit;
    let close_every_bin = limit <= 0.0;
    let mut rel_err2 = 0.0;
    let mut accumulated = 0.0;
    let mut lowest_reached = None;

    for index in (0..hist.n_bins()).rev() {
        let bin = hist.bins[index];
        if bin.content <= 0.0 {
            continue;
        }
        if edges.is_empty() {
            edges.push(hist.up_edge(index));
        }
        lowest_reached = Some(hist.low_edge(index));

        if rel_err2 * accumulated != 0.0 {
            let shrink = accumulated / (accumulated + bin.content);
            rel_err2 *= shrink * shrink;
        }
        accumulated += bin.content;
        rel_err2 += 2.0 * bin.error * bin.error / (accumulated * accumulated);

        if close_every_bin || rel_err2 < limit2 {
            edges.push(hist.low_edge(index));
            rel_err2 = 0.0;
            accumulated = 0.0;
        }
    }

    if let Some(lowest) = lowest_reached {
        if edges.last() != Some(&lowest) {
            edges.push(lowest);
            let x_min = hist.x_min();
            if x_min >= 0.0 && lowest != x_min {
                edges.push(x_min);
            }
        }
    }

    debug!("'{}': {} adaptive edges at limit {}", hist.name, edges.len(), limit);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Bin;

    fn hist(bins: &[(f64, f64)]) -> Histogram {
        let edges = (0..=bins.len()).map(|i| i as f64).collect();
        let bins = bins.iter().map(|&(c, e)| Bin::new(c, e)).collect();
        Histogram::new("h", edges, bins).unwrap()
    }

    fn is_strictly_decreasing(edges: &[f64]) -> bool {
        edges.windows(2).all(|w| w[0] > w[1])
    }

    #[test]
    fn test_empty_histogram_gives_no_edges() {
        assert!(adaptive_edges(&hist(&[(0.0, 0.0), (0.0, 0.0)]), 0.3).is_empty());
        assert!(adaptive_edges(&hist(&[(-2.0, 1.0), (1.0, 1.0)]), 0.3).is_empty());
    }

    #[test]
    fn test_precise_bins_are_kept() {
        // relative error squared 2 * 1 / 100^2 is far below 0.3^2
        let h = hist(&[(100.0, 1.0), (100.0, 1.0), (100.0, 1.0)]);
        assert_eq!(adaptive_edges(&h, 0.3), vec![3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_imprecise_bins_are_merged() {
        // single bin: 2 * 4 / 16 = 0.5 > 0.09; two bins: 0.5/4 + 8/64 = 0.25
        // three bins: 0.25 * (8/12)^2 + 8/144 = 0.1667; four: 0.0938 + 0.03125
        let h = hist(&[(4.0, 2.0), (4.0, 2.0), (4.0, 2.0), (4.0, 2.0)]);
        let edges = adaptive_edges(&h, 0.3);
        assert_eq!(edges.first(), Some(&4.0));
        assert_eq!(edges.last(), Some(&0.0));
        assert!(is_strictly_decreasing(&edges));
        assert!(edges.len() < 5);
    }

    #[test]
    fn test_accumulated_error_is_rescaled() {
        // top bin: 2 * 4 / 16 = 0.5, open
        // next: 0.5 * (4/8)^2 + 2 * 1 / 64 = 0.15625 < 0.16, closes at 1
        let h = hist(&[(100.0, 1.0), (4.0, 1.0), (4.0, 2.0)]);
        assert_eq!(adaptive_edges(&h, 0.4), vec![3.0, 1.0, 0.0]);
    }

    #[test]
    fn test_leading_empty_bins_are_skipped() {
        let h = hist(&[(100.0, 1.0), (100.0, 1.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(adaptive_edges(&h, 0.3), vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_axis_minimum_is_appended() {
        // bottom bin empty, walk ends at 1.0 without closing
        let h = hist(&[(0.0, 0.0), (4.0, 4.0)]);
        assert_eq!(adaptive_edges(&h, 0.1), vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_non_positive_limit_closes_every_bin() {
        let h = hist(&[(1.0, 1.0), (0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(adaptive_edges(&h, 0.0), vec![3.0, 2.0, 0.0]);
    }
}
