//! Expected-significance series for the bottom panel.

use super::{BottomMode, SignificanceFormula};
use crate::histogram::{Bin, Histogram};
use crate::utils::error::HistogramError;

/// Significance value and the stored error for integrals `s ± s_err` and
/// `b ± b_err`.
///
/// The stored error is `value * relative_error_squared` (not its square
/// root), matching the established output of this plot type.
pub fn significance(
    formula: SignificanceFormula,
    sig_int: f64,
    sig_err: f64,
    back_int: f64,
    back_err: f64,
) -> Bin {
    let (value, rel_err2) = match formula {
        SignificanceFormula::SOverSqrtSPlusB => {
            let total = sig_int + back_int;
            let value = sig_int / total.sqrt();
            let rel = (sig_err / sig_int - sig_err / (2.0 * total)).powi(2)
                + (back_err / (2.0 * total)).powi(2);
            (value, rel)
        }
        SignificanceFormula::SOverSqrtB => {
            let value = sig_int / back_int.sqrt();
            let rel = (sig_err / sig_int).powi(2) + (back_err / (2.0 * back_int)).powi(2);
            (value, rel)
        }
    };

    // a zero significance has no spread, even where the relative error is 0/0
    let error = if value == 0.0 {
        0.0
    } else {
        (value * rel_err2).abs()
    };
    Bin::new(value, error)
}

/// Bin range `(first, last)` integrated for bin `index` of `n_bins`
fn integration_range(mode: BottomMode, index: usize, n_bins: usize) -> (usize, usize) {
    match mode {
        BottomMode::SignificanceCumulativeLeft => (0, index),
        BottomMode::SignificanceCumulativeRight => (index, n_bins - 1),
        BottomMode::SignificancePerBin | BottomMode::Ratio => (index, index),
    }
}

/// One significance series per signal.
///
/// Each series starts as a copy of its signal; bins where both signal and
/// background are non-positive keep that copy's content.
pub fn significance_series(
    signals: &[Histogram],
    background: &Histogram,
    mode: BottomMode,
    formula: SignificanceFormula,
) -> Result<Vec<Histogram>, HistogramError> {
    signals
        .iter()
        .map(|signal| {
            if !signal.same_edges(background) {
                return Err(HistogramError::EdgeMismatch {
                    left: signal.name.clone(),
                    right: background.name.clone(),
                });
            }

            let n_bins = signal.n_bins();
            let mut series = signal.clone();
            for index in 0..n_bins {
                if signal.bins[index].content <= 0.0 && background.bins[index].content <= 0.0 {
                    continue;
                }
                let (first, last) = integration_range(mode, index, n_bins);
                let (sig_int, sig_err) = signal.integral_and_error(first, last);
                let (back_int, back_err) = background.integral_and_error(first, last);
                series.bins[index] = significance(formula, sig_int, sig_err, back_int, back_err);
            }
            Ok(series)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(bins: &[(f64, f64)]) -> Histogram {
        let edges = (0..=bins.len()).map(|i| i as f64).collect();
        let bins = bins.iter().map(|&(c, e)| Bin::new(c, e)).collect();
        Histogram::new("h", edges, bins).unwrap()
    }

    #[test]
    fn test_cumulative_left_single_bin() {
        let series = significance_series(
            &[hist(&[(10.0, 1.0)])],
            &hist(&[(4.0, 0.5)]),
            BottomMode::SignificanceCumulativeLeft,
            SignificanceFormula::SOverSqrtSPlusB,
        )
        .unwrap();

        let bin = series[0].bins[0];
        assert!((bin.content - 10.0 / 14.0_f64.sqrt()).abs() < 1e-12);
        assert!((bin.content - 2.6726).abs() < 1e-4);

        let rel = (1.0 / 10.0 - 1.0 / 28.0_f64).powi(2) + (0.5 / 28.0_f64).powi(2);
        assert!((bin.error - bin.content * rel).abs() < 1e-12);
    }

    #[test]
    fn test_per_bin_s_over_sqrt_b() {
        let series = significance_series(
            &[hist(&[(9.0, 0.0)])],
            &hist(&[(9.0, 0.0)]),
            BottomMode::SignificancePerBin,
            SignificanceFormula::SOverSqrtB,
        )
        .unwrap();
        assert_eq!(series[0].bins[0].content, 3.0);
    }

    #[test]
    fn test_cumulative_directions() {
        let signal = hist(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let background = hist(&[(4.0, 0.0), (4.0, 0.0), (4.0, 0.0)]);

        let left = significance_series(
            &[signal.clone()],
            &background,
            BottomMode::SignificanceCumulativeLeft,
            SignificanceFormula::SOverSqrtB,
        )
        .unwrap();
        let right = significance_series(
            &[signal],
            &background,
            BottomMode::SignificanceCumulativeRight,
            SignificanceFormula::SOverSqrtB,
        )
        .unwrap();

        // left bin 1 integrates bins 0..=1: 3 / sqrt(8)
        assert!((left[0].bins[1].content - 3.0 / 8.0_f64.sqrt()).abs() < 1e-12);
        // right bin 1 integrates bins 1..=2: 5 / sqrt(8)
        assert!((right[0].bins[1].content - 5.0 / 8.0_f64.sqrt()).abs() < 1e-12);
        // both cover everything at their far end
        assert_eq!(left[0].bins[2].content, right[0].bins[0].content);
    }

    #[test]
    fn test_empty_bins_keep_signal_copy() {
        let series = significance_series(
            &[hist(&[(0.0, 0.0), (4.0, 0.0)])],
            &hist(&[(0.0, 0.0), (4.0, 0.0)]),
            BottomMode::SignificancePerBin,
            SignificanceFormula::SOverSqrtSPlusB,
        )
        .unwrap();
        assert_eq!(series[0].bins[0], Bin::new(0.0, 0.0));
        assert!((series[0].bins[1].content - 4.0 / 8.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_signal_has_zero_error() {
        let bin = significance(SignificanceFormula::SOverSqrtB, 0.0, 0.0, 4.0, 0.0);
        assert_eq!(bin, Bin::new(0.0, 0.0));
    }
}
