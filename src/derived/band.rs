//! Shaded uncertainty bands drawn around the background expectation.

use crate::histogram::Histogram;
use serde::{Deserialize, Serialize};

/// Per-bin rectangles: centre ± half width horizontally, value ± error vertically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBand {
    pub centers: Vec<f64>,
    pub half_widths: Vec<f64>,
    pub values: Vec<f64>,
    pub errors: Vec<f64>,
}

impl ErrorBand {
    /// Band around the stacked background: `content ± error`
    pub fn top(error_histogram: &Histogram) -> Self {
        Self::build(error_histogram, |content, error| (content, error))
    }

    /// Band around unity in the ratio panel: `1 ± error / content`.
    /// Empty bins get no spread.
    pub fn ratio(error_histogram: &Histogram) -> Self {
        Self::build(error_histogram, |content, error| {
            let spread = if content == 0.0 { 0.0 } else { error / content };
            (1.0, spread)
        })
    }

    fn build(hist: &Histogram, point: impl Fn(f64, f64) -> (f64, f64)) -> Self {
        let n = hist.n_bins();
        let mut band = ErrorBand {
            centers: Vec::with_capacity(n),
            half_widths: Vec::with_capacity(n),
            values: Vec::with_capacity(n),
            errors: Vec::with_capacity(n),
        };
        for (index, bin) in hist.bins.iter().enumerate() {
            let (value, error) = point(bin.content, bin.error);
            band.centers.push(hist.bin_center(index));
            band.half_widths.push(hist.bin_width(index) / 2.0);
            band.values.push(value);
            band.errors.push(error);
        }
        band
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Bin;

    fn error_hist() -> Histogram {
        Histogram::new(
            "error",
            vec![0.0, 2.0, 6.0],
            vec![Bin::new(8.0, 2.0), Bin::new(0.0, 0.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_top_band_follows_content() {
        let band = ErrorBand::top(&error_hist());
        assert_eq!(band.centers, vec![1.0, 4.0]);
        assert_eq!(band.half_widths, vec![1.0, 2.0]);
        assert_eq!(band.values, vec![8.0, 0.0]);
        assert_eq!(band.errors, vec![2.0, 0.0]);
    }

    #[test]
    fn test_ratio_band_is_relative() {
        let band = ErrorBand::ratio(&error_hist());
        assert_eq!(band.values, vec![1.0, 1.0]);
        assert_eq!(band.errors, vec![0.25, 0.0]);
        assert_eq!(band.len(), 2);
    }
}
