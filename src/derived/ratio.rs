//! Data over expectation ratio series.

use crate::histogram::{Bin, Histogram};
use crate::utils::error::HistogramError;

/// Name of the plain data/background series
pub const DATA_OVER_BACKGROUND: &str = "data_over_background";

/// Bin-by-bin `numerator / denominator` with uncorrelated error propagation.
///
/// A zero denominator leaves whatever the division produces (inf or NaN);
/// consumers must guard against it.
pub fn divide(
    numerator: &Histogram,
    denominator: &Histogram,
) -> Result<Histogram, HistogramError> {
    if !numerator.same_edges(denominator) {
        return Err(HistogramError::EdgeMismatch {
            left: numerator.name.clone(),
            right: denominator.name.clone(),
        });
    }

    let bins = numerator
        .bins
        .iter()
        .zip(&denominator.bins)
        .map(|(n, d)| {
            let content = n.content / d.content;
            let d2 = d.content * d.content;
            let error = ((n.error * n.error * d2 + d.error * d.error * n.content * n.content)
                / (d2 * d2))
                .sqrt();
            Bin::new(content, error)
        })
        .collect();

    Ok(Histogram {
        name: numerator.name.clone(),
        title: numerator.title.clone(),
        edges: numerator.edges.clone(),
        bins,
    })
}

/// One `data / (background + signal)` series per signal, then the plain
/// `data / background` series last.
pub fn ratio_series(
    data: &Histogram,
    background: &Histogram,
    signals: &[Histogram],
) -> Result<Vec<Histogram>, HistogramError> {
    let mut series = Vec::with_capacity(signals.len() + 1);

    for signal in signals {
        let expected = signal.plus(background)?;
        let mut ratio = divide(data, &expected)?;
        ratio.name = signal.name.clone();
        ratio.title = signal.title.clone();
        series.push(ratio);
    }

    let mut plain = divide(data, background)?;
    plain.name = DATA_OVER_BACKGROUND.to_string();
    plain.title = "Data/MC".to_string();
    series.push(plain);

    Ok(series)
}
