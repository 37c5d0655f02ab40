//! Conversion of counts into densities (per unit of the x axis).

use crate::aggregator::ComposedPlot;
use crate::histogram::{Bin, Histogram};

/// Divide every bin content and error by its bin width
pub fn divide_by_bin_width(hist: &Histogram) -> Histogram {
    let bins = hist
        .bins
        .iter()
        .enumerate()
        .map(|(index, bin)| {
            let width = hist.bin_width(index);
            Bin::new(bin.content / width, bin.error / width)
        })
        .collect();

    Histogram {
        name: hist.name.clone(),
        title: hist.title.clone(),
        edges: hist.edges.clone(),
        bins,
    }
}

/// Normalize the top-panel histograms of `plot` in place.
///
/// Must run after the bottom panel has been derived; ratios and
/// significances are computed from raw counts.
pub fn normalize_plot(plot: &mut ComposedPlot) {
    if let Some(data) = plot.data.as_mut() {
        *data = divide_by_bin_width(data);
    }
    plot.error_histogram = divide_by_bin_width(&plot.error_histogram);
    plot.background_total = divide_by_bin_width(&plot.background_total);
    for member in plot.stack.iter_mut().chain(plot.signals.iter_mut()) {
        *member = divide_by_bin_width(member);
    }
}
