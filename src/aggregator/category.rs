//! Merge per-sample histograms into category totals.
//!
//! Data samples are summed as they are. Background samples feed two
//! outputs: zero-error copies kept for the stack, and an error histogram
//! that sums the un-zeroed contents and errors. Signal samples are never
//! summed; each one stays a separate zero-error series.

use crate::histogram::Histogram;
use crate::utils::error::PipelineError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input class of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Data,
    Background,
    Signal,
}

impl Category {
    /// All categories in reporting order
    pub const ALL: [Category; 3] = [Category::Data, Category::Background, Category::Signal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Background => "background",
            Category::Signal => "signal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw per-sample copies of one named histogram, grouped by category
#[derive(Debug, Clone, Default)]
pub struct CategoryInputs {
    pub data: Vec<Histogram>,
    pub background: Vec<Histogram>,
    pub signal: Vec<Histogram>,
}

impl CategoryInputs {
    pub fn push(&mut self, category: Category, hist: Histogram) {
        match category {
            Category::Data => self.data.push(hist),
            Category::Background => self.background.push(hist),
            Category::Signal => self.signal.push(hist),
        }
    }
}

/// Category totals for one named histogram
#[derive(Debug, Clone)]
pub struct CategoryTotals {
    /// Summed data, `None` when no data sample was given
    pub data: Option<Histogram>,

    /// Background samples with errors zeroed, in input order
    pub background_members: Vec<Histogram>,

    /// Sum of the zero-error background members
    pub background_total: Histogram,

    /// Sum of the background samples keeping their errors (linear sum)
    pub error_histogram: Histogram,

    /// Signal samples with errors zeroed, in input order
    pub signals: Vec<Histogram>,
}

/// Build category totals from raw per-sample histograms
///
/// # Errors
/// * `PipelineError::NoBackgrounds` - the background category is empty
/// * `PipelineError::Histogram` - samples do not share the same edges
pub fn aggregate(inputs: CategoryInputs) -> Result<CategoryTotals, PipelineError> {
    let CategoryInputs {
        data,
        background,
        signal,
    } = inputs;

    let first_background = background.first().ok_or(PipelineError::NoBackgrounds)?;
    debug!(
        "Aggregating '{}': {} data, {} background, {} signal samples",
        first_background.name,
        data.len(),
        background.len(),
        signal.len()
    );

    let data = sum_samples(&data, "data")?;

    let mut error_histogram = first_background.zeroed_like("error");
    let mut background_total = first_background.zeroed_like("background");
    let mut background_members = Vec::with_capacity(background.len());
    for sample in background {
        error_histogram.add(&sample)?;
        let member = sample.with_zeroed_errors();
        background_total.add(&member)?;
        background_members.push(member);
    }

    let signals = signal
        .into_iter()
        .map(Histogram::with_zeroed_errors)
        .collect();

    Ok(CategoryTotals {
        data,
        background_members,
        background_total,
        error_histogram,
        signals,
    })
}

/// Straight bin-by-bin sum, `None` for an empty list
fn sum_samples(samples: &[Histogram], name: &str) -> Result<Option<Histogram>, PipelineError> {
    let Some(first) = samples.first() else {
        return Ok(None);
    };
    let mut total = first.zeroed_like(name);
    for sample in samples {
        total.add(sample)?;
    }
    Ok(Some(total))
}

impl CategoryTotals {
    /// Everything that will be drawn, summed: error histogram, data (if
    /// any) and every signal. Drives the adaptive rebinning decision.
    pub fn reference(&self) -> Result<Histogram, PipelineError> {
        let mut full = self.error_histogram.zeroed_like("full");
        full.add(&self.error_histogram)?;
        if let Some(data) = &self.data {
            full.add(data)?;
        }
        for signal in &self.signals {
            full.add(signal)?;
        }
        Ok(full)
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Bin;

    fn sample(name: &str, title: &str, bins: &[(f64, f64)]) -> Histogram {
        let edges = (0..=bins.len()).map(|i| i as f64).collect();
        let bins = bins.iter().map(|&(c, e)| Bin::new(c, e)).collect();
        Histogram::new(name, edges, bins).unwrap().with_title(title)
    }

    #[test]
    fn test_background_totals_and_zeroed_members() {
        let mut inputs = CategoryInputs::default();
        inputs.push(Category::Background, sample("pt", "ttbar", &[(5.0, 0.1)]));
        inputs.push(Category::Background, sample("pt", "wjets", &[(3.0, 0.2)]));

        let totals = aggregate(inputs).unwrap();

        assert_eq!(totals.error_histogram.bins[0].content, 8.0);
        assert!((totals.error_histogram.bins[0].error - 0.3).abs() < 1e-12);
        assert_eq!(totals.background_total.bins[0], Bin::new(8.0, 0.0));
        assert_eq!(totals.background_members.len(), 2);
        assert!(totals
            .background_members
            .iter()
            .all(|m| m.bins.iter().all(|b| b.error == 0.0)));
        assert_eq!(totals.background_members[1].title, "wjets");
        assert!(totals.data.is_none());
    }

    #[test]
    fn test_data_keeps_errors_and_signals_stay_separate() {
        let mut inputs = CategoryInputs::default();
        inputs.push(Category::Background, sample("pt", "bg", &[(1.0, 1.0)]));
        inputs.push(Category::Data, sample("pt", "run1", &[(10.0, 3.0)]));
        inputs.push(Category::Data, sample("pt", "run2", &[(6.0, 2.0)]));
        inputs.push(Category::Signal, sample("pt", "s1", &[(2.0, 0.5)]));
        inputs.push(Category::Signal, sample("pt", "s2", &[(4.0, 0.5)]));

        let totals = aggregate(inputs).unwrap();

        assert_eq!(totals.data.as_ref().unwrap().bins[0], Bin::new(16.0, 5.0));
        assert_eq!(totals.signals.len(), 2);
        assert_eq!(totals.signals[1].bins[0], Bin::new(4.0, 0.0));

        let full = totals.reference().unwrap();
        assert_eq!(full.bins[0].content, 1.0 + 16.0 + 2.0 + 4.0);
    }

    #[test]
    fn test_empty_background_is_fatal() {
        let mut inputs = CategoryInputs::default();
        inputs.push(Category::Data, sample("pt", "run1", &[(1.0, 1.0)]));
        assert!(matches!(aggregate(inputs), Err(PipelineError::NoBackgrounds)));
    }

    #[test]
    fn test_mismatched_edges_are_rejected() {
        let mut inputs = CategoryInputs::default();
        inputs.push(Category::Background, sample("pt", "a", &[(1.0, 0.0)]));
        inputs.push(Category::Background, sample("pt", "b", &[(1.0, 0.0), (2.0, 0.0)]));
        assert!(matches!(aggregate(inputs), Err(PipelineError::Histogram(_))));
    }
}
