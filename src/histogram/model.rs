//! Bin and histogram value types.
//!
//! A histogram is an ordered list of bins over a strictly increasing edge
//! sequence (`bins.len() + 1 == edges.len()`). Every transformation here
//! returns a new owned histogram; inputs are never modified behind the
//! caller's back.

use crate::utils::error::HistogramError;
use serde::{Deserialize, Deserializer, Serialize};

/// A single bin: accumulated content and its statistical error
///
/// Non-finite values (an undefined ratio bin, for instance) are written by
/// `serde_json` as `null` and read back as NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    #[serde(deserialize_with = "nullable_f64")]
    pub content: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub error: f64,
}

fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Bin {
    pub fn new(content: f64, error: f64) -> Self {
        Self { content, error }
    }
}

/// A one-dimensional histogram with variable-width bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Object name in the store (the key used to match samples)
    pub name: String,

    /// Display title, usually the sample title for stack members
    #[serde(default)]
    pub title: String,

    /// Bin edges, strictly increasing
    pub edges: Vec<f64>,

    /// Bin contents and errors
    pub bins: Vec<Bin>,
}

/// Check that `edges` can serve as bin edges for a histogram called `name`
pub fn check_edges(name: &str, edges: &[f64]) -> Result<(), HistogramError> {
    if edges.len() < 2 {
        return Err(HistogramError::TooFewEdges {
            name: name.to_string(),
            count: edges.len(),
        });
    }
    match edges.windows(2).position(|w| !(w[0] < w[1])) {
        Some(index) => Err(HistogramError::NonMonotonicEdges {
            name: name.to_string(),
            index: index + 1,
        }),
        None => Ok(()),
    }
}

impl Histogram {
    /// Build a histogram, validating edges against bins
    pub fn new(
        name: impl Into<String>,
        edges: Vec<f64>,
        bins: Vec<Bin>,
    ) -> Result<Self, HistogramError> {
        let hist = Self {
            name: name.into(),
            title: String::new(),
            edges,
            bins,
        };
        hist.validate()?;
        Ok(hist)
    }

    /// Build a histogram from parallel content and error slices
    pub fn from_contents(
        name: impl Into<String>,
        edges: Vec<f64>,
        contents: &[f64],
        errors: &[f64],
    ) -> Result<Self, HistogramError> {
        let name = name.into();
        if contents.len() != errors.len() {
            return Err(HistogramError::LengthMismatch {
                name,
                bins: contents.len(),
                edges: errors.len() + 1,
            });
        }
        let bins = contents
            .iter()
            .zip(errors)
            .map(|(&c, &e)| Bin::new(c, e))
            .collect();
        Self::new(name, edges, bins)
    }

    /// An all-zero, untitled histogram sharing this histogram's edges
    pub fn zeroed_like(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            edges: self.edges.clone(),
            bins: vec![Bin::default(); self.bins.len()],
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Check structural invariants
    pub fn validate(&self) -> Result<(), HistogramError> {
        check_edges(&self.name, &self.edges)?;
        if self.bins.len() + 1 != self.edges.len() {
            return Err(HistogramError::LengthMismatch {
                name: self.name.clone(),
                bins: self.bins.len(),
                edges: self.edges.len(),
            });
        }
        if let Some(index) = self.bins.iter().position(|b| b.error < 0.0) {
            return Err(HistogramError::NegativeError {
                name: self.name.clone(),
                index,
            });
        }
        Ok(())
    }

    pub fn n_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn x_min(&self) -> f64 {
        self.edges[0]
    }

    pub fn x_max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn low_edge(&self, index: usize) -> f64 {
        self.edges[index]
    }

    pub fn up_edge(&self, index: usize) -> f64 {
        self.edges[index + 1]
    }

    pub fn bin_width(&self, index: usize) -> f64 {
        self.edges[index + 1] - self.edges[index]
    }

    pub fn bin_center(&self, index: usize) -> f64 {
        0.5 * (self.edges[index] + self.edges[index + 1])
    }

    /// Sum of all bin contents
    pub fn integral(&self) -> f64 {
        self.bins.iter().map(|b| b.content).sum()
    }

    /// Sum of contents over bins `first..=last` and the quadrature sum of
    /// their errors. Indices past the last bin are clamped.
    pub fn integral_and_error(&self, first: usize, last: usize) -> (f64, f64) {
        if self.bins.is_empty() || first > last {
            return (0.0, 0.0);
        }
        let last = last.min(self.bins.len() - 1);
        let (sum, sum_w2) = self.bins[first.min(last)..=last]
            .iter()
            .fold((0.0, 0.0), |(s, w2), b| (s + b.content, w2 + b.error * b.error));
        (sum, sum_w2.sqrt())
    }

    pub fn same_edges(&self, other: &Histogram) -> bool {
        self.edges == other.edges
    }

    /// Add `other` bin by bin. Contents and errors both add linearly.
    pub fn add(&mut self, other: &Histogram) -> Result<(), HistogramError> {
        if !self.same_edges(other) {
            return Err(HistogramError::EdgeMismatch {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }
        for (mine, theirs) in self.bins.iter_mut().zip(&other.bins) {
            mine.content += theirs.content;
            mine.error += theirs.error;
        }
        Ok(())
    }

    /// Owned sum of `self` and `other`, see [`Histogram::add`]
    pub fn plus(&self, other: &Histogram) -> Result<Histogram, HistogramError> {
        let mut sum = self.clone();
        sum.add(other)?;
        Ok(sum)
    }

    /// Copy with every bin error set to zero
    pub fn with_zeroed_errors(mut self) -> Self {
        for bin in &mut self.bins {
            bin.error = 0.0;
        }
        self
    }

    /// Redistribute bins onto `new_edges`.
    ///
    /// Each original bin goes to the new bin containing its centre; contents
    /// add and errors add in quadrature. Original bins whose centre falls
    /// outside `new_edges` are dropped.
    pub fn rebin(&self, new_edges: &[f64]) -> Result<Histogram, HistogramError> {
        check_edges(&self.name, new_edges)?;

        let n_new = new_edges.len() - 1;
        let mut contents = vec![0.0; n_new];
        let mut sum_w2 = vec![0.0; n_new];

        for (index, bin) in self.bins.iter().enumerate() {
            let center = self.bin_center(index);
            if center < new_edges[0] || center >= new_edges[n_new] {
                continue;
            }
            // partition_point gives the first edge strictly above the centre
            let target = new_edges.partition_point(|&e| e <= center) - 1;
            contents[target] += bin.content;
            sum_w2[target] += bin.error * bin.error;
        }

        Ok(Histogram {
            name: self.name.clone(),
            title: self.title.clone(),
            edges: new_edges.to_vec(),
            bins: contents
                .into_iter()
                .zip(sum_w2)
                .map(|(c, w2)| Bin::new(c, w2.sqrt()))
                .collect(),
        })
    }
}
