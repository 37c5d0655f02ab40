//! Per-histogram plotting pipeline.
//!
//! The directory layout of the first background sample drives the walk.
//! For every 1-D histogram found there, the same-named histogram is
//! gathered from each sample and run through:
//!
//! 1. Category aggregation
//! 2. Rebin planning (preset or adaptive)
//! 3. Stack composition on the chosen edges
//! 4. Bottom-panel derivation
//! 5. Optional bin-width normalization
//!
//! Histograms whose rebinning is unusable keep their original binning and
//! are recorded as skips; they are never dropped.

use crate::aggregator::{aggregate, compose, Category, CategoryInputs};
use crate::derived::{
    derive_bottom, normalize_plot, resolve_bottom_mode, BottomMode, BottomPanel, ErrorBand,
    SignificanceFormula,
};
use crate::histogram::Histogram;
use crate::output::logfile::{EventLog, EventRow};
use crate::parser::binning::ExplicitBinning;
use crate::parser::store::{Directory, Sample, StoreEntry};
use crate::rebin::{plan_rebin, EdgeSource, RebinOutcome, SkipReason};
use crate::utils::config::{BottomConfig, StyleConfig, EVENTS_HISTOGRAM};
use crate::utils::error::PipelineError;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything the renderer needs for one plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotProduct {
    /// Directory path from the store root, `/`-separated
    pub path: String,
    pub name: String,

    /// Edges every histogram below is binned on
    pub edges: Vec<f64>,
    pub rebin: RebinOutcome,

    /// Background members, smallest integral first
    pub stack: Vec<Histogram>,
    pub signals: Vec<Histogram>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Histogram>,

    pub background_total: Histogram,
    pub top_band: ErrorBand,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BottomPanel>,
}

/// A histogram that kept its original binning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub path: String,
    pub name: String,
    pub source: EdgeSource,
    pub reason: SkipReason,
}

/// Result of a full pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Bottom mode after adjusting to the available samples, `None` for top only
    pub bottom_mode: Option<BottomMode>,
    pub formula: SignificanceFormula,
    pub plots: Vec<PlotProduct>,
    pub skipped: Vec<SkipRecord>,
    pub events: EventLog,
}

/// Pipeline over a fixed set of loaded samples
pub struct Pipeline<'a> {
    /// Samples in column order: data, background, signal
    samples: Vec<&'a Sample>,
    layout: &'a Sample,
    binning: &'a ExplicitBinning,
    style: &'a StyleConfig,
    bottom_mode: Option<BottomMode>,
    formula: SignificanceFormula,
}

impl<'a> Pipeline<'a> {
    /// Prepare a run and settle the bottom panel.
    ///
    /// # Errors
    /// * `PipelineError::NoBackgrounds` - no background sample was given
    pub fn new(
        samples: &'a [Sample],
        binning: &'a ExplicitBinning,
        style: &'a StyleConfig,
        bottom: &BottomConfig,
    ) -> Result<Self, PipelineError> {
        let ordered: Vec<&Sample> = Category::ALL
            .iter()
            .flat_map(|category| samples.iter().filter(move |s| s.category == *category))
            .collect();

        let layout = ordered
            .iter()
            .copied()
            .find(|s| s.category == Category::Background)
            .ok_or(PipelineError::NoBackgrounds)?;

        let has_data = ordered.iter().any(|s| s.category == Category::Data);
        let has_signal = ordered.iter().any(|s| s.category == Category::Signal);
        let bottom_mode = resolve_bottom_mode(bottom.mode, bottom.only_top, has_data, has_signal);

        info!(
            "Pipeline ready: {} samples, layout from '{}', bottom panel: {}",
            ordered.len(),
            layout.title,
            bottom_mode.map_or_else(|| "none".to_string(), |m| m.to_string())
        );

        Ok(Self {
            samples: ordered,
            layout,
            binning,
            style,
            bottom_mode,
            formula: bottom.formula,
        })
    }

    pub fn bottom_mode(&self) -> Option<BottomMode> {
        self.bottom_mode
    }

    /// Walk the layout tree and build every plot
    ///
    /// # Errors
    /// * `PipelineError::Histogram` - samples disagree on a histogram's binning
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let header = self.samples.iter().map(|s| s.title.clone()).collect();
        let mut report = PipelineReport {
            bottom_mode: self.bottom_mode,
            formula: self.formula,
            plots: Vec::new(),
            skipped: Vec::new(),
            events: EventLog::new(header),
        };

        let mut path = Vec::new();
        self.walk(&self.layout.root, &mut path, &mut report)?;

        info!(
            "Built {} plots ({} kept their original binning)",
            report.plots.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn walk(
        &self,
        dir: &Directory,
        path: &mut Vec<String>,
        report: &mut PipelineReport,
    ) -> Result<(), PipelineError> {
        if dir.histogram(EVENTS_HISTOGRAM).is_some() {
            report
                .events
                .push(EventRow::collect(&dir.name, path, &self.samples));
        }

        for entry in &dir.entries {
            match entry {
                StoreEntry::Histogram1D(hist) => {
                    let product = self.plot(path, &hist.name)?;
                    if let Some(reason) = product.rebin.skip_reason() {
                        report.skipped.push(SkipRecord {
                            path: product.path.clone(),
                            name: product.name.clone(),
                            source: edge_source(&product.rebin),
                            reason,
                        });
                    }
                    report.plots.push(product);
                }
                StoreEntry::Subdirectory(sub) => {
                    debug!("Entering directory /{}", join_path(path, &sub.name));
                    path.push(sub.name.clone());
                    self.walk(sub, path, report)?;
                    path.pop();
                }
                StoreEntry::Unsupported => {
                    debug!("Skipping unsupported entry in /{}", path.join("/"));
                }
            }
        }
        Ok(())
    }

    /// Build the plot for histogram `name` in directory `path`
    pub fn plot(&self, path: &[String], name: &str) -> Result<PlotProduct, PipelineError> {
        let mut inputs = CategoryInputs::default();
        for sample in &self.samples {
            match sample.histogram_at(path, name) {
                Some(hist) => inputs.push(sample.category, hist),
                None => debug!("'{}' has no '{}', leaving it out", sample.title, name),
            }
        }

        let totals = aggregate(inputs)?;
        let reference = totals.reference()?;
        let rebin = plan_rebin(name, &reference, self.binning, self.style);
        let mut plot = compose(&totals, rebin.edges())?;

        let bottom = match self.bottom_mode {
            Some(mode) => derive_bottom(&plot, mode, self.formula)?,
            None => None,
        };

        if self.style.divide_bins {
            normalize_plot(&mut plot);
        }

        Ok(PlotProduct {
            path: path.join("/"),
            name: name.to_string(),
            edges: plot.edges().to_vec(),
            rebin,
            top_band: ErrorBand::top(&plot.error_histogram),
            stack: plot.stack,
            signals: plot.signals,
            data: plot.data,
            background_total: plot.background_total,
            bottom,
        })
    }
}

/// Run the whole pipeline over `samples`
///
/// # Errors
/// * `PipelineError::NoBackgrounds` - no background sample was given
/// * `PipelineError::Histogram` - samples disagree on a histogram's binning
pub fn run_pipeline(
    samples: &[Sample],
    binning: &ExplicitBinning,
    style: &StyleConfig,
    bottom: &BottomConfig,
) -> Result<PipelineReport, PipelineError> {
    Pipeline::new(samples, binning, style, bottom)?.run()
}

fn edge_source(outcome: &RebinOutcome) -> EdgeSource {
    match outcome {
        RebinOutcome::Rebinned { source, .. } | RebinOutcome::Kept { source, .. } => *source,
    }
}

fn join_path(path: &[String], name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", path.join("/"), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Bin;
    use crate::rebin::BinRule;

    fn hist(name: &str, contents: &[f64]) -> StoreEntry {
        let edges = (0..=contents.len()).map(|i| i as f64).collect();
        let bins = contents.iter().map(|&c| Bin::new(c, c.sqrt())).collect();
        StoreEntry::Histogram1D(Histogram::new(name, edges, bins).unwrap())
    }

    fn sample(category: Category, title: &str, contents: &[f64]) -> Sample {
        Sample::new(category, title, vec![hist("pt", contents)])
    }

    fn style(rebin_limit: f64) -> StyleConfig {
        StyleConfig {
            rebin_limit,
            ..StyleConfig::default()
        }
    }

    #[test]
    fn test_no_backgrounds_is_fatal() {
        let samples = vec![sample(Category::Data, "data", &[1.0])];
        let result = run_pipeline(
            &samples,
            &ExplicitBinning::default(),
            &StyleConfig::default(),
            &BottomConfig::default(),
        );
        assert!(matches!(result, Err(PipelineError::NoBackgrounds)));
    }

    #[test]
    fn test_ratio_plot() {
        let samples = vec![
            sample(Category::Background, "ttbar", &[80.0]),
            sample(Category::Data, "data", &[100.0]),
        ];
        let report = run_pipeline(
            &samples,
            &ExplicitBinning::default(),
            &style(10.0),
            &BottomConfig::default(),
        )
        .unwrap();

        assert_eq!(report.bottom_mode, Some(BottomMode::Ratio));
        assert_eq!(report.plots.len(), 1);
        let bottom = report.plots[0].bottom.as_ref().unwrap();
        assert_eq!(bottom.series.len(), 1);
        assert_eq!(bottom.series[0].bins[0].content, 1.25);
    }

    #[test]
    fn test_missing_data_switches_to_significance() {
        let samples = vec![
            sample(Category::Signal, "stop", &[10.0]),
            sample(Category::Background, "ttbar", &[4.0]),
        ];
        let report = run_pipeline(
            &samples,
            &ExplicitBinning::default(),
            &style(10.0),
            &BottomConfig::default(),
        )
        .unwrap();

        assert_eq!(report.bottom_mode, Some(BottomMode::SignificanceCumulativeLeft));
        let bottom = report.plots[0].bottom.as_ref().unwrap();
        // signals are drawn with zero error, the background keeps sqrt(4)
        assert!((bottom.series[0].bins[0].content - 10.0 / 14.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_only_backgrounds_draws_top_only() {
        let samples = vec![sample(Category::Background, "ttbar", &[4.0, 4.0])];
        let report = run_pipeline(
            &samples,
            &ExplicitBinning::default(),
            &StyleConfig::default(),
            &BottomConfig::default(),
        )
        .unwrap();
        assert_eq!(report.bottom_mode, None);
        assert!(report.plots[0].bottom.is_none());
    }

    #[test]
    fn test_unusable_rebin_is_recorded() {
        let samples = vec![sample(Category::Background, "ttbar", &[4.0, 4.0])];
        let mut binning = ExplicitBinning::default();
        binning.insert("pt", vec![BinRule::new(2, 1.5)]).unwrap();

        let report = run_pipeline(
            &samples,
            &binning,
            &StyleConfig::default(),
            &BottomConfig::default(),
        )
        .unwrap();

        assert_eq!(report.plots.len(), 1);
        assert_eq!(report.plots[0].edges, vec![0.0, 1.0, 2.0]);
        assert_eq!(
            report.skipped,
            vec![SkipRecord {
                path: String::new(),
                name: "pt".to_string(),
                source: EdgeSource::Preset,
                reason: SkipReason::NonMonotonic,
            }]
        );
    }

    #[test]
    fn test_walk_follows_layout_and_divides_bins() {
        let nested = |title: &str, category, content: f64| {
            Sample::new(
                category,
                title,
                vec![
                    hist(EVENTS_HISTOGRAM, &[100.0, content]),
                    StoreEntry::Subdirectory(Directory {
                        name: "SR".to_string(),
                        entries: vec![hist("met", &[content, content]), StoreEntry::Unsupported],
                    }),
                ],
            )
        };
        let samples = vec![
            nested("ttbar", Category::Background, 4.0),
            nested("data", Category::Data, 5.0),
        ];
        let style = StyleConfig {
            rebin_limit: 0.5,
            divide_bins: true,
            ..StyleConfig::default()
        };

        let report = run_pipeline(
            &samples,
            &ExplicitBinning::default(),
            &style,
            &BottomConfig::default(),
        )
        .unwrap();

        let names: Vec<(&str, &str)> = report
            .plots
            .iter()
            .map(|p| (p.path.as_str(), p.name.as_str()))
            .collect();
        assert_eq!(names, vec![("", EVENTS_HISTOGRAM), ("SR", "met")]);

        // both met bins merge into one bin of width 2: 8 background, 10 data
        let met = &report.plots[1];
        assert_eq!(met.edges, vec![0.0, 2.0]);
        assert_eq!(met.stack[0].bins[0].content, 4.0);
        assert_eq!(met.data.as_ref().unwrap().bins[0].content, 5.0);
        // the ratio is computed before normalization
        assert_eq!(met.bottom.as_ref().unwrap().series[0].bins[0].content, 1.25);

        assert_eq!(report.events.header, vec!["data", "ttbar"]);
        assert_eq!(report.events.rows.len(), 1);
        assert_eq!(report.events.rows[0].directory, "ttbar");
    }
}
