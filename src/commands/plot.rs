//! Plot command implementation.
//!
//! The plot command:
//! 1. Resolves the run configuration (file plus command-line overrides)
//! 2. Loads the explicit binning, if any
//! 3. Loads every sample store
//! 4. Runs the per-histogram pipeline
//! 5. Writes the plot document and the event-count logfile

use super::models::PlotArgs;
use crate::aggregator::Category;
use crate::derived::SignificanceFormula;
use crate::output::{write_event_log, write_plot_document, PlotDocument};
use crate::parser::{load_binning, load_sample, ExplicitBinning, Sample};
use crate::pipeline::run_pipeline;
use crate::utils::config::{load_config, RunConfig, SampleSpec};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the plot command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Configuration or binning file cannot be read or parsed
/// * A sample store cannot be loaded
/// * No background sample was given
/// * Output files cannot be written
pub fn execute_plot(args: PlotArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/5: Resolving run configuration...");
    let config = resolve_config(&args)?;
    debug!("Run configuration: {:?}", config);

    info!("Step 2/5: Loading explicit binning...");
    let binning = match &config.binning {
        Some(path) => load_binning(path)
            .with_context(|| format!("Failed to load binning file {}", path.display()))?,
        None => {
            info!("No binning file given, every histogram is rebinned adaptively");
            ExplicitBinning::default()
        }
    };

    info!("Step 3/5: Loading {} samples...", config.samples.len());
    let samples = load_samples(&config)?;

    info!("Step 4/5: Building plots...");
    let report = run_pipeline(&samples, &binning, &config.style, &config.bottom)
        .context("Failed to build plots")?;

    for skip in &report.skipped {
        debug!("Kept original binning for /{}/{}: {:?}", skip.path, skip.name, skip.reason);
    }

    info!("Step 5/5: Writing output files...");
    let document = PlotDocument::from_report(&report);
    write_plot_document(&document, &config.output).context("Failed to write plot document")?;
    info!("✓ Plot document written to: {}", config.output.display());

    write_event_log(&report.events, &config.logfile).context("Failed to write event logfile")?;
    info!("✓ Event counts written to: {}", config.logfile.display());

    let elapsed = start_time.elapsed();
    info!(
        "Plotted {} histograms in {:.2}s",
        report.plots.len(),
        elapsed.as_secs_f64()
    );
    Ok(())
}

/// Merge the configuration file (if any) with command-line overrides
pub fn resolve_config(args: &PlotArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load run configuration {}", path.display()))?,
        None => RunConfig::default(),
    };

    let extra = [
        (Category::Data, &args.data),
        (Category::Background, &args.background),
        (Category::Signal, &args.signal),
    ];
    for (category, paths) in extra {
        config.samples.extend(paths.iter().map(|path| SampleSpec {
            category,
            path: path.clone(),
        }));
    }

    if let Some(binning) = &args.binning {
        config.binning = Some(binning.clone());
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(logfile) = &args.logfile {
        config.logfile = logfile.clone();
    }
    if let Some(mode) = args.bottom_mode {
        config.bottom.mode = mode;
    }
    if args.s_over_sqrt_b {
        config.bottom.formula = SignificanceFormula::SOverSqrtB;
    }
    if args.only_top {
        config.bottom.only_top = true;
    }
    if let Some(limit) = args.rebin_limit {
        config.style.rebin_limit = limit;
    }
    if args.divide_bins {
        config.style.divide_bins = true;
    }

    config.validate()?;
    Ok(config)
}

/// Validate plot arguments before any file is touched
pub fn validate_args(args: &PlotArgs) -> Result<()> {
    if args.config.is_none() && args.background.is_empty() {
        anyhow::bail!("At least one background sample is required (--background or --config)");
    }

    if let Some(limit) = args.rebin_limit {
        if !limit.is_finite() {
            anyhow::bail!("rebin limit must be a finite number");
        }
        if limit <= 0.0 {
            warn!("Rebin limit {} closes a merged bin at every filled bin", limit);
        }
    }
    Ok(())
}

fn load_samples(config: &RunConfig) -> Result<Vec<Sample>> {
    config
        .samples
        .iter()
        .map(|spec| {
            load_sample(&spec.path, spec.category).with_context(|| {
                format!("Failed to load {} sample {}", spec.category, spec.path.display())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::BottomMode;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "output = \"from_file.json\"\n\n[style]\nrebin_limit = 0.2\n\n[[sample]]\ncategory = \"background\"\npath = \"ttbar.json\""
        )
        .unwrap();

        let args = PlotArgs {
            config: Some(file.path().to_path_buf()),
            signal: vec![PathBuf::from("stop.json")],
            rebin_limit: Some(0.5),
            bottom_mode: Some(BottomMode::SignificancePerBin),
            s_over_sqrt_b: true,
            ..PlotArgs::default()
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.output, PathBuf::from("from_file.json"));
        assert_eq!(config.style.rebin_limit, 0.5);
        assert_eq!(config.bottom.mode, BottomMode::SignificancePerBin);
        assert_eq!(config.bottom.formula, SignificanceFormula::SOverSqrtB);
        assert_eq!(config.samples.len(), 2);
        assert_eq!(config.samples[1].category, Category::Signal);
    }

    #[test]
    fn test_validate_requires_backgrounds() {
        assert!(validate_args(&PlotArgs::default()).is_err());

        let args = PlotArgs {
            background: vec![PathBuf::from("ttbar.json")],
            ..PlotArgs::default()
        };
        assert!(validate_args(&args).is_ok());

        let args = PlotArgs {
            background: vec![PathBuf::from("ttbar.json")],
            rebin_limit: Some(f64::NAN),
            ..PlotArgs::default()
        };
        assert!(validate_args(&args).is_err());
    }
}
