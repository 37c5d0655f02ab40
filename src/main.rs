//! Histstack CLI
//!
//! Builds stacked comparison plots from data, background and signal
//! histogram stores and writes them out for rendering.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use histstack::commands::{
    check_binning_file, display_schema, display_version, execute_plot, validate_args, PlotArgs,
};
use histstack::derived::BottomMode;

/// Histstack - stacked histogram plots with adaptive rebinning
#[derive(Parser, Debug)]
#[command(name = "histstack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate samples and write the plot document
    Plot(PlotCli),

    /// Parse an explicit-binning file and print its rules
    CheckBinning {
        /// Path to the binning file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

#[derive(Args, Debug)]
struct PlotCli {
    /// TOML run configuration
    #[arg(short, long, env = "HISTSTACK_CONFIG")]
    config: Option<PathBuf>,

    /// Data sample store (repeatable)
    #[arg(long)]
    data: Vec<PathBuf>,

    /// Background sample store (repeatable)
    #[arg(long)]
    background: Vec<PathBuf>,

    /// Signal sample store (repeatable)
    #[arg(long)]
    signal: Vec<PathBuf>,

    /// Explicit-binning file
    #[arg(short, long)]
    binning: Option<PathBuf>,

    /// Output path for the plot document
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output path for the event-count logfile
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Significance of events in bins at or below each bin
    #[arg(long, group = "bottom")]
    sig_left: bool,

    /// Significance of events in bins at or above each bin
    #[arg(long, group = "bottom")]
    sig_right: bool,

    /// Significance of each bin on its own
    #[arg(long, group = "bottom")]
    sig_bin: bool,

    /// Use S/sqrt(B) instead of S/sqrt(S+B)
    #[arg(long)]
    ssqrtb: bool,

    /// Draw the top panel only
    #[arg(long)]
    only_top: bool,

    /// Target relative statistical error per merged bin
    #[arg(long, allow_negative_numbers = true)]
    rebin_limit: Option<f64>,

    /// Divide every bin by its width
    #[arg(long)]
    divide_bins: bool,
}

impl From<PlotCli> for PlotArgs {
    fn from(cli: PlotCli) -> Self {
        let bottom_mode = if cli.sig_left {
            Some(BottomMode::SignificanceCumulativeLeft)
        } else if cli.sig_right {
            Some(BottomMode::SignificanceCumulativeRight)
        } else if cli.sig_bin {
            Some(BottomMode::SignificancePerBin)
        } else {
            None
        };

        PlotArgs {
            config: cli.config,
            data: cli.data,
            background: cli.background,
            signal: cli.signal,
            binning: cli.binning,
            output: cli.output,
            logfile: cli.logfile,
            bottom_mode,
            s_over_sqrt_b: cli.ssqrtb,
            only_top: cli.only_top,
            rebin_limit: cli.rebin_limit,
            divide_bins: cli.divide_bins,
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Plot(plot) => {
            let args = PlotArgs::from(plot);

            // Validate args first
            validate_args(&args)?;

            execute_plot(args)?;
        }

        Commands::CheckBinning { file } => {
            check_binning_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_rebin_limit_is_a_value() {
        let cli = Cli::try_parse_from([
            "histstack",
            "plot",
            "--background",
            "ttbar.json",
            "--rebin-limit",
            "-1",
        ])
        .unwrap();

        let Commands::Plot(plot) = cli.command else {
            panic!("expected the plot subcommand");
        };
        assert_eq!(PlotArgs::from(plot).rebin_limit, Some(-1.0));
    }
}
