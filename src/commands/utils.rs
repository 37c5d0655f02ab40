use crate::parser::load_binning;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Parse an explicit-binning file and echo what was understood
pub fn check_binning_file(file_path: PathBuf) -> Result<()> {
    println!("Checking binning file: {}", file_path.display());

    let binning = load_binning(&file_path)
        .with_context(|| format!("Invalid binning file {}", file_path.display()))?;

    println!("✓ Valid binning file ({} histograms)", binning.len());
    for (name, rules) in binning.sorted() {
        let groups: Vec<String> = rules
            .iter()
            .map(|rule| format!("[{},{}]", rule.repeat, rule.width))
            .collect();
        println!("  {} [{}]", name, groups.join(","));
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Histstack Plot Document Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - RFC 3339 timestamp");
        println!("  bottom_mode: string?       - ratio | sig_left | sig_right | sig_bin");
        println!("  formula: string            - s_over_sqrt_s_plus_b | s_over_sqrt_b");
        println!("  plots: array               - One entry per plotted histogram");
        println!("    path: string             - Directory path from the store root");
        println!("    name: string             - Histogram name");
        println!("    edges: number[]          - Common bin edges");
        println!("    rebin: object            - status rebinned | kept, edge source");
        println!("    stack: histogram[]       - Backgrounds, smallest integral first");
        println!("    signals: histogram[]     - Signal series");
        println!("    data: histogram?         - Summed data");
        println!("    background_total: histogram - Sum of the stack");
        println!("    top_band: object         - Background uncertainty band");
        println!("    bottom: object?          - Ratio or significance series");
        println!("  skipped: array             - Histograms that kept their binning");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Histstack v{}", env!("CARGO_PKG_VERSION"));
    println!("Plot Document Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Stacked histogram aggregation with adaptive rebinning.");
}
