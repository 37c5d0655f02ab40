//! Explicit-binning file parser.
//!
//! One histogram per line: a name followed by bracket groups of
//! `[repeat, width]` pairs, e.g.
//!
//! ```text
//! MyHist [[2,10.0],[0,5.0]]
//! ```
//!
//! Whitespace is ignored. Blank lines and lines starting with `#` are
//! skipped. Any structural problem is fatal and reports the offending line.

use crate::rebin::BinRule;
use crate::utils::error::BinningError;
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Histogram name -> ordered preset rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitBinning {
    rules: HashMap<String, Vec<BinRule>>,
}

impl ExplicitBinning {
    /// Register rules for `name`, refusing duplicates
    pub fn insert(&mut self, name: impl Into<String>, rules: Vec<BinRule>) -> Result<(), BinningError> {
        let name = name.into();
        if self.rules.contains_key(&name) {
            return Err(BinningError::DuplicateHistogram { name });
        }
        self.rules.insert(name, rules);
        Ok(())
    }

    pub fn rules_for(&self, name: &str) -> Option<&[BinRule]> {
        self.rules.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Entries sorted by histogram name
    pub fn sorted(&self) -> Vec<(&str, &[BinRule])> {
        let mut entries: Vec<_> = self
            .rules
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Load an explicit-binning file
///
/// # Errors
/// * `BinningError::Io` - If file cannot be read
/// * any line-level `BinningError` from [`parse_binning`]
pub fn load_binning(path: impl AsRef<Path>) -> Result<ExplicitBinning, BinningError> {
    let path = path.as_ref();
    debug!("Reading explicit binning from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let binning = parse_binning(&contents)?;

    info!("Loaded preset binning for {} histograms", binning.len());
    Ok(binning)
}

/// Parse explicit-binning text
pub fn parse_binning(text: &str) -> Result<ExplicitBinning, BinningError> {
    let mut binning = ExplicitBinning::default();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (name, rules) = parse_line(line)?;
        binning.insert(name, rules)?;
    }
    Ok(binning)
}

/// Parse one non-empty line into a name and its rules
fn parse_line(line: &str) -> Result<(String, Vec<BinRule>), BinningError> {
    let mut name = String::new();
    let mut current = String::new();
    let mut values: Vec<String> = Vec::new();
    let mut rules = Vec::new();
    let mut depth: usize = 0;

    for ch in line.chars() {
        match ch {
            '[' | ']' | ',' => {
                if !current.is_empty() {
                    if depth == 0 {
                        name = std::mem::take(&mut current);
                    } else {
                        values.push(std::mem::take(&mut current));
                    }
                }
                if ch == '[' {
                    depth += 1;
                    if depth > 2 {
                        return Err(BinningError::TooManyBrackets {
                            line: line.to_string(),
                        });
                    }
                } else if ch == ']' {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        BinningError::UnmatchedClosingBracket {
                            line: line.to_string(),
                        }
                    })?;
                    match values.len() {
                        0 => {}
                        2 => {
                            rules.push(BinRule::new(
                                parse_repeat(&values[0], line)?,
                                parse_width(&values[1], line)?,
                            ));
                            values.clear();
                        }
                        _ => {
                            return Err(BinningError::WrongFieldCount {
                                line: line.to_string(),
                            })
                        }
                    }
                }
            }
            c if c.is_whitespace() => continue,
            c => current.push(c),
        }
    }

    if depth != 0 {
        return Err(BinningError::UnterminatedBracket {
            line: line.to_string(),
        });
    }
    if name.is_empty() {
        name = current;
    }
    if name.is_empty() {
        return Err(BinningError::MissingName {
            line: line.to_string(),
        });
    }
    Ok((name, rules))
}

fn parse_repeat(value: &str, line: &str) -> Result<i64, BinningError> {
    value
        .parse::<i64>()
        .or_else(|_| match value.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v.trunc() as i64),
            _ => Err(()),
        })
        .map_err(|_| BinningError::InvalidNumber {
            value: value.to_string(),
            line: line.to_string(),
        })
}

fn parse_width(value: &str, line: &str) -> Result<f64, BinningError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(BinningError::InvalidNumber {
            value: value.to_string(),
            line: line.to_string(),
        }),
    }
}
