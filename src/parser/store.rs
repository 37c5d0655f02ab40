//! Sample stores: hierarchical trees of named histograms.
//!
//! Every sample is one JSON file holding a directory tree. Entries are
//! resolved once into [`StoreEntry`] when the file is read; nothing
//! downstream inspects raw JSON again.
//!
//! ```json
//! { "title": "ttbar",
//!   "entries": [
//!     { "kind": "histogram", "name": "Events", "edges": [0, 1, 2], "bins": [...] },
//!     { "kind": "directory", "name": "Signal_Region", "entries": [...] } ] }
//! ```

use crate::aggregator::Category;
use crate::histogram::Histogram;
use crate::utils::error::StoreError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One object inside a store directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StoreEntry {
    #[serde(rename = "histogram")]
    Histogram1D(Histogram),

    #[serde(rename = "directory")]
    Subdirectory(Directory),

    /// Anything this tool does not plot (2-D histograms, trees, ...)
    #[serde(other)]
    Unsupported,
}

/// A named directory of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub entries: Vec<StoreEntry>,
}

impl Directory {
    /// Histogram called `name` directly inside this directory
    pub fn histogram(&self, name: &str) -> Option<&Histogram> {
        self.entries.iter().find_map(|entry| match entry {
            StoreEntry::Histogram1D(h) if h.name == name => Some(h),
            _ => None,
        })
    }

    /// Direct subdirectory called `name`
    pub fn subdirectory(&self, name: &str) -> Option<&Directory> {
        self.entries.iter().find_map(|entry| match entry {
            StoreEntry::Subdirectory(d) if d.name == name => Some(d),
            _ => None,
        })
    }

    /// Follow `path` (directory names from the root) down the tree
    pub fn descend(&self, path: &[String]) -> Option<&Directory> {
        path.iter()
            .try_fold(self, |dir, segment| dir.subdirectory(segment))
    }

    /// Validate every histogram in the tree
    fn validate(&self, file: &Path) -> Result<(), StoreError> {
        for entry in &self.entries {
            match entry {
                StoreEntry::Histogram1D(h) => {
                    h.validate().map_err(|source| StoreError::InvalidHistogram {
                        path: file.display().to_string(),
                        source,
                    })?
                }
                StoreEntry::Subdirectory(d) => d.validate(file)?,
                StoreEntry::Unsupported => {}
            }
        }
        Ok(())
    }
}

/// On-disk layout of a sample file
#[derive(Debug, Deserialize)]
struct SampleFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entries: Vec<StoreEntry>,
}

/// A loaded sample: its category, display title and directory tree
#[derive(Debug, Clone)]
pub struct Sample {
    pub category: Category,
    pub title: String,
    pub path: PathBuf,
    pub root: Directory,
}

impl Sample {
    /// Build an in-memory sample
    pub fn new(category: Category, title: impl Into<String>, entries: Vec<StoreEntry>) -> Self {
        let title = title.into();
        Self {
            category,
            path: PathBuf::from(&title),
            root: Directory {
                name: title.clone(),
                entries,
            },
            title,
        }
    }

    /// Same-named histogram in the directory at `path`, titled after this sample
    pub fn histogram_at(&self, path: &[String], name: &str) -> Option<Histogram> {
        self.root
            .descend(path)
            .and_then(|dir| dir.histogram(name))
            .map(|h| h.clone().with_title(&self.title))
    }
}

/// Load one sample file
///
/// The sample title defaults to the file stem.
///
/// # Errors
/// * `StoreError::Io` - file cannot be opened
/// * `StoreError::Json` - file is not a valid store
/// * `StoreError::InvalidHistogram` - a histogram breaks its invariants
pub fn load_sample(path: impl AsRef<Path>, category: Category) -> Result<Sample, StoreError> {
    let path = path.as_ref();
    debug!("Reading {} sample from: {}", category, path.display());

    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let parsed: SampleFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;

    let title = parsed.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let root = Directory {
        name: title.clone(),
        entries: parsed.entries,
    };
    root.validate(path)?;

    info!("Loaded {} sample '{}'", category, title);
    Ok(Sample {
        category,
        title,
        path: path.to_path_buf(),
        root,
    })
}
