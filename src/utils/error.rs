//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised by histogram arithmetic and construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    #[error("Histogram '{name}' needs at least two edges, got {count}")]
    TooFewEdges { name: String, count: usize },

    #[error("Histogram '{name}' edges are not strictly increasing at index {index}")]
    NonMonotonicEdges { name: String, index: usize },

    #[error("Histogram '{name}' has {bins} bins for {edges} edges")]
    LengthMismatch { name: String, bins: usize, edges: usize },

    #[error("Histogram '{name}' has a negative error in bin {index}")]
    NegativeError { name: String, index: usize },

    #[error("Cannot combine '{left}' and '{right}': bin edges differ")]
    EdgeMismatch { left: String, right: String },
}

/// Errors that can occur while reading the explicit-binning file
#[derive(Error, Debug)]
pub enum BinningError {
    #[error("Failed to read binning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Only two levels of brackets are allowed. Review line:\n{line}")]
    TooManyBrackets { line: String },

    #[error("Closing bracket without corresponding open bracket. Review line:\n{line}")]
    UnmatchedClosingBracket { line: String },

    #[error("Bracket groups need exactly two values [count, width]. Review line:\n{line}")]
    WrongFieldCount { line: String },

    #[error("Not all brackets were terminated. Review line:\n{line}")]
    UnterminatedBracket { line: String },

    #[error("Binning line has no histogram name. Review line:\n{line}")]
    MissingName { line: String },

    #[error("Invalid number '{value}'. Review line:\n{line}")]
    InvalidNumber { value: String, line: String },

    #[error("Duplicate histogram in binning file: {name}")]
    DuplicateHistogram { name: String },
}

/// Errors that can occur while loading sample stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read sample file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sample JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid histogram in {path}: {source}")]
    InvalidHistogram {
        path: String,
        #[source]
        source: HistogramError,
    },
}

/// Errors that can occur while loading the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Fatal errors that abort the whole run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No backgrounds given: aborting")]
    NoBackgrounds,

    #[error(transparent)]
    Histogram(#[from] HistogramError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Binning(#[from] BinningError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
