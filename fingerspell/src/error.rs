//! Error types for classification and configuration.

use thiserror::Error;

/// Per-frame classification errors.
///
/// These never escape the classifier facade: a frame that raises one is
/// reported as the invalid class with no letter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// A lift vector, class, or frame that the pipeline cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Startup configuration errors.  Fatal: the classifier refuses to build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An ambiguity class has no resolver registered.
    #[error("no resolver registered for ambiguity class {0}")]
    MissingResolver(&'static str),

    /// Per-finger thresholds violate down < middle.
    #[error("{finger} thresholds out of order: down {down} must be below middle {middle}")]
    ThresholdOrder {
        finger: &'static str,
        down: f32,
        middle: f32,
    },

    /// The same lift code was assigned two different classes.
    #[error("lookup entry {code} mapped to both {existing} and {requested}")]
    ConflictingEntry {
        code: usize,
        existing: &'static str,
        requested: &'static str,
    },

    /// Any other malformed value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
