//! Error types and result utilities for sampling and plotting operations.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`LapError`].
pub type LapResult<T> = Result<T, LapError>;

/// Error types that can occur while sampling, summarising or rendering.
#[derive(Error, Debug)]
pub enum LapError {
    /// A construction-time parameter was rejected.
    ///
    /// This covers non-positive capacities, zero bucket counts, non-positive
    /// canvas dimensions and similar misconfiguration. It is never retried.
    #[error("Invalid configuration: {parameter} {reason}")]
    Configuration {
        /// Name of the offending parameter.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A statistical transform was requested on a sample with no values.
    #[error("Cannot compute {operation} on an empty sample")]
    EmptySample {
        /// The transform that was requested.
        operation: &'static str,
    },

    /// All values in a range are equal, so it has no width.
    ///
    /// Histograms recover from this locally by placing every value in the
    /// first bucket, or in the last one when a cap lies at or below the
    /// minimum. It is exposed for callers that build their own ranges.
    #[error("Degenerate range: every value equals {value}")]
    DegenerateRange {
        /// The single value spanned by the range.
        value: f64,
    },

    /// The SVG backend rejected a drawing command.
    #[error("Rendering error: {reason}")]
    Render {
        /// Message reported by the backend.
        reason: String,
    },
}

impl LapError {
    /// Create a configuration error for `parameter`.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty-sample error for `operation`.
    pub const fn empty(operation: &'static str) -> Self {
        Self::EmptySample { operation }
    }

    /// Create a rendering error from a backend failure.
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render {
            reason: err.to_string(),
        }
    }

    /// Returns true if this error was caused by misconfiguration.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
