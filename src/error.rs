//! Error types for run configuration and threshold construction.
//!
//! The engine is deterministic given its seed and has no partial
//! failures within a run: either a configuration is rejected up front,
//! or threshold construction degenerates because every site sees zero
//! intensity, or the run proceeds to completion. There is no retry
//! path; the caller decides whether to re-queue a run with different
//! parameters.

use thiserror::Error;

/// Errors surfaced by run construction or threshold building.
///
/// An ionization with no reachable vacant site deliberately has no
/// error variant here: it is a modeling outcome, not a failure, and is
/// reported as the `electron_lost_count` counter on `ResultRecord`
/// instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Mismatched position arrays, an empty RE set, a non-positive
    /// amplitude/wavelength/travel-radius, or `ticks == 0`.
    #[error("invalid run configuration: {0}")]
    ConfigurationInvalid(String),

    /// Every site saw zero intensity, so the threshold normalizers
    /// (the per-channel maxima) are all zero.
    #[error("degenerate probability field: {0}")]
    NumericDegenerate(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
