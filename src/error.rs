//! Error taxonomy for the specfall pipeline.
//!
//! Errors only arise from precondition violations at construction or
//! configuration time. Steady-state processing never fails: a short read
//! from the audio source skips the cycle, and a silent frame normalizes
//! to all zeros.

use thiserror::Error;

/// Top-level error type for the specfall public API.
#[derive(Debug, Error)]
pub enum SpecfallError {
    /// FFT size is not a power of two.
    #[error("FFT size {0} is not a power of two")]
    InvalidSize(usize),

    /// A caller-supplied buffer does not match the engine's FFT size.
    #[error("buffer length {got} does not match FFT size {expected}")]
    SizeMismatch { expected: usize, got: usize },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The audio source is missing, not permitted, or failed to start.
    #[error("audio source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Convenience alias so callers can write `Result<T>` instead of
/// `Result<T, SpecfallError>`.
pub type Result<T> = std::result::Result<T, SpecfallError>;
