//! Error types for the Concepto sync engine.

use thiserror::Error;

/// Main error type for engine operations.
///
/// Most failure paths degrade gracefully instead of surfacing one of
/// these: out-of-domain values are clamped, decode failures produce
/// fallback waveforms, and playback-policy rejections mute a single
/// track. The variants exist for the seams where a caller genuinely
/// needs to know (persistence, decode internals, teardown).
#[derive(Error, Debug)]
pub enum ConceptoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Playback blocked by platform policy: {0}")]
    PlaybackPolicy(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ConceptoError>;
