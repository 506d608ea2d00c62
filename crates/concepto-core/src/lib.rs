//! Concepto Core - Foundation types for the AV sync engine
//!
//! This crate provides the fundamental types used throughout the engine:
//! - Seconds-based time ranges and clamping helpers
//! - Store timestamp normalization
//! - Error taxonomy
//! - Engine tuning constants

pub mod error;
pub mod time;
pub mod timestamp;

pub use error::{ConceptoError, Result};
pub use time::{clamp_duration, clamp_start, Seconds, TimeRange};
pub use timestamp::{now, repair, StoredTimestamp};

/// Engine tuning constants.
pub mod constants {
    use std::time::Duration;

    /// Floor duration below which a slide or audio track cannot be trimmed.
    pub const MIN_DURATION: f64 = 0.5;

    /// Default duration for slides created from shots or uploads.
    pub const DEFAULT_SLIDE_DURATION: f64 = 3.0;

    /// Length of the normalized amplitude profile for waveform display.
    pub const WAVEFORM_BINS: usize = 200;

    /// Profile level returned for an all-silent source.
    pub const SILENT_WAVEFORM_LEVEL: f32 = 0.1;

    /// Profile level returned when fetch or decode fails.
    pub const FALLBACK_WAVEFORM_LEVEL: f32 = 0.3;

    /// Upper bound on waveform fetch + decode before falling back.
    pub const WAVEFORM_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

    /// Audio drift beyond this is corrected with a reseek; smaller drift
    /// is left alone to avoid audible micro-seek glitches.
    pub const DRIFT_TOLERANCE: f64 = 0.5;

    /// Full audio resync runs every this many clock ticks (~4/s at 60 Hz).
    pub const RESYNC_INTERVAL_TICKS: u32 = 15;

    /// Mutation bursts within this window collapse into a single save.
    pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(1500);
}
