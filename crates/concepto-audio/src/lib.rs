//! Concepto Audio - Waveform analysis and playback synchronization
//!
//! Architecture:
//! - `MediaFetcher`/`HttpFetcher`: plain-GET retrieval of media bytes
//! - `decode`: symphonia byte-buffer decode and duration probing
//! - `WaveformAnalyzer`: cached 200-bin amplitude profiles with
//!   graceful fallbacks for silent and undecodable sources
//! - `AudioHandle`/`AudioOutput`: trait seam over the platform audio
//!   layer, with a cpal-backed implementation
//! - `AudioSyncManager`: keeps one handle per track consistent with the
//!   timeline position

pub mod decode;
pub mod device;
pub mod fetch;
pub mod handle;
pub mod sync;
pub mod waveform;

pub use decode::{decode_channel0, probe_duration, DecodedAudio};
pub use device::{CpalHandle, CpalOutput};
pub use fetch::{HttpFetcher, MediaFetcher};
pub use handle::{AudioHandle, AudioOutput};
pub use sync::AudioSyncManager;
pub use waveform::WaveformAnalyzer;
