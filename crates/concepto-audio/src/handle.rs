//! Trait seam over the platform audio layer.
//!
//! `AudioSyncManager` never talks to the platform directly; it drives
//! one `AudioHandle` per track, all created from a shared `AudioOutput`
//! context. The cpal implementation lives in [`crate::device`]; tests
//! substitute mocks.

use concepto_core::{Result, Seconds};

use crate::decode::DecodedAudio;

/// Playback handle for one audio track.
pub trait AudioHandle {
    /// Start playback from the current handle position.
    ///
    /// Returns `ConceptoError::PlaybackPolicy` when the platform
    /// refuses to start output (autoplay policy, device lost).
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping position.
    fn pause(&mut self);

    /// Seek to a position within the source.
    fn seek(&mut self, position: Seconds);

    /// Current playback position within the source.
    fn position(&self) -> Seconds;

    /// Linear gain, 0.0 to 1.0.
    fn set_gain(&mut self, gain: f32);

    /// Whether the handle is currently playing.
    fn is_playing(&self) -> bool;
}

/// Shared audio output context; owns the platform device and mints
/// handles for individual tracks.
pub trait AudioOutput {
    type Handle: AudioHandle;

    /// Make a decoded source available for `open_handle`. Called when a
    /// track upload is decoded. Outputs that can stream a URL on their
    /// own may ignore this; the cpal backend requires it, since it
    /// plays from registered sample buffers.
    fn register_source(&mut self, media_url: &str, audio: DecodedAudio) {
        let _ = (media_url, audio);
    }

    /// Create a handle for a media source. Called lazily, on the first
    /// tick that needs the track audible.
    fn open_handle(&mut self, media_url: &str) -> Result<Self::Handle>;

    /// Try to resume a suspended output context. Called once after a
    /// `play()` rejection before giving up on the track.
    fn resume(&mut self) -> Result<()>;

    /// Release the underlying device. No handle minted from this
    /// context may be used afterwards.
    fn close(&mut self);
}
