//! cpal-backed implementation of the audio output seam.
//!
//! One output stream per handle, fed from a registered decoded source.
//! When a track upload is decoded (the same decode that refines its
//! duration), the session hands the samples over through
//! `AudioOutput::register_source`; `open_handle` then only wires a
//! stream around the shared sample buffer. Playback state
//! lives in atomics shared with the stream callback, so `pause` is a
//! flag flip and `seek` is a cursor store, with no stream teardown.
//!
//! `cpal::Stream` is not `Send`; handles stay on the session thread,
//! which matches the single-threaded cooperative model of the editor.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use concepto_core::{ConceptoError, Result, Seconds};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{info, warn};

use crate::decode::DecodedAudio;
use crate::handle::{AudioHandle, AudioOutput};

struct HandleShared {
    playing: AtomicBool,
    /// Source-frame cursor, f64 bits (fractional for resampling).
    cursor: AtomicU64,
    /// Linear gain, f32 bits.
    gain: AtomicU32,
}

/// Copy source frames into an interleaved output buffer, duplicating
/// the mono source across all output channels and stepping the source
/// cursor by the rate ratio. Returns the advanced cursor.
fn fill_output(
    samples: &[f32],
    channels: usize,
    ratio: f64,
    gain: f32,
    mut pos: f64,
    data: &mut [f32],
) -> f64 {
    for frame in data.chunks_mut(channels) {
        let sample = samples.get(pos as usize).copied().unwrap_or(0.0) * gain;
        for out in frame {
            *out = sample;
        }
        pos += ratio;
    }
    pos
}

/// Playback handle over one cpal output stream.
pub struct CpalHandle {
    stream: cpal::Stream,
    shared: Arc<HandleShared>,
    source_rate: f64,
}

impl AudioHandle for CpalHandle {
    fn play(&mut self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| ConceptoError::PlaybackPolicy(e.to_string()))?;
        self.shared.playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn pause(&mut self) {
        // flag flip only; the stream keeps running and emits silence,
        // so resuming is glitch-free
        self.shared.playing.store(false, Ordering::Relaxed);
    }

    fn seek(&mut self, position: Seconds) {
        let frames = (position.max(0.0) * self.source_rate).to_bits();
        self.shared.cursor.store(frames, Ordering::Relaxed);
    }

    fn position(&self) -> Seconds {
        f64::from_bits(self.shared.cursor.load(Ordering::Relaxed)) / self.source_rate
    }

    fn set_gain(&mut self, gain: f32) {
        self.shared
            .gain
            .store(gain.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::Relaxed)
    }
}

/// Shared output context over the default cpal device.
pub struct CpalOutput {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sources: HashMap<String, Arc<DecodedAudio>>,
}

impl CpalOutput {
    /// Open the default output device.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| ConceptoError::Audio("no default output device".into()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| ConceptoError::Audio(format!("querying output config: {}", e)))?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(ConceptoError::Audio(format!(
                "unsupported output sample format {:?}",
                supported.sample_format()
            )));
        }

        let config = supported.config();
        info!(
            rate = config.sample_rate.0,
            channels = config.channels,
            "audio output opened"
        );
        Ok(Self {
            device,
            config,
            sources: HashMap::new(),
        })
    }

    /// Whether a source has been registered.
    pub fn is_registered(&self, media_url: &str) -> bool {
        self.sources.contains_key(media_url)
    }
}

impl AudioOutput for CpalOutput {
    type Handle = CpalHandle;

    fn register_source(&mut self, media_url: &str, audio: DecodedAudio) {
        self.sources.insert(media_url.to_string(), Arc::new(audio));
    }

    fn open_handle(&mut self, media_url: &str) -> Result<CpalHandle> {
        let source = self
            .sources
            .get(media_url)
            .cloned()
            .ok_or_else(|| {
                ConceptoError::NotFound(format!("source not registered: {}", media_url))
            })?;

        let shared = Arc::new(HandleShared {
            playing: AtomicBool::new(false),
            cursor: AtomicU64::new(0.0f64.to_bits()),
            gain: AtomicU32::new(1.0f32.to_bits()),
        });

        let channels = usize::from(self.config.channels);
        let ratio = f64::from(source.sample_rate) / f64::from(self.config.sample_rate.0);
        let source_rate = f64::from(source.sample_rate);
        let cb_shared = Arc::clone(&shared);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !cb_shared.playing.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    let pos = f64::from_bits(cb_shared.cursor.load(Ordering::Relaxed));
                    let gain = f32::from_bits(cb_shared.gain.load(Ordering::Relaxed));
                    let pos = fill_output(&source.samples, channels, ratio, gain, pos, data);
                    cb_shared.cursor.store(pos.to_bits(), Ordering::Relaxed);
                },
                |err| warn!(error = %err, "audio stream error"),
                None,
            )
            .map_err(|e| ConceptoError::Audio(format!("building output stream: {}", e)))?;

        Ok(CpalHandle {
            stream,
            shared,
            source_rate,
        })
    }

    fn resume(&mut self) -> Result<()> {
        // desktop hosts have no autoplay gate; a play() rejection here
        // means the device went away, so probe it
        self.device
            .default_output_config()
            .map(|_| ())
            .map_err(|e| ConceptoError::PlaybackPolicy(format!("output device lost: {}", e)))
    }

    fn close(&mut self) {
        self.sources.clear();
    }
}
