//! Audio decoding via symphonia.
//!
//! Decodes a fetched byte buffer into a channel-0 `f32` sample buffer
//! for waveform reduction, and probes uploaded tracks for their real
//! duration.

use concepto_core::{ConceptoError, Result, Seconds};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Channel-0 samples of a decoded audio source.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Channel 0 only; the visualization and sync paths are mono.
    pub samples: Vec<f32>,
    /// Source sample rate.
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Duration in seconds.
    pub fn duration_seconds(&self) -> Seconds {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode a byte buffer to channel-0 `f32` samples.
pub fn decode_channel0(bytes: &[u8]) -> Result<DecodedAudio> {
    let mss = MediaSourceStream::new(
        Box::new(std::io::Cursor::new(bytes.to_vec())),
        Default::default(),
    );

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ConceptoError::Decode(format!("unrecognized container: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| ConceptoError::Decode("no audio track in container".into()))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ConceptoError::Decode(format!("unsupported codec: {}", e)))?;

    let mut samples = Vec::new();
    let mut sample_rate = 0u32;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(ConceptoError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // recoverable corruption: skip the packet
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(ConceptoError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        let channels = spec.channels.count().max(1);

        if sample_buf.is_none() {
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let buf = sample_buf.as_mut().unwrap();
        buf.copy_interleaved_ref(decoded);

        samples.extend(buf.samples().iter().step_by(channels));
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(ConceptoError::Decode("no decodable audio samples".into()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

/// Probe the duration of an uploaded audio source. Uses container
/// metadata when present, falling back to a full decode.
pub fn probe_duration(bytes: &[u8]) -> Result<Seconds> {
    let mss = MediaSourceStream::new(
        Box::new(std::io::Cursor::new(bytes.to_vec())),
        Default::default(),
    );

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ConceptoError::Decode(format!("unrecognized container: {}", e)))?;

    let params = probed
        .format
        .default_track()
        .ok_or_else(|| ConceptoError::Decode("no audio track in container".into()))?
        .codec_params
        .clone();

    if let (Some(n_frames), Some(rate)) = (params.n_frames, params.sample_rate) {
        if rate > 0 {
            return Ok(n_frames as f64 / f64::from(rate));
        }
    }

    Ok(decode_channel0(bytes)?.duration_seconds())
}
