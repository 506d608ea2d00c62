//! Waveform computation for audio-track visualization.
//!
//! Reduces a decoded source to a fixed-length normalized amplitude
//! profile. The UI must always have a renderable profile, so every
//! failure path degrades to a flat fallback instead of propagating, and
//! both success and failure results are cached per track so a failing
//! source is not re-fetched on every render.

use std::collections::HashMap;
use std::sync::Arc;

use concepto_core::constants::{
    FALLBACK_WAVEFORM_LEVEL, SILENT_WAVEFORM_LEVEL, WAVEFORM_BINS, WAVEFORM_FETCH_TIMEOUT,
};
use concepto_core::{ConceptoError, Result};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::decode::decode_channel0;
use crate::fetch::MediaFetcher;

/// Reduce channel-0 samples to `WAVEFORM_BINS` normalized RMS values.
///
/// The buffer is partitioned into equal blocks; each block's RMS of
/// absolute sample magnitude is divided by the global maximum. An
/// all-zero buffer skips the division and renders as a low flat line.
pub fn reduce(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return vec![SILENT_WAVEFORM_LEVEL; WAVEFORM_BINS];
    }

    let mut profile = Vec::with_capacity(WAVEFORM_BINS);
    for bin in 0..WAVEFORM_BINS {
        let start = bin * samples.len() / WAVEFORM_BINS;
        let end = ((bin + 1) * samples.len() / WAVEFORM_BINS)
            .max(start + 1)
            .min(samples.len());

        // f64 accumulation keeps long blocks numerically stable
        let mut sum = 0.0f64;
        for &s in &samples[start..end] {
            let a = f64::from(s.abs());
            sum += a * a;
        }
        profile.push((sum / (end - start) as f64).sqrt() as f32);
    }

    let max = profile.iter().cloned().fold(0.0f32, f32::max);
    if max == 0.0 {
        return vec![SILENT_WAVEFORM_LEVEL; WAVEFORM_BINS];
    }

    for v in &mut profile {
        *v /= max;
    }
    profile
}

/// Fetches, decodes and reduces audio sources into display profiles,
/// cached per track id.
pub struct WaveformAnalyzer<F: MediaFetcher> {
    fetcher: F,
    cache: HashMap<Uuid, Arc<Vec<f32>>>,
}

impl<F: MediaFetcher> WaveformAnalyzer<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: HashMap::new(),
        }
    }

    /// Get the amplitude profile for a track. Repeat calls for the same
    /// track id are free; failures are cached like successes.
    pub async fn waveform(&mut self, media_url: &str, track_id: Uuid) -> Arc<Vec<f32>> {
        if let Some(cached) = self.cache.get(&track_id) {
            return Arc::clone(cached);
        }

        let profile = match self.compute(media_url).await {
            Ok(profile) => {
                debug!(%track_id, "waveform computed");
                profile
            }
            Err(e) => {
                warn!(%track_id, url = media_url, error = %e, "waveform fallback");
                vec![FALLBACK_WAVEFORM_LEVEL; WAVEFORM_BINS]
            }
        };

        let profile = Arc::new(profile);
        self.cache.insert(track_id, Arc::clone(&profile));
        profile
    }

    /// Drop a track's cached profile (track deleted).
    pub fn evict(&mut self, track_id: Uuid) {
        self.cache.remove(&track_id);
    }

    async fn compute(&self, media_url: &str) -> Result<Vec<f32>> {
        let bytes = tokio::time::timeout(WAVEFORM_FETCH_TIMEOUT, self.fetcher.fetch(media_url))
            .await
            .map_err(|_| ConceptoError::Timeout(format!("fetching {}", media_url)))??;

        let audio = decode_channel0(&bytes)?;
        Ok(reduce(&audio.samples))
    }
}
