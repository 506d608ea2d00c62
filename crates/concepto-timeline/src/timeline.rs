//! Timeline aggregate: owns the slide and audio-track collections.
//!
//! Every slide mutation routes through [`crate::collision::normalize`]
//! and completes synchronously, so no intermediate overlapping state is
//! ever observable by the playback path. Deletion never renormalizes;
//! gaps are legal. `total_duration` is derived and recomputed on every
//! mutation, never authoritative on its own.

use chrono::{DateTime, Utc};
use concepto_core::{clamp_duration, clamp_start, timestamp, Seconds};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio_track::AudioTrack;
use crate::collision::normalize;
use crate::slide::{ShotRef, Slide};

/// Per-episode timeline of slides and audio tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Unique timeline ID
    pub id: Uuid,
    /// Episode this timeline belongs to (store document id)
    pub episode_id: String,
    /// Visual slides, pairwise disjoint
    pub slides: Vec<Slide>,
    /// Audio tracks, free to overlap
    pub audio_tracks: Vec<AudioTrack>,
    /// Derived: max end over all slides and tracks
    pub total_duration: Seconds,
    #[serde(with = "concepto_core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "concepto_core::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Timeline {
    /// Create an empty timeline for an episode.
    pub fn new(episode_id: impl Into<String>) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4(),
            episode_id: episode_id.into(),
            slides: Vec::new(),
            audio_tracks: Vec::new(),
            total_duration: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    // ── Slide operations ───────────────────────────────────────────

    /// Add an uploaded slide at the current end of the slide track.
    /// Returns the new slide's id.
    pub fn add_slide(&mut self, media_url: impl Into<String>) -> Uuid {
        let start = self.slide_track_end();
        let order = self.slides.len() as u32;
        let slide = Slide::uploaded(media_url, start, order);
        let id = slide.id;
        self.slides.push(slide);
        self.renormalize();
        id
    }

    /// Project an episode's shot list onto the timeline: one slide per
    /// shot with an image, appended sequentially after the current end.
    /// Returns the ids of the created slides.
    pub fn project_shots(&mut self, shots: &[ShotRef]) -> Vec<Uuid> {
        let mut cursor = self.slide_track_end();
        let mut order = self.slides.len() as u32;
        let mut created = Vec::new();

        for shot in shots {
            let Some(url) = &shot.image_url else {
                continue;
            };
            let slide = Slide::from_shot(shot, url.clone(), cursor, order);
            cursor = slide.end();
            order += 1;
            created.push(slide.id);
            self.slides.push(slide);
        }

        if !created.is_empty() {
            self.renormalize();
        }
        created
    }

    /// Move a slide to a new start time (drag). The proposed value is
    /// clamped, never rejected, and the whole set is renormalized since
    /// a move can cascade through every later slide.
    pub fn move_slide(&mut self, id: Uuid, new_start: Seconds) -> bool {
        let Some(slide) = self.find_slide_mut(id) else {
            return false;
        };
        slide.start_time = clamp_start(new_start);
        slide.touch();
        self.renormalize();
        true
    }

    /// Resize a slide by its trailing edge.
    pub fn resize_slide_end(&mut self, id: Uuid, new_duration: Seconds) -> bool {
        let Some(slide) = self.find_slide_mut(id) else {
            return false;
        };
        slide.duration = clamp_duration(new_duration);
        slide.touch();
        self.renormalize();
        true
    }

    /// Resize a slide by its leading edge. Rejected (no mutation) when
    /// the implied duration would fall below the floor.
    pub fn resize_slide_start(&mut self, id: Uuid, new_start: Seconds) -> bool {
        let Some(slide) = self.find_slide_mut(id) else {
            return false;
        };
        let new_start = clamp_start(new_start);
        let new_duration = slide.end() - new_start;
        if new_duration < concepto_core::constants::MIN_DURATION {
            return false;
        }
        slide.start_time = new_start;
        slide.duration = new_duration;
        slide.touch();
        self.renormalize();
        true
    }

    /// Delete a slide. Never renormalizes; the gap it leaves is legal.
    pub fn remove_slide(&mut self, id: Uuid) -> Option<Slide> {
        let idx = self.slides.iter().position(|s| s.id == id)?;
        let removed = self.slides.remove(idx);
        self.recompute_total_duration();
        self.touch();
        Some(removed)
    }

    /// Find a slide by id.
    pub fn find_slide(&self, id: Uuid) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    fn find_slide_mut(&mut self, id: Uuid) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id == id)
    }

    // ── Audio track operations (bypass collision resolution) ───────

    /// Add an audio track from an upload. `duration` is provisional
    /// until the async probe calls [`Timeline::set_track_duration`].
    pub fn add_audio_track(
        &mut self,
        name: impl Into<String>,
        media_url: impl Into<String>,
        start_time: Seconds,
        duration: Seconds,
    ) -> Uuid {
        let order = self.audio_tracks.len() as u32;
        let track = AudioTrack::new(name, media_url, start_time, duration, order);
        let id = track.id;
        self.audio_tracks.push(track);
        self.recompute_total_duration();
        self.touch();
        id
    }

    /// Apply a probed duration to a track.
    pub fn set_track_duration(&mut self, id: Uuid, duration: Seconds) -> bool {
        let Some(track) = self.find_track_mut(id) else {
            return false;
        };
        track.duration = clamp_duration(duration);
        track.touch();
        self.recompute_total_duration();
        self.touch();
        true
    }

    /// Delete an audio track.
    pub fn remove_audio_track(&mut self, id: Uuid) -> Option<AudioTrack> {
        let idx = self.audio_tracks.iter().position(|t| t.id == id)?;
        let removed = self.audio_tracks.remove(idx);
        self.recompute_total_duration();
        self.touch();
        Some(removed)
    }

    /// Set a track's volume (0 to 100). Adjusted independently of the
    /// sync engine.
    pub fn set_volume(&mut self, id: Uuid, volume: u8) -> bool {
        let Some(track) = self.find_track_mut(id) else {
            return false;
        };
        track.volume = volume.min(100);
        track.touch();
        self.touch();
        true
    }

    /// Find an audio track by id.
    pub fn find_track(&self, id: Uuid) -> Option<&AudioTrack> {
        self.audio_tracks.iter().find(|t| t.id == id)
    }

    fn find_track_mut(&mut self, id: Uuid) -> Option<&mut AudioTrack> {
        self.audio_tracks.iter_mut().find(|t| t.id == id)
    }

    // ── Derived state ──────────────────────────────────────────────

    /// End of the last slide (audio ignored); where appends land.
    pub fn slide_track_end(&self) -> Seconds {
        self.slides.iter().map(Slide::end).fold(0.0, f64::max)
    }

    /// Recompute `total_duration` as the max end over all entities.
    pub fn recompute_total_duration(&mut self) {
        let slide_end = self.slide_track_end();
        let track_end = self
            .audio_tracks
            .iter()
            .map(AudioTrack::end)
            .fold(0.0, f64::max);
        self.total_duration = slide_end.max(track_end);
    }

    fn renormalize(&mut self) {
        self.slides = normalize(std::mem::take(&mut self.slides));
        self.recompute_total_duration();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = timestamp::now();
    }
}

/// Which slide is visible at a position. Pure view function; the UI
/// layer calls this with the published playback position.
pub fn slide_at(position: Seconds, slides: &[Slide]) -> Option<&Slide> {
    slides.iter().find(|s| s.range().contains(position))
}
