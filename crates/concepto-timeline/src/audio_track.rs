//! Audio track types for the timeline.

use chrono::{DateTime, Utc};
use concepto_core::{timestamp, Seconds, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A timed audio element, independently playable. Audio tracks form an
/// independent mix and may overlap freely; they are never run through
/// collision resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Unique track ID
    pub id: Uuid,
    /// Track name (displayed in UI)
    pub name: String,
    /// Audio URL
    pub media_url: String,
    /// Position on the timeline in seconds (>= 0)
    pub start_time: Seconds,
    /// Duration in seconds (> 0)
    pub duration: Seconds,
    /// Volume, 0 to 100
    pub volume: u8,
    /// Display order
    pub order: u32,
    #[serde(with = "concepto_core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "concepto_core::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl AudioTrack {
    /// Create a new track from an upload. The duration is provisional
    /// until the asynchronous probe refines it.
    pub fn new(
        name: impl Into<String>,
        media_url: impl Into<String>,
        start_time: Seconds,
        duration: Seconds,
        order: u32,
    ) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            media_url: media_url.into(),
            start_time: concepto_core::clamp_start(start_time),
            duration: concepto_core::clamp_duration(duration),
            volume: 100,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    /// The half-open interval this track occupies.
    #[inline]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(&self) -> Seconds {
        self.start_time + self.duration
    }

    /// Linear gain for the playback handle.
    #[inline]
    pub fn gain(&self) -> f32 {
        f32::from(self.volume.min(100)) / 100.0
    }

    /// Record a mutation.
    pub(crate) fn touch(&mut self) {
        self.updated_at = timestamp::now();
    }
}
