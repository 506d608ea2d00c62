//! Slide types for the timeline.

use chrono::{DateTime, Utc};
use concepto_core::constants::DEFAULT_SLIDE_DURATION;
use concepto_core::{timestamp, Seconds, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a slide came to exist on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideOrigin {
    /// Projected from the episode's shot list.
    FromScript,
    /// Added by direct upload.
    Uploaded,
}

/// A shot from the episode script, as far as slide projection cares:
/// its id, the concept-art image attached to it, and an optional
/// scripted duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotRef {
    pub shot_id: Uuid,
    /// Image attached to the shot; shots without one are skipped.
    pub image_url: Option<String>,
    /// Scripted duration, if the script specifies one.
    pub duration: Option<Seconds>,
}

/// A timed visual element placed on the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// Unique slide ID
    pub id: Uuid,
    /// Shot this slide was projected from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_shot_id: Option<Uuid>,
    /// Image URL
    pub media_url: String,
    /// Duration in seconds (> 0)
    pub duration: Seconds,
    /// Position on the timeline in seconds (>= 0)
    pub start_time: Seconds,
    /// Display order
    pub order: u32,
    /// How this slide was created
    pub origin: SlideOrigin,
    #[serde(with = "concepto_core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "concepto_core::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Slide {
    /// Create a slide projected from a shot.
    pub fn from_shot(shot: &ShotRef, media_url: impl Into<String>, start_time: Seconds, order: u32) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4(),
            source_shot_id: Some(shot.shot_id),
            media_url: media_url.into(),
            duration: shot.duration.unwrap_or(DEFAULT_SLIDE_DURATION),
            start_time,
            order,
            origin: SlideOrigin::FromScript,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a slide from a direct upload.
    pub fn uploaded(media_url: impl Into<String>, start_time: Seconds, order: u32) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4(),
            source_shot_id: None,
            media_url: media_url.into(),
            duration: DEFAULT_SLIDE_DURATION,
            start_time,
            order,
            origin: SlideOrigin::Uploaded,
            created_at: now,
            updated_at: now,
        }
    }

    /// The half-open interval this slide occupies.
    #[inline]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(&self) -> Seconds {
        self.start_time + self.duration
    }

    /// Record a mutation.
    pub(crate) fn touch(&mut self) {
        self.updated_at = timestamp::now();
    }
}
