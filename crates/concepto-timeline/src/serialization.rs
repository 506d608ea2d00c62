//! Timeline persistence document with versioning and migration.
//!
//! The per-episode document is JSON with a schema version field. Older
//! documents (written before the wrapper existed) are migrated on read.
//! Timestamps round-trip through the store-native shape; the loader
//! also accepts the three legacy shapes (see `concepto_core::timestamp`).

use concepto_core::{clamp_duration, clamp_start, ConceptoError, Result};
use serde::{Deserialize, Serialize};

use crate::timeline::Timeline;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned timeline document wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineDocument {
    /// Schema version for migration.
    pub version: u32,
    /// The timeline data.
    pub timeline: Timeline,
    /// Application version that wrote this document.
    pub app_version: String,
}

impl TimelineDocument {
    /// Wrap a timeline for writing. Numeric fields are repaired and the
    /// derived duration recomputed so the stored representation is never
    /// corrupted, whatever state the in-memory model was left in.
    pub fn new(mut timeline: Timeline) -> Self {
        for slide in &mut timeline.slides {
            slide.start_time = clamp_start(slide.start_time);
            slide.duration = clamp_duration(slide.duration);
        }
        for track in &mut timeline.audio_tracks {
            track.start_time = clamp_start(track.start_time);
            track.duration = clamp_duration(track.duration);
        }
        timeline.recompute_total_duration();

        Self {
            version: CURRENT_VERSION,
            timeline,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            ConceptoError::Serialization(format!("Failed to serialize timeline: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| ConceptoError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(ConceptoError::Serialization(format!(
                "Timeline document version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| ConceptoError::Serialization(format!("Failed to parse timeline: {}", e)))
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare timeline without the version wrapper
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "timeline": data,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(ConceptoError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
