//! Concepto Timeline - Timeline data model
//!
//! Implements the synchronized AV timeline for episode animatics:
//! - Slides (timed visuals) kept pairwise disjoint by collision resolution
//! - Audio tracks placed freely on the same time axis
//! - Versioned persistence documents with store timestamp normalization
//! - Debounced save through the external persistence gateway

pub mod audio_track;
pub mod collision;
pub mod persistence;
pub mod serialization;
pub mod slide;
pub mod timeline;

pub use audio_track::AudioTrack;
pub use collision::normalize;
pub use persistence::{DebouncedSaver, PersistenceGateway};
pub use serialization::TimelineDocument;
pub use slide::{ShotRef, Slide, SlideOrigin};
pub use timeline::{slide_at, Timeline};
