//! Playback orchestration: the wall-clock playback position and the
//! editor session that ties the timeline model, audio sync and
//! persistence together behind one gesture surface.

pub mod clock;
pub mod session;

pub use clock::{ClockState, PlaybackClock};
pub use session::EditorSession;
