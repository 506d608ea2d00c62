//! Persistence gateway contract and debounced saving.
//!
//! The document store itself lives outside the engine; this module only
//! consumes its load/save contract. Saves are debounced: a burst of
//! mutations within the debounce window collapses into one save call.
//! The debounce is deadline-based and cooperative: the session marks
//! the saver dirty on every mutation and polls it from the frame/idle
//! path, so there is no background timer task to race with the tick
//! loop.

use std::future::Future;
use std::time::Instant;

use concepto_core::constants::SAVE_DEBOUNCE;
use concepto_core::Result;
use tracing::{debug, warn};

use crate::timeline::Timeline;

/// Async load/save contract of the external document store.
pub trait PersistenceGateway {
    /// Load the timeline for an episode, if one has been saved.
    fn load(&self, episode_id: &str) -> impl Future<Output = Result<Option<Timeline>>> + Send;

    /// Persist a timeline snapshot.
    fn save(&self, timeline: &Timeline) -> impl Future<Output = Result<()>> + Send;
}

/// Collapses mutation bursts into single save calls.
///
/// Save failures are logged and swallowed: the in-memory model stays
/// authoritative and the next mutation re-arms the deadline, which is
/// the implicit retry.
#[derive(Debug, Default)]
pub struct DebouncedSaver {
    deadline: Option<Instant>,
}

impl DebouncedSaver {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Record a mutation; (re-)arms the save deadline.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.deadline = Some(now + SAVE_DEBOUNCE);
    }

    /// Whether a save is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the pending save is due.
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(d) if now >= d)
    }

    /// Save if the deadline has passed. Returns whether a save was
    /// attempted.
    pub async fn flush_due<G: PersistenceGateway>(
        &mut self,
        now: Instant,
        gateway: &G,
        timeline: &Timeline,
    ) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.flush_now(gateway, timeline).await;
        true
    }

    /// Save immediately, clearing any pending deadline. Used at session
    /// teardown so the last burst is not lost.
    pub async fn flush_now<G: PersistenceGateway>(&mut self, gateway: &G, timeline: &Timeline) {
        self.deadline = None;
        match gateway.save(timeline).await {
            Ok(()) => debug!(episode = %timeline.episode_id, "timeline saved"),
            Err(e) => {
                // Model stays authoritative; the next mutation re-arms
                // the deadline and retries.
                warn!(episode = %timeline.episode_id, error = %e, "timeline save failed");
            }
        }
    }
}
