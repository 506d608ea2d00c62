//! Editing session for one episode timeline.
//!
//! Owns the shared timeline, the playback clock, the audio sync manager
//! and the debounced saver, and exposes the gesture surface the host UI
//! calls. Every mutation applies synchronously (collision resolution
//! completes before control returns), re-arms the save deadline and
//! leaves `total_duration` recomputed.
//!
//! The session is single-threaded and cooperative: the host calls
//! `on_frame` from its frame/idle path, which drives both the tick loop
//! and the pending save.

use std::sync::Arc;
use std::time::Instant;

use concepto_audio::{decode_channel0, AudioOutput, AudioSyncManager};
use concepto_core::{Result, Seconds};
use concepto_timeline::{DebouncedSaver, PersistenceGateway, ShotRef, Timeline};
use parking_lot::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::PlaybackClock;

/// One editing session over an episode's timeline.
pub struct EditorSession<O: AudioOutput, G: PersistenceGateway> {
    timeline: Arc<Mutex<Timeline>>,
    clock: PlaybackClock,
    sync: AudioSyncManager<O>,
    saver: DebouncedSaver,
    gateway: G,
}

impl<O: AudioOutput, G: PersistenceGateway> EditorSession<O, G> {
    /// Open a session: load the episode's saved timeline, or start an
    /// empty one.
    pub async fn open(episode_id: &str, output: O, gateway: G) -> Result<Self> {
        let timeline = match gateway.load(episode_id).await? {
            Some(timeline) => {
                info!(
                    episode = episode_id,
                    slides = timeline.slides.len(),
                    tracks = timeline.audio_tracks.len(),
                    "timeline loaded"
                );
                timeline
            }
            None => {
                info!(episode = episode_id, "no saved timeline, starting empty");
                Timeline::new(episode_id)
            }
        };

        Ok(Self {
            timeline: Arc::new(Mutex::new(timeline)),
            clock: PlaybackClock::new(),
            sync: AudioSyncManager::new(output),
            saver: DebouncedSaver::new(),
            gateway,
        })
    }

    /// Shared handle to the timeline, for read paths (rendering,
    /// `slide_at` lookups).
    pub fn timeline(&self) -> Arc<Mutex<Timeline>> {
        Arc::clone(&self.timeline)
    }

    /// The audio output context, for direct source registration.
    pub fn audio_output_mut(&mut self) -> &mut O {
        self.sync.output_mut()
    }

    pub fn position(&self) -> Seconds {
        self.clock.position()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    // ── Slide gestures ─────────────────────────────────────────────

    pub fn add_slide(&mut self, media_url: &str) -> Uuid {
        let id = self.timeline.lock().add_slide(media_url);
        self.mark_dirty();
        id
    }

    pub fn project_shots(&mut self, shots: &[ShotRef]) -> Vec<Uuid> {
        let created = self.timeline.lock().project_shots(shots);
        if !created.is_empty() {
            self.mark_dirty();
        }
        created
    }

    pub fn delete_slide(&mut self, id: Uuid) -> bool {
        let removed = self.timeline.lock().remove_slide(id).is_some();
        if removed {
            self.mark_dirty();
        }
        removed
    }

    pub fn move_slide(&mut self, id: Uuid, new_start: Seconds) -> bool {
        let moved = self.timeline.lock().move_slide(id, new_start);
        if moved {
            self.mark_dirty();
        }
        moved
    }

    pub fn resize_slide_end(&mut self, id: Uuid, new_duration: Seconds) -> bool {
        let resized = self.timeline.lock().resize_slide_end(id, new_duration);
        if resized {
            self.mark_dirty();
        }
        resized
    }

    pub fn resize_slide_start(&mut self, id: Uuid, new_start: Seconds) -> bool {
        let resized = self.timeline.lock().resize_slide_start(id, new_start);
        if resized {
            self.mark_dirty();
        }
        resized
    }

    // ── Audio track gestures ───────────────────────────────────────

    /// Add an uploaded audio track. The track lands immediately with the
    /// provided duration; the uploaded bytes are then decoded off the
    /// runtime, the real duration applied, and the decoded source
    /// registered with the audio output so playback handles can open
    /// it. A failed decode keeps the provided duration and registers
    /// nothing.
    pub async fn add_audio_track(
        &mut self,
        name: &str,
        media_url: &str,
        start_time: Seconds,
        duration: Seconds,
        bytes: Vec<u8>,
    ) -> Uuid {
        let id = self
            .timeline
            .lock()
            .add_audio_track(name, media_url, start_time, duration);
        self.mark_dirty();

        match tokio::task::spawn_blocking(move || decode_channel0(&bytes)).await {
            Ok(Ok(audio)) => {
                self.timeline
                    .lock()
                    .set_track_duration(id, audio.duration_seconds());
                self.sync.output_mut().register_source(media_url, audio);
                self.mark_dirty();
            }
            Ok(Err(e)) => {
                warn!(track = %id, error = %e, "audio decode failed, keeping provided duration");
            }
            Err(e) => {
                warn!(track = %id, error = %e, "audio decode task failed");
            }
        }
        id
    }

    pub fn delete_audio_track(&mut self, id: Uuid) -> bool {
        let removed = self.timeline.lock().remove_audio_track(id).is_some();
        if removed {
            self.sync.remove_track(id);
            self.mark_dirty();
        }
        removed
    }

    /// Set a track's volume (0 to 100), reaching any live handle
    /// immediately.
    pub fn set_volume(&mut self, id: Uuid, volume: u8) -> bool {
        let gain = {
            let mut timeline = self.timeline.lock();
            if !timeline.set_volume(id, volume) {
                return false;
            }
            timeline.find_track(id).map(|t| t.gain())
        };
        if let Some(gain) = gain {
            self.sync.set_gain(id, gain);
        }
        self.mark_dirty();
        true
    }

    // ── Transport ──────────────────────────────────────────────────

    /// Start playback from the current position and align every audio
    /// track immediately rather than waiting for the resync cadence.
    pub fn play(&mut self, now: Instant) {
        self.clock.play(now);
        let tracks = self.timeline.lock().audio_tracks.clone();
        self.sync.resync(self.clock.position(), &tracks);
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.sync.pause_all();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
        self.sync.rewind_all();
    }

    /// Frame/idle driver. Advances the clock, keeps audio in sync and
    /// flushes a due save. Returns whether another playback frame
    /// should be scheduled; the host should still call this from its
    /// idle path while a save is pending.
    pub async fn on_frame(&mut self, now: Instant) -> bool {
        let (total, tracks) = {
            let timeline = self.timeline.lock();
            (timeline.total_duration, timeline.audio_tracks.clone())
        };

        let was_playing = self.clock.is_playing();
        let more = self.clock.tick(now, total);
        if more {
            self.sync.on_tick(self.clock.position(), &tracks);
        } else if was_playing {
            // playback exhausted the timeline
            self.sync.pause_all();
        }

        if self.saver.is_due(now) {
            let snapshot = self.timeline.lock().clone();
            self.saver.flush_now(&self.gateway, &snapshot).await;
        }
        more
    }

    /// Tear the session down: flush the pending save, pause every
    /// handle and release the audio output.
    pub async fn close(mut self) {
        if self.saver.is_pending() {
            let snapshot = self.timeline.lock().clone();
            self.saver.flush_now(&self.gateway, &snapshot).await;
        }
        self.sync.shutdown();
        info!("session closed");
    }

    fn mark_dirty(&mut self) {
        self.saver.mark_dirty(Instant::now());
    }
}
