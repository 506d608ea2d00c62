//! Audio synchronization against the timeline position.
//!
//! Owns one playback handle per audio track and keeps each handle's
//! play state consistent with the published position. A full resync
//! (range transitions, drift check) runs only every
//! `RESYNC_INTERVAL_TICKS` ticks (about four checks per second at
//! 60 Hz), trading sync precision for tick-loop CPU.

use std::collections::HashMap;

use concepto_core::constants::{DRIFT_TOLERANCE, RESYNC_INTERVAL_TICKS};
use concepto_core::Seconds;
use concepto_timeline::AudioTrack;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::handle::{AudioHandle, AudioOutput};

struct TrackHandle<H> {
    handle: H,
    in_range: bool,
    /// Playback policy rejected this track even after an output resume;
    /// it stays silent for the rest of the session.
    policy_muted: bool,
}

/// Keeps per-track playback handles consistent with timeline position.
pub struct AudioSyncManager<O: AudioOutput> {
    output: O,
    handles: HashMap<Uuid, TrackHandle<O::Handle>>,
    ticks: u32,
}

impl<O: AudioOutput> AudioSyncManager<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            handles: HashMap::new(),
            ticks: 0,
        }
    }

    /// The shared output context.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Mutable access to the shared output context (source registration).
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Called once per playback tick. Cheap except every
    /// `RESYNC_INTERVAL_TICKS`-th call, which runs a full resync.
    pub fn on_tick(&mut self, position: Seconds, tracks: &[AudioTrack]) {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % RESYNC_INTERVAL_TICKS == 0 {
            self.resync(position, tracks);
        }
    }

    /// Full resync: enter/leave ranges and correct drift. Also called
    /// directly when playback starts or seeks.
    pub fn resync(&mut self, position: Seconds, tracks: &[AudioTrack]) {
        let Self {
            output, handles, ..
        } = self;

        for track in tracks {
            let in_range = track.range().contains(position);

            let entry = match handles.get_mut(&track.id) {
                Some(entry) => entry,
                None => {
                    if !in_range {
                        continue; // handle created lazily, on first need
                    }
                    let handle = match output.open_handle(&track.media_url) {
                        Ok(h) => h,
                        Err(e) => {
                            warn!(track = %track.id, error = %e, "could not open audio handle");
                            continue;
                        }
                    };
                    handles.entry(track.id).or_insert(TrackHandle {
                        handle,
                        in_range: false,
                        policy_muted: false,
                    })
                }
            };

            let was_in_range = entry.in_range;
            entry.in_range = in_range;

            if in_range && !was_in_range {
                // entering: align to the timeline and start
                entry.handle.set_gain(track.gain());
                entry.handle.seek(position - track.start_time);
                start_with_policy_retry(output, entry, track.id);
            } else if !in_range && was_in_range {
                entry.handle.pause();
            } else if in_range && entry.handle.is_playing() {
                let expected = position - track.start_time;
                let drift = (entry.handle.position() - expected).abs();
                if drift > DRIFT_TOLERANCE {
                    debug!(track = %track.id, drift, "correcting audio drift");
                    entry.handle.seek(expected);
                }
                // smaller drift stays: frequent micro-seeks are audible
            }
        }
    }

    /// Set gain on a live handle. No-op if the track has never needed
    /// a handle.
    pub fn set_gain(&mut self, track_id: Uuid, gain: f32) {
        if let Some(entry) = self.handles.get_mut(&track_id) {
            entry.handle.set_gain(gain);
        }
    }

    /// Pause every handle (clock exhausted or user paused).
    pub fn pause_all(&mut self) {
        for entry in self.handles.values_mut() {
            entry.handle.pause();
            entry.in_range = false;
        }
    }

    /// Pause and rewind every handle (user stopped).
    pub fn rewind_all(&mut self) {
        for entry in self.handles.values_mut() {
            entry.handle.pause();
            entry.handle.seek(0.0);
            entry.in_range = false;
        }
    }

    /// Release the handle for a deleted track.
    pub fn remove_track(&mut self, track_id: Uuid) {
        if let Some(mut entry) = self.handles.remove(&track_id) {
            entry.handle.pause();
            // dropping the handle releases the platform resource
        }
    }

    /// Session teardown: pause everything, release the registry and
    /// close the shared output context.
    pub fn shutdown(&mut self) {
        self.pause_all();
        self.handles.clear();
        self.output.close();
        info!("audio sync manager shut down");
    }
}

fn start_with_policy_retry<O: AudioOutput>(
    output: &mut O,
    entry: &mut TrackHandle<O::Handle>,
    track_id: Uuid,
) {
    if entry.policy_muted {
        return;
    }
    if let Err(first) = entry.handle.play() {
        debug!(track = %track_id, error = %first, "play rejected, resuming output context");
        let recovered = output.resume().is_ok() && entry.handle.play().is_ok();
        if !recovered {
            // a missed frame of audio is not fatal; the track just
            // stays silent for this session
            warn!(track = %track_id, "audio track muted for this session");
            entry.policy_muted = true;
        }
    }
}
