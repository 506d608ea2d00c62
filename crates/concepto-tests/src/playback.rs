//! Integration tests for full editing sessions.
//!
//! Drives `EditorSession` end to end over the in-memory JSON store and
//! a mock audio output: edit, play to the end, persist, reopen.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use concepto_audio::{AudioHandle, AudioOutput, DecodedAudio};
use concepto_core::{Result, Seconds};
use concepto_playback::EditorSession;
use concepto_timeline::{slide_at, ShotRef};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::support::{init_tracing, tone_wav, JsonStore};

// ── Mock audio output ──────────────────────────────────────────

#[derive(Default)]
struct HandleState {
    playing: bool,
    position: f64,
}

struct MockHandle(Arc<Mutex<HandleState>>);

impl AudioHandle for MockHandle {
    fn play(&mut self) -> Result<()> {
        self.0.lock().playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.lock().playing = false;
    }

    fn seek(&mut self, position: Seconds) {
        self.0.lock().position = position;
    }

    fn position(&self) -> Seconds {
        self.0.lock().position
    }

    fn set_gain(&mut self, _gain: f32) {}

    fn is_playing(&self) -> bool {
        self.0.lock().playing
    }
}

#[derive(Default)]
struct OutputProbe {
    states: Mutex<HashMap<String, Arc<Mutex<HandleState>>>>,
    registered: Mutex<HashMap<String, DecodedAudio>>,
    closed: AtomicBool,
}

impl OutputProbe {
    fn state(&self, url: &str) -> Arc<Mutex<HandleState>> {
        Arc::clone(&self.states.lock()[url])
    }
}

struct MockOutput(Arc<OutputProbe>);

impl AudioOutput for MockOutput {
    type Handle = MockHandle;

    fn register_source(&mut self, media_url: &str, audio: DecodedAudio) {
        self.0
            .registered
            .lock()
            .insert(media_url.to_string(), audio);
    }

    fn open_handle(&mut self, media_url: &str) -> Result<Self::Handle> {
        let state = Arc::new(Mutex::new(HandleState::default()));
        self.0
            .states
            .lock()
            .insert(media_url.to_string(), Arc::clone(&state));
        Ok(MockHandle(state))
    }

    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {
        self.0.closed.store(true, Ordering::SeqCst);
    }
}

fn shot(image: &str) -> ShotRef {
    ShotRef {
        shot_id: Uuid::new_v4(),
        image_url: Some(image.into()),
        duration: None,
    }
}

async fn open(
    store: &JsonStore,
) -> (EditorSession<MockOutput, &JsonStore>, Arc<OutputProbe>) {
    let probe = Arc::new(OutputProbe::default());
    let session = EditorSession::open("ep-1", MockOutput(Arc::clone(&probe)), store)
        .await
        .unwrap();
    (session, probe)
}

// ── Scenarios ──────────────────────────────────────────────────

#[tokio::test]
async fn edit_close_reopen_restores_the_episode() {
    init_tracing();
    let store = JsonStore::default();

    {
        let (mut session, _) = open(&store).await;
        session.project_shots(&[shot("s1.png"), shot("s2.png")]);
        // 2.5s tone: the decoded duration overrides the placeholder
        session
            .add_audio_track("music", "m.wav", 0.0, 1.0, tone_wav(2.5, 8000))
            .await;
        session.close().await;
    }

    let (session, _) = open(&store).await;
    let timeline = session.timeline();
    let timeline = timeline.lock();
    assert_eq!(timeline.slides.len(), 2);
    assert_eq!(timeline.audio_tracks.len(), 1);
    assert!((timeline.audio_tracks[0].duration - 2.5).abs() < 0.01);
    assert_eq!(timeline.total_duration, 6.0);
}

#[tokio::test]
async fn uploaded_source_reaches_the_audio_output() {
    let store = JsonStore::default();
    let (mut session, probe) = open(&store).await;

    session
        .add_audio_track("music", "m.wav", 0.0, 1.0, tone_wav(2.5, 8000))
        .await;

    // the decoded upload is registered under its URL, so open_handle
    // can serve it once playback enters the track's range
    let registered = probe.registered.lock();
    let audio = registered.get("m.wav").expect("source registered");
    assert!((audio.duration_seconds() - 2.5).abs() < 0.01);
    drop(registered);

    // undecodable uploads register nothing
    session
        .add_audio_track("fx", "bad.wav", 0.0, 1.0, vec![0u8; 8])
        .await;
    assert!(!probe.registered.lock().contains_key("bad.wav"));
}

#[tokio::test]
async fn playback_runs_to_the_end_and_rewinds() {
    let store = JsonStore::default();
    let (mut session, probe) = open(&store).await;

    session.project_shots(&[shot("s1.png")]); // [0, 3)
    session
        .add_audio_track("music", "m.wav", 1.0, 1.0, tone_wav(2.0, 8000))
        .await; // [1, 3)

    let t0 = Instant::now();
    session.play(t0);
    // position 0: music not yet in range, so no handle exists yet
    assert!(probe.states.lock().is_empty());

    let mut now = t0;
    let mut entered = false;
    while {
        now += Duration::from_millis(100);
        session.on_frame(now).await
    } {
        if let Some(state) = probe.states.lock().get("m.wav") {
            entered |= state.lock().playing;
        }
    }

    assert!(entered, "music played while in range");
    assert!(!session.is_playing());
    assert_eq!(session.position(), 0.0);
    assert!(!probe.state("m.wav").lock().playing);
}

#[tokio::test]
async fn scrub_view_matches_the_model_during_playback() {
    let store = JsonStore::default();
    let (mut session, _) = open(&store).await;

    let ids = session.project_shots(&[shot("s1.png"), shot("s2.png")]);
    let t0 = Instant::now();
    session.play(t0);
    session.on_frame(t0 + Duration::from_secs(4)).await;

    let timeline = session.timeline();
    let timeline = timeline.lock();
    let visible = slide_at(session.position(), &timeline.slides).unwrap();
    assert_eq!(visible.id, ids[1]);
}

#[tokio::test]
async fn edits_persist_without_an_explicit_save_gesture() {
    let store = JsonStore::default();
    let (mut session, _) = open(&store).await;

    session.add_slide("a.png");
    assert!(store.raw("ep-1").is_none(), "debounce window still open");

    session
        .on_frame(Instant::now() + Duration::from_secs(2))
        .await;
    let doc: serde_json::Value = serde_json::from_slice(&store.raw("ep-1").unwrap()).unwrap();
    assert_eq!(doc["timeline"]["slides"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn closing_mid_burst_loses_nothing() {
    let store = JsonStore::default();
    let (mut session, probe) = open(&store).await;

    session.add_slide("a.png");
    session.add_slide("b.png");
    session.close().await;

    assert!(probe.closed.load(Ordering::SeqCst));
    let (session, _) = open(&store).await;
    assert_eq!(session.timeline().lock().slides.len(), 2);
}
