//! Integration tests for timeline editing.
//!
//! Exercises realistic editing sequences against the model: shot
//! projection, uploads, drags, trims and deletes, checking the
//! disjointness and duration invariants the playback path relies on.

use concepto_core::constants::{DEFAULT_SLIDE_DURATION, MIN_DURATION};
use concepto_timeline::{slide_at, ShotRef, Timeline};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn shot(image: Option<&str>, duration: Option<f64>) -> ShotRef {
    ShotRef {
        shot_id: Uuid::new_v4(),
        image_url: image.map(String::from),
        duration,
    }
}

fn assert_invariants(timeline: &Timeline) {
    let mut sorted: Vec<_> = timeline.slides.iter().collect();
    sorted.sort_by(|a, b| a.start_time.partial_cmp(&b.start_time).unwrap());
    for pair in sorted.windows(2) {
        assert!(
            pair[0].end() <= pair[1].start_time + 1e-9,
            "slides overlap: [{}, {}) and [{}, {})",
            pair[0].start_time,
            pair[0].end(),
            pair[1].start_time,
            pair[1].end()
        );
    }
    for slide in &timeline.slides {
        assert!(slide.start_time >= 0.0);
        assert!(slide.duration >= MIN_DURATION);
    }
}

// ── Shot projection and uploads ────────────────────────────────

#[test]
fn projection_then_upload_appends_after_script_slides() {
    let mut tl = Timeline::new("ep-1");
    let shots = vec![
        shot(Some("s1.png"), Some(4.0)),
        shot(None, Some(2.0)), // storyboard pending, skipped
        shot(Some("s3.png"), None),
    ];

    let created = tl.project_shots(&shots);
    assert_eq!(created.len(), 2);
    assert_eq!(tl.total_duration, 4.0 + DEFAULT_SLIDE_DURATION);

    let uploaded = tl.add_slide("extra.png");
    let slide = tl.find_slide(uploaded).unwrap();
    assert_eq!(slide.start_time, 7.0);
    assert_eq!(tl.total_duration, 10.0);
    assert_invariants(&tl);
}

#[test]
fn projected_slides_remember_their_shot() {
    let mut tl = Timeline::new("ep-1");
    let shots = vec![shot(Some("s1.png"), None)];
    let created = tl.project_shots(&shots);

    let slide = tl.find_slide(created[0]).unwrap();
    assert_eq!(slide.source_shot_id, Some(shots[0].shot_id));
    assert!(tl.add_slide("up.png") != created[0]);
    assert!(tl.find_slide(created[0]).unwrap().source_shot_id.is_some());
}

// ── Editing scenario ───────────────────────────────────────────

#[test]
fn drag_and_trim_sequence_keeps_invariants() {
    let mut tl = Timeline::new("ep-1");
    let ids: Vec<Uuid> = (0..4).map(|i| tl.add_slide(format!("s{}.png", i))).collect();

    // drag the last slide onto the first, stretch one, shrink another
    assert!(tl.move_slide(ids[3], 1.0));
    assert_invariants(&tl);

    assert!(tl.resize_slide_end(ids[0], 8.0));
    assert_invariants(&tl);

    assert!(tl.resize_slide_end(ids[2], 0.1)); // clamps up to the floor
    assert_invariants(&tl);
    assert_eq!(tl.find_slide(ids[2]).unwrap().duration, MIN_DURATION);

    assert!(tl.move_slide(ids[1], -100.0));
    assert_invariants(&tl);
}

#[test]
fn gap_left_by_delete_has_no_visible_slide() {
    let mut tl = Timeline::new("ep-1");
    let ids: Vec<Uuid> = (0..3).map(|_| tl.add_slide("s.png")).collect();

    tl.remove_slide(ids[1]).unwrap();

    // [0,3) occupied, [3,6) gap, [6,9) occupied
    assert_eq!(slide_at(1.0, &tl.slides).unwrap().id, ids[0]);
    assert!(slide_at(4.0, &tl.slides).is_none());
    assert_eq!(slide_at(6.0, &tl.slides).unwrap().id, ids[2]);
    assert_eq!(tl.total_duration, 9.0);
}

// ── Audio tracks on the shared axis ────────────────────────────

#[test]
fn audio_layout_is_untouched_by_slide_edits() {
    let mut tl = Timeline::new("ep-1");
    let music = tl.add_audio_track("music", "m.mp3", 0.0, 30.0);
    let vo = tl.add_audio_track("vo", "v.mp3", 2.0, 10.0);

    let s = tl.add_slide("a.png");
    tl.move_slide(s, 5.0);
    tl.resize_slide_end(s, 20.0);

    assert_eq!(tl.find_track(music).unwrap().start_time, 0.0);
    assert_eq!(tl.find_track(vo).unwrap().start_time, 2.0);
    assert_eq!(tl.total_duration, 30.0);
}

#[test]
fn longest_entity_defines_the_total() {
    let mut tl = Timeline::new("ep-1");
    tl.add_slide("a.png");
    let track = tl.add_audio_track("music", "m.mp3", 1.0, 2.0);
    assert_eq!(tl.total_duration, 3.0);

    tl.set_track_duration(track, 90.0);
    assert_eq!(tl.total_duration, 91.0);

    tl.remove_audio_track(track).unwrap();
    assert_eq!(tl.total_duration, 3.0);
}
