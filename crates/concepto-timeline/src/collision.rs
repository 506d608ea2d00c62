//! Collision resolution for slides.
//!
//! Slides must occupy pairwise-disjoint half-open intervals. After any
//! mutation the whole set is renormalized with a single left-to-right
//! cursor sweep: earlier slides always win, later slides are trimmed by
//! the overlap (never below `MIN_DURATION`) and pushed right. Because
//! the cursor advances to each slide's post-trim end, a push cascades
//! through every later slide, so the invariant holds even for densely
//! packed timelines where trimming bottoms out at the floor.

use std::cmp::Ordering;

use concepto_core::constants::MIN_DURATION;
use concepto_core::{clamp_duration, clamp_start};

use crate::slide::Slide;

/// Normalize a slide set into a non-overlapping arrangement.
///
/// Idempotent: a set that already satisfies the invariant comes back
/// unchanged (modulo sort order by start time).
pub fn normalize(mut slides: Vec<Slide>) -> Vec<Slide> {
    slides.sort_by(|a, b| {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(Ordering::Equal)
    });

    let mut cursor = 0.0_f64;
    for slide in &mut slides {
        let start = clamp_start(slide.start_time);
        slide.duration = clamp_duration(slide.duration);

        if start < cursor {
            let overlap = cursor - start;
            slide.duration = (slide.duration - overlap).max(MIN_DURATION);
            slide.start_time = cursor;
        } else {
            slide.start_time = start;
        }

        cursor = slide.start_time + slide.duration;
    }

    slides
}

/// Check the disjointness + minimum-duration invariant. Used by tests
/// and debug assertions.
pub fn is_normalized(slides: &[Slide]) -> bool {
    let mut sorted: Vec<&Slide> = slides.iter().collect();
    sorted.sort_by(|a, b| {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(Ordering::Equal)
    });

    let mut prev_end = 0.0_f64;
    for slide in sorted {
        if slide.start_time < 0.0 || slide.duration < MIN_DURATION {
            return false;
        }
        if slide.start_time < prev_end {
            return false;
        }
        prev_end = slide.end();
    }
    true
}
