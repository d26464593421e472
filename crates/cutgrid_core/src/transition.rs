use crate::interval::IntervalIndex;
use crate::types::{LayoutConfig, Timed, TransitionWindow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Window for a transition between a clip ending at `from_clip_end` and the
/// next one starting at `to_clip_start`, both in seconds.
///
/// The window is centred on the midpoint of the gap (or overlap). Its width is
/// clamped to the gap when the clips are apart, but not to the overlap when
/// they collide, so an overlapping pair can get a window wider than the
/// overlap itself.
pub fn place_transition(
    from_clip_end: f64,
    to_clip_start: f64,
    transition_duration_ms: f64,
) -> TransitionWindow {
    let gap = to_clip_start - from_clip_end;
    let duration = transition_duration_ms / 1000.0;
    let start = from_clip_end + gap / 2.0 - duration / 2.0;

    let width = if gap <= 0.0 {
        duration
    } else {
        gap.min(duration)
    };

    TransitionWindow { start, width }
}

impl TransitionWindow {
    /// On-screen width of the window, never narrower than
    /// `config.min_transition_px` so it stays visible and clickable.
    pub fn display_width_px(&self, pixels_per_second: f64, config: &LayoutConfig) -> f64 {
        (self.width * pixels_per_second).max(config.min_transition_px)
    }
}

/// A place between two neighbouring clips where a transition could go.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransitionSlot {
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub window: TransitionWindow,
}

/// Candidate transition slots for every consecutive pair of clips on `row`.
pub fn transition_slots<T: Timed>(
    elements: &[T],
    row: u32,
    transition_duration_ms: f64,
) -> Vec<TransitionSlot> {
    let ordered = IntervalIndex::new(elements).intervals_in_row(row);
    ordered
        .windows(2)
        .map(|pair| TransitionSlot {
            from_id: pair[0].id(),
            to_id: pair[1].id(),
            window: place_transition(pair[0].end(), pair[1].start(), transition_duration_ms),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimelineInterval;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn gap_window_is_centred_and_clamped_to_duration() {
        let w = place_transition(10.0, 12.0, 500.0);
        assert!(approx(w.start, 10.75));
        assert!(approx(w.width, 0.5));
        assert!(approx(w.start + w.width / 2.0, 11.0));
    }

    #[test]
    fn gap_window_is_clamped_to_small_gap() {
        // Gap of 0.2s, 1s transition: width clamps to the gap.
        let w = place_transition(5.0, 5.2, 1000.0);
        assert!(approx(w.width, 0.2));
        assert!(approx(w.start, 5.1 - 0.5));
    }

    #[test]
    fn overlap_window_is_not_clamped() {
        let w = place_transition(10.0, 9.0, 1000.0);
        assert!(approx(w.start, 9.0));
        assert!(approx(w.width, 1.0));

        // 0.5s overlap, 2s transition: the window is wider than the overlap.
        let w = place_transition(10.0, 9.5, 2000.0);
        assert!(approx(w.width, 2.0));
        assert!(approx(w.start, 8.75));
    }

    #[test]
    fn touching_clips_use_full_duration() {
        let w = place_transition(4.0, 4.0, 600.0);
        assert!(approx(w.start, 3.7));
        assert!(approx(w.width, 0.6));
        assert!(approx(w.end(), 4.3));
    }

    #[test]
    fn display_width_has_minimum() {
        let cfg = LayoutConfig::default();
        let w = place_transition(10.0, 10.1, 500.0);
        // 0.1s at 50 px/s = 5px, raised to 20px.
        assert!(approx(w.display_width_px(50.0, &cfg), 20.0));
        // 0.1s at 1000 px/s = 100px.
        assert!(approx(w.display_width_px(1000.0, &cfg), 100.0));
    }

    #[test]
    fn slots_follow_row_order() {
        let a = TimelineInterval::new(0, 0.0, 4.0);
        let b = TimelineInterval::new(0, 6.0, 9.0);
        let c = TimelineInterval::new(0, 9.0, 12.0);
        let other_row = TimelineInterval::new(1, 4.0, 6.0);
        let elements = vec![c, other_row, a, b];

        let slots = transition_slots(&elements, 0, 500.0);
        assert_eq!(slots.len(), 2);
        assert_eq!((slots[0].from_id, slots[0].to_id), (a.id, b.id));
        assert!(approx(slots[0].window.start, 4.75));
        assert_eq!((slots[1].from_id, slots[1].to_id), (b.id, c.id));
        assert!(approx(slots[1].window.start, 8.75));
    }

    #[test]
    fn single_clip_has_no_slots() {
        let elements = vec![TimelineInterval::new(0, 0.0, 4.0)];
        assert!(transition_slots(&elements, 0, 500.0).is_empty());
    }
}
