use crate::types::Timed;
use uuid::Uuid;

/// Half-open overlap test for `[s1, e1)` and `[s2, e2)`.
///
/// Touching endpoints do not overlap. A span with `end <= start` (or any
/// non-finite bound) is degenerate and never overlaps anything.
pub fn spans_overlap(s1: f64, e1: f64, s2: f64, e2: f64) -> bool {
    if !is_proper_span(s1, e1) || !is_proper_span(s2, e2) {
        return false;
    }
    s1 < e2 && s2 < e1
}

pub(crate) fn is_proper_span(start: f64, end: f64) -> bool {
    start.is_finite() && end.is_finite() && start < end
}

/// Read-only view over a caller-supplied snapshot of timed elements.
///
/// The index never enforces the no-overlap invariant; it only answers
/// questions about the slice it borrows.
#[derive(Debug, Clone, Copy)]
pub struct IntervalIndex<'a, T> {
    items: &'a [T],
}

impl<'a, T: Timed> IntervalIndex<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Intervals on `row`, ordered by start (ties broken by end).
    pub fn intervals_in_row(&self, row: u32) -> Vec<&'a T> {
        let mut out: Vec<&'a T> = self.items.iter().filter(|i| i.row() == row).collect();
        out.sort_by(|a, b| {
            a.start()
                .total_cmp(&b.start())
                .then_with(|| a.end().total_cmp(&b.end()))
        });
        out
    }

    /// True iff some interval on `row`, other than `exclude_id`, overlaps `[start, end)`.
    pub fn overlaps(&self, row: u32, start: f64, end: f64, exclude_id: Option<Uuid>) -> bool {
        self.items.iter().any(|other| {
            other.row() == row
                && Some(other.id()) != exclude_id
                && spans_overlap(start, end, other.start(), other.end())
        })
    }

    pub fn max_row(&self) -> Option<u32> {
        self.items.iter().map(|i| i.row()).max()
    }

    /// Distinct occupied rows, ascending.
    pub fn rows(&self) -> Vec<u32> {
        let mut rows: Vec<u32> = self.items.iter().map(|i| i.row()).collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Row-scoped overlap: does `[start, end)` collide with anything on `row`?
pub fn row_overlap<T: Timed>(
    elements: &[T],
    row: u32,
    start: f64,
    end: f64,
    exclude_id: Option<Uuid>,
) -> bool {
    IntervalIndex::new(elements).overlaps(row, start, end, exclude_id)
}

/// Project-wide overlap: do any two positioned elements overlap in time,
/// on any rows? This decides whether grid layout applies at all.
pub fn any_overlap<T: Timed>(elements: &[T]) -> bool {
    let positioned: Vec<&T> = elements.iter().filter(|e| e.is_positioned()).collect();
    positioned.iter().enumerate().any(|(i, a)| {
        positioned[i + 1..]
            .iter()
            .any(|b| spans_overlap(a.start(), a.end(), b.start(), b.end()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementKind, TimelineElement, TimelineInterval};

    fn iv(row: u32, start: f64, end: f64) -> TimelineInterval {
        TimelineInterval::new(row, start, end)
    }

    // -----------------------------------------------------------------------
    // spans_overlap
    // -----------------------------------------------------------------------

    #[test]
    fn touching_spans_do_not_overlap() {
        assert!(!spans_overlap(0.0, 5.0, 5.0, 10.0));
        assert!(!spans_overlap(5.0, 10.0, 0.0, 5.0));
    }

    #[test]
    fn crossing_spans_overlap() {
        assert!(spans_overlap(0.0, 5.0, 4.999, 10.0));
        assert!(spans_overlap(2.0, 3.0, 0.0, 10.0));
    }

    #[test]
    fn degenerate_spans_never_overlap() {
        assert!(!spans_overlap(5.0, 5.0, 0.0, 10.0));
        assert!(!spans_overlap(6.0, 4.0, 0.0, 10.0));
        assert!(!spans_overlap(0.0, 10.0, 3.0, 3.0));
        assert!(!spans_overlap(f64::NAN, 1.0, 0.0, 10.0));
    }

    // -----------------------------------------------------------------------
    // IntervalIndex
    // -----------------------------------------------------------------------

    #[test]
    fn intervals_in_row_are_sorted_by_start() {
        let items = vec![iv(0, 8.0, 9.0), iv(1, 0.0, 1.0), iv(0, 2.0, 3.0), iv(0, 5.0, 6.0)];
        let index = IntervalIndex::new(&items);
        let starts: Vec<f64> = index.intervals_in_row(0).iter().map(|i| i.start).collect();
        assert_eq!(starts, vec![2.0, 5.0, 8.0]);
        assert_eq!(index.intervals_in_row(1).len(), 1);
        assert!(index.intervals_in_row(7).is_empty());
    }

    #[test]
    fn overlaps_respects_row_and_exclusion() {
        let a = iv(0, 0.0, 5.0);
        let items = vec![a, iv(1, 10.0, 12.0)];
        let index = IntervalIndex::new(&items);

        assert!(index.overlaps(0, 4.0, 6.0, None));
        assert!(!index.overlaps(0, 4.0, 6.0, Some(a.id)));
        assert!(!index.overlaps(1, 4.0, 6.0, None));
        assert!(!index.overlaps(0, 5.0, 6.0, None));
    }

    #[test]
    fn rows_and_max_row() {
        let items = vec![iv(3, 0.0, 1.0), iv(0, 0.0, 1.0), iv(3, 2.0, 3.0)];
        let index = IntervalIndex::new(&items);
        assert_eq!(index.rows(), vec![0, 3]);
        assert_eq!(index.max_row(), Some(3));
        assert_eq!(index.len(), 3);

        let empty: Vec<TimelineInterval> = vec![];
        assert_eq!(IntervalIndex::new(&empty).max_row(), None);
        assert!(IntervalIndex::new(&empty).is_empty());
    }

    // -----------------------------------------------------------------------
    // row_overlap vs any_overlap
    // -----------------------------------------------------------------------

    #[test]
    fn row_and_global_predicates_differ() {
        // Two videos overlap in time but sit on different rows.
        let elements = vec![
            TimelineElement::new(ElementKind::Video, 0, 0.0, 5.0),
            TimelineElement::new(ElementKind::Video, 1, 2.0, 7.0),
        ];
        assert!(any_overlap(&elements));
        assert!(!row_overlap(&elements, 0, 5.0, 9.0, None));
        assert!(row_overlap(&elements, 1, 6.0, 9.0, None));
    }

    #[test]
    fn any_overlap_ignores_non_positioned_kinds() {
        let elements = vec![
            TimelineElement::new(ElementKind::Video, 0, 0.0, 5.0),
            TimelineElement::new(ElementKind::Audio, 1, 0.0, 5.0),
            TimelineElement::new(ElementKind::Text, 2, 1.0, 2.0),
        ];
        assert!(!any_overlap(&elements));
    }

    #[test]
    fn any_overlap_false_for_sequential_videos() {
        let elements = vec![
            TimelineElement::new(ElementKind::Video, 0, 0.0, 5.0),
            TimelineElement::new(ElementKind::Video, 1, 5.0, 7.0),
        ];
        assert!(!any_overlap(&elements));
    }
}
