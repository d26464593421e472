use crate::interval::IntervalIndex;
use crate::types::{PlacementRequest, Timed};
use uuid::Uuid;

/// Pick the row for a new `[start, end)` span.
///
/// Row 0 wins whenever it is free, so fresh content lands on top. Otherwise the
/// first free row in `1..=max_row` is used, falling back to `max_row + 1`,
/// which is empty by construction. At `u32::MAX` there is no row above, so the
/// last row is reused and a warning logged. Never fails.
pub fn allocate_row<T: Timed>(elements: &[T], start: f64, end: f64) -> u32 {
    allocate_row_excluding(elements, start, end, None)
}

/// Same as [`allocate_row`], ignoring `exclude_id` (the element being moved).
pub fn allocate_row_excluding<T: Timed>(
    elements: &[T],
    start: f64,
    end: f64,
    exclude_id: Option<Uuid>,
) -> u32 {
    let index = IntervalIndex::new(elements);

    if !index.overlaps(0, start, end, exclude_id) {
        return 0;
    }

    // Row 0 is occupied here, so the snapshot is non-empty.
    let max_row = index.max_row().unwrap_or(0);
    let row = (1..=max_row)
        .find(|&row| !index.overlaps(row, start, end, exclude_id))
        .unwrap_or_else(|| {
            max_row.checked_add(1).unwrap_or_else(|| {
                tracing::warn!(max_row, "no row left above the last one, reusing it");
                max_row
            })
        });

    tracing::debug!(start, end, row, max_row, "allocated row");
    row
}

/// Honour the requested row if it is free, otherwise allocate one.
pub fn resolve_row<T: Timed>(
    elements: &[T],
    request: &PlacementRequest,
    exclude_id: Option<Uuid>,
) -> u32 {
    if let Some(desired) = request.desired_row {
        let index = IntervalIndex::new(elements);
        if !index.overlaps(desired, request.start, request.end, exclude_id) {
            return desired;
        }
        tracing::debug!(desired, "requested row occupied, allocating");
    }
    allocate_row_excluding(elements, request.start, request.end, exclude_id)
}
