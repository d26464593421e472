//! Canvas grid layout for videos that play at the same time on the same row.

use crate::interval::{any_overlap, spans_overlap};
use crate::types::{Canvas, CanvasRect, LayoutConfig, TimelineElement};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridDims {
    pub cols: u32,
    pub rows: u32,
}

impl GridDims {
    pub fn cells(&self) -> u32 {
        self.cols * self.rows
    }
}

/// Grid size for `n` simultaneously visible elements (the new one included).
pub fn grid_dims(n: usize) -> GridDims {
    match n {
        0..=2 => GridDims { cols: 2, rows: 1 },
        3..=4 => GridDims { cols: 2, rows: 2 },
        5..=6 => GridDims { cols: 3, rows: 2 },
        _ => GridDims {
            cols: 3,
            rows: n.div_ceil(3) as u32,
        },
    }
}

/// Compute where a new video spanning `[start, end)` on `row` goes on the canvas.
///
/// Only positioned elements on the same row that overlap in time are
/// considered. With none, the element gets the whole canvas.
pub fn resolve_placement(
    row: u32,
    existing: &[TimelineElement],
    start: f64,
    end: f64,
    canvas: Canvas,
    config: &LayoutConfig,
) -> CanvasRect {
    let overlapping: Vec<&TimelineElement> = existing
        .iter()
        .filter(|e| e.row == row && e.kind.is_positioned())
        .filter(|e| spans_overlap(start, end, e.start, e.end))
        .collect();

    if overlapping.is_empty() {
        return CanvasRect::full(canvas);
    }

    let dims = grid_dims(overlapping.len() + 1);
    let occupied: Vec<u32> = overlapping
        .iter()
        .map(|e| cell_of(e.rect.as_ref(), canvas, dims))
        .collect();
    let cell = first_free_cell(&occupied, dims);

    tracing::debug!(
        row,
        cols = dims.cols,
        rows = dims.rows,
        cell,
        overlapping = overlapping.len(),
        "resolved grid placement"
    );
    cell_rect(cell, dims, canvas, config.padding)
}

/// Lay out every video in the project.
///
/// Whether a grid is used at all depends on the project-wide predicate. Each
/// row's videos are then split into overlap groups (chains of clips linked by
/// time overlap); a group of one keeps the full canvas, a larger group gets a
/// grid sized for its members with one cell each, in `start` order.
pub fn arrange_overlapping(
    elements: &[TimelineElement],
    canvas: Canvas,
    config: &LayoutConfig,
) -> Vec<(Uuid, CanvasRect)> {
    let mut videos: Vec<&TimelineElement> =
        elements.iter().filter(|e| e.kind.is_positioned()).collect();

    if !any_overlap(elements) {
        return videos
            .into_iter()
            .map(|v| (v.id, CanvasRect::full(canvas)))
            .collect();
    }

    videos.sort_by(|a, b| {
        a.row
            .cmp(&b.row)
            .then(a.start.total_cmp(&b.start))
            .then(a.end.total_cmp(&b.end))
    });

    let mut out = Vec::with_capacity(videos.len());
    for group in overlap_groups(&videos) {
        if group.len() == 1 {
            out.push((group[0].id, CanvasRect::full(canvas)));
            continue;
        }
        let dims = grid_dims(group.len());
        tracing::debug!(
            row = group[0].row,
            members = group.len(),
            cols = dims.cols,
            rows = dims.rows,
            "arranged overlap group"
        );
        for (cell, video) in group.iter().enumerate() {
            out.push((video.id, cell_rect(cell as u32, dims, canvas, config.padding)));
        }
    }
    out
}

/// Split videos sorted by `(row, start)` into runs that share a row and are
/// chained by time overlap.
fn overlap_groups<'a>(sorted: &[&'a TimelineElement]) -> Vec<Vec<&'a TimelineElement>> {
    let mut groups: Vec<Vec<&TimelineElement>> = Vec::new();
    let mut reach = f64::NEG_INFINITY;

    for &video in sorted {
        match groups.last_mut() {
            Some(group)
                if group[0].row == video.row
                    && spans_overlap(group[0].start, reach, video.start, video.end) =>
            {
                reach = reach.max(video.end);
                group.push(video);
            }
            _ => {
                reach = video.end;
                groups.push(vec![video]);
            }
        }
    }
    groups
}

/// Map a stored rect back to the cell index it occupies in `dims`.
/// Elements without a stored rect sit at the origin.
fn cell_of(rect: Option<&CanvasRect>, canvas: Canvas, dims: GridDims) -> u32 {
    let (x, y) = rect.map(|r| (r.x, r.y)).unwrap_or((0.0, 0.0));
    let col = axis_cell(x, canvas.width, dims.cols);
    let row = axis_cell(y, canvas.height, dims.rows);
    row * dims.cols + col
}

fn axis_cell(pos: f64, extent: f64, count: u32) -> u32 {
    if extent <= 0.0 || count == 0 {
        return 0;
    }
    // Saturating float cast: negatives and NaN become 0.
    let cell = (pos / extent * count as f64).floor() as u32;
    cell.min(count - 1)
}

/// First cell, row-major, not present in `occupied`. If the grid is full the
/// caller handed us stale counts; clamp to the last cell instead of failing.
fn first_free_cell(occupied: &[u32], dims: GridDims) -> u32 {
    let cells = dims.cells();
    (0..cells)
        .find(|c| !occupied.contains(c))
        .unwrap_or_else(|| {
            tracing::warn!(
                cells,
                occupied = occupied.len(),
                "grid exhausted, clamping to last cell"
            );
            cells.saturating_sub(1)
        })
}

fn cell_rect(cell: u32, dims: GridDims, canvas: Canvas, padding: f64) -> CanvasRect {
    let col = (cell % dims.cols) as f64;
    let row = (cell / dims.cols) as f64;
    let cols = dims.cols as f64;
    let rows = dims.rows as f64;

    let width = (canvas.width - (cols + 1.0) * padding) / cols;
    let height = (canvas.height - (rows + 1.0) * padding) / rows;

    CanvasRect {
        x: padding + col * (width + padding),
        y: padding + row * (height + padding),
        width,
        height,
    }
}
