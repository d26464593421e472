//! Timeline layout engine: row allocation, canvas grid placement for
//! simultaneous videos, and transition timing.

pub mod allocator;
pub mod editing;
pub mod error;
pub mod events;
pub mod grid;
pub mod interval;
pub mod project;
pub mod transition;
pub mod types;

pub use allocator::{allocate_row, allocate_row_excluding, resolve_row};
pub use error::{CoreError, Result};
pub use grid::{arrange_overlapping, grid_dims, resolve_placement, GridDims};
pub use interval::{any_overlap, row_overlap, spans_overlap, IntervalIndex};
pub use transition::{place_transition, transition_slots, TransitionSlot};
