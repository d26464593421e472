use crate::allocator::resolve_row;
use crate::error::{CoreError, Result};
use crate::grid::{arrange_overlapping, resolve_placement};
use crate::interval::{is_proper_span, row_overlap};
use crate::types::*;
use uuid::Uuid;

impl Timeline {
    pub fn new() -> Self {
        Self { elements: vec![] }
    }

    /// Place a new element. The row comes from the request if free, otherwise
    /// from the allocator; videos also get a canvas rect. Returns the new id.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        request: &PlacementRequest,
        canvas: Canvas,
        config: &LayoutConfig,
    ) -> Result<Uuid> {
        validate_span(request.start, request.end)?;

        let row = resolve_row(&self.elements, request, None);
        let mut element = TimelineElement::new(kind, row, request.start, request.end);
        if kind.is_positioned() {
            element.rect = Some(resolve_placement(
                row,
                &self.elements,
                request.start,
                request.end,
                canvas,
                config,
            ));
        }

        let id = element.id;
        tracing::debug!(%id, ?kind, row, "element added");
        self.elements.push(element);
        Ok(id)
    }

    /// Move or resize an element. Returns the row it ended up on.
    pub fn move_element(
        &mut self,
        element_id: Uuid,
        request: &PlacementRequest,
        canvas: Canvas,
        config: &LayoutConfig,
    ) -> Result<u32> {
        validate_span(request.start, request.end)?;
        let idx = self
            .position(element_id)
            .ok_or(CoreError::ElementNotFound(element_id))?;

        let row = resolve_row(&self.elements, request, Some(element_id));
        let rect = if self.elements[idx].kind.is_positioned() {
            // Compare against everything except the element itself.
            let others: Vec<TimelineElement> = self
                .elements
                .iter()
                .filter(|e| e.id != element_id)
                .cloned()
                .collect();
            Some(resolve_placement(
                row,
                &others,
                request.start,
                request.end,
                canvas,
                config,
            ))
        } else {
            None
        };

        let element = &mut self.elements[idx];
        element.row = row;
        element.start = request.start;
        element.end = request.end;
        element.rect = rect;

        tracing::debug!(id = %element_id, row, "element moved");
        Ok(row)
    }

    /// Remove an element by its id. Returns the removed element.
    pub fn remove_element(&mut self, element_id: Uuid) -> Result<TimelineElement> {
        let idx = self
            .position(element_id)
            .ok_or(CoreError::ElementNotFound(element_id))?;
        Ok(self.elements.remove(idx))
    }

    pub fn element(&self, element_id: Uuid) -> Option<&TimelineElement> {
        self.elements.iter().find(|e| e.id == element_id)
    }

    pub fn intervals(&self) -> Vec<TimelineInterval> {
        self.elements.iter().map(TimelineElement::interval).collect()
    }

    /// Would `[start, end)` collide with something already on `row`?
    pub fn is_row_free(&self, row: u32, start: f64, end: f64) -> bool {
        !row_overlap(&self.elements, row, start, end, None)
    }

    /// Recompute and store canvas rects for every video.
    pub fn relayout(&mut self, canvas: Canvas, config: &LayoutConfig) {
        let layout = arrange_overlapping(&self.elements, canvas, config);
        for (id, rect) in layout {
            if let Some(element) = self.elements.iter_mut().find(|e| e.id == id) {
                element.rect = Some(rect);
            }
        }
    }

    fn position(&self, element_id: Uuid) -> Option<usize> {
        self.elements.iter().position(|e| e.id == element_id)
    }
}

fn validate_span(start: f64, end: f64) -> Result<()> {
    if is_proper_span(start, end) {
        Ok(())
    } else {
        Err(CoreError::InvalidInterval { start, end })
    }
}
