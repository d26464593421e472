//! Explicit notification between the editing core and whatever UI regions
//! care about drags and placements. Subscribers are registered on a bus the
//! host owns; nothing is broadcast through globals.

use crate::error::{CoreError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEvent {
    DragStarted { element_id: Uuid },
    DragEnded { element_id: Uuid },
    ElementPlaced { element_id: Uuid, row: u32 },
    ElementMoved { element_id: Uuid, row: u32 },
    ElementRemoved { element_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&TimelineEvent)>;

/// Synchronous, single-threaded event bus. Handlers run in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler)>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&TimelineEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if the subscription was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    pub fn publish(&mut self, event: &TimelineEvent) {
        tracing::trace!(?event, subscribers = self.handlers.len(), "publish");
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

/// A project being edited, with its layout settings and event bus.
///
/// All mutations go through here so that subscribers hear about every
/// placement decision.
#[derive(Debug)]
pub struct EditSession {
    pub project: Project,
    pub config: LayoutConfig,
    bus: EventBus,
    dragging: Option<Uuid>,
}

impl EditSession {
    pub fn new(project: Project, config: LayoutConfig) -> Self {
        Self {
            project,
            config,
            bus: EventBus::new(),
            dragging: None,
        }
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn dragging(&self) -> Option<Uuid> {
        self.dragging
    }

    pub fn begin_drag(&mut self, element_id: Uuid) -> Result<()> {
        if self.project.timeline.element(element_id).is_none() {
            return Err(CoreError::ElementNotFound(element_id));
        }
        if let Some(current) = self.dragging {
            return Err(CoreError::InvalidOperation(format!(
                "drag of {current} already in progress"
            )));
        }
        self.dragging = Some(element_id);
        self.bus.publish(&TimelineEvent::DragStarted { element_id });
        Ok(())
    }

    /// Finish the current drag, moving the dragged element to `request`.
    ///
    /// If the move fails the drag stays in progress and nothing is published.
    pub fn end_drag(&mut self, request: &PlacementRequest) -> Result<u32> {
        let element_id = self
            .dragging
            .ok_or_else(|| CoreError::InvalidOperation("no drag in progress".into()))?;
        let canvas = self.project.canvas();
        let row = self
            .project
            .timeline
            .move_element(element_id, request, canvas, &self.config)?;

        self.dragging = None;
        self.bus.publish(&TimelineEvent::DragEnded { element_id });
        self.bus.publish(&TimelineEvent::ElementMoved { element_id, row });
        Ok(row)
    }

    pub fn place(&mut self, kind: ElementKind, request: &PlacementRequest) -> Result<Uuid> {
        let canvas = self.project.canvas();
        let element_id = self
            .project
            .timeline
            .add_element(kind, request, canvas, &self.config)?;
        let row = self.row_of(element_id)?;
        self.bus.publish(&TimelineEvent::ElementPlaced { element_id, row });
        Ok(element_id)
    }

    pub fn move_element(&mut self, element_id: Uuid, request: &PlacementRequest) -> Result<u32> {
        let canvas = self.project.canvas();
        let row = self
            .project
            .timeline
            .move_element(element_id, request, canvas, &self.config)?;
        self.bus.publish(&TimelineEvent::ElementMoved { element_id, row });
        Ok(row)
    }

    pub fn remove(&mut self, element_id: Uuid) -> Result<TimelineElement> {
        let removed = self.project.timeline.remove_element(element_id)?;
        if self.dragging == Some(element_id) {
            self.dragging = None;
        }
        self.bus.publish(&TimelineEvent::ElementRemoved { element_id });
        Ok(removed)
    }

    fn row_of(&self, element_id: Uuid) -> Result<u32> {
        self.project
            .timeline
            .element(element_id)
            .map(|e| e.row)
            .ok_or(CoreError::ElementNotFound(element_id))
    }
}
