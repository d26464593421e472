use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Timed
// ---------------------------------------------------------------------------

/// Anything that occupies a half-open time span `[start, end)` on a row.
pub trait Timed {
    fn id(&self) -> Uuid;
    fn row(&self) -> u32;
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    /// Only positioned elements take part in canvas grid layout.
    fn is_positioned(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// TimelineInterval
// ---------------------------------------------------------------------------

/// A row-scoped time span in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimelineInterval {
    pub id: Uuid,
    pub row: u32,
    pub start: f64,
    pub end: f64,
}

impl TimelineInterval {
    pub fn new(row: u32, start: f64, end: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            row,
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl Timed for TimelineInterval {
    fn id(&self) -> Uuid {
        self.id
    }

    fn row(&self) -> u32 {
        self.row
    }

    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

// ---------------------------------------------------------------------------
// ElementKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Video,
    Audio,
    Image,
    Text,
}

impl ElementKind {
    pub fn is_positioned(self) -> bool {
        matches!(self, ElementKind::Video)
    }
}

// ---------------------------------------------------------------------------
// CanvasRect
// ---------------------------------------------------------------------------

/// Rectangle in output-canvas pixel space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn full(canvas: Canvas) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
        }
    }

    pub fn intersects(&self, other: &CanvasRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// TimelineElement
// ---------------------------------------------------------------------------

/// A placed element as held by the project state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineElement {
    pub id: Uuid,
    pub kind: ElementKind,
    pub row: u32,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<CanvasRect>,
}

impl TimelineElement {
    pub fn new(kind: ElementKind, row: u32, start: f64, end: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            row,
            start,
            end,
            rect: None,
        }
    }

    pub fn with_rect(mut self, rect: CanvasRect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn interval(&self) -> TimelineInterval {
        TimelineInterval {
            id: self.id,
            row: self.row,
            start: self.start,
            end: self.end,
        }
    }
}

impl Timed for TimelineElement {
    fn id(&self) -> Uuid {
        self.id
    }

    fn row(&self) -> u32 {
        self.row
    }

    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn is_positioned(&self) -> bool {
        self.kind.is_positioned()
    }
}

// ---------------------------------------------------------------------------
// PlacementRequest
// ---------------------------------------------------------------------------

/// A proposed placement produced by a single drop or drag action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlacementRequest {
    pub desired_row: Option<u32>,
    pub start: f64,
    pub end: f64,
}

impl PlacementRequest {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            desired_row: None,
            start,
            end,
        }
    }

    pub fn on_row(mut self, row: u32) -> Self {
        self.desired_row = Some(row);
        self
    }
}

// ---------------------------------------------------------------------------
// TransitionWindow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransitionWindow {
    pub start: f64,
    pub width: f64,
}

impl TransitionWindow {
    pub fn end(&self) -> f64 {
        self.start + self.width
    }
}

// ---------------------------------------------------------------------------
// LayoutConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap in pixels around and between grid cells.
    pub padding: f64,
    /// Minimum on-screen width of a transition marker.
    pub min_transition_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            min_transition_px: 20.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectSettings / Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    pub elements: Vec<TimelineElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub settings: ProjectSettings,
    pub timeline: Timeline,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_projects_to_interval() {
        let el = TimelineElement::new(ElementKind::Video, 2, 1.5, 4.0);
        let iv = el.interval();
        assert_eq!(iv.id, el.id);
        assert_eq!(iv.row, 2);
        assert_eq!(iv.start, 1.5);
        assert_eq!(iv.end, 4.0);
        assert!((iv.duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn only_video_is_positioned() {
        assert!(ElementKind::Video.is_positioned());
        assert!(!ElementKind::Audio.is_positioned());
        assert!(!ElementKind::Image.is_positioned());
        assert!(!ElementKind::Text.is_positioned());

        let iv = TimelineInterval::new(0, 0.0, 1.0);
        assert!(!iv.is_positioned());
    }

    #[test]
    fn full_rect_matches_canvas() {
        let rect = CanvasRect::full(Canvas::new(1920.0, 1080.0));
        assert_eq!(
            rect,
            CanvasRect {
                x: 0.0,
                y: 0.0,
                width: 1920.0,
                height: 1080.0
            }
        );
    }

    #[test]
    fn rect_intersection_ignores_touching_edges() {
        let a = CanvasRect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
        let b = CanvasRect { x: 10.0, y: 0.0, width: 10.0, height: 10.0 };
        let c = CanvasRect { x: 5.0, y: 5.0, width: 10.0, height: 10.0 };
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }

    #[test]
    fn placement_request_builder() {
        let req = PlacementRequest::new(1.0, 2.0).on_row(3);
        assert_eq!(req.desired_row, Some(3));
    }

    #[test]
    fn layout_config_defaults() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.padding, 10.0);
        assert_eq!(cfg.min_transition_px, 20.0);
    }

    #[test]
    fn layout_config_partial_json_uses_defaults() {
        let cfg: LayoutConfig = serde_json::from_str(r#"{"padding": 4.0}"#).unwrap();
        assert_eq!(cfg.padding, 4.0);
        assert_eq!(cfg.min_transition_px, 20.0);
    }

    #[test]
    fn serde_roundtrip_element_kind_lowercase() {
        let json = serde_json::to_string(&ElementKind::Video).unwrap();
        assert_eq!(json, "\"video\"");
    }

    #[test]
    fn serde_element_without_rect() {
        let el = TimelineElement::new(ElementKind::Audio, 0, 0.0, 3.0);
        let json = serde_json::to_string(&el).unwrap();
        assert!(!json.contains("rect"));
        let back: TimelineElement = serde_json::from_str(&json).unwrap();
        assert_eq!(el, back);
    }
}
