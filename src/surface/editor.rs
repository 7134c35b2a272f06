use uuid::Uuid;

use super::{AnnotationSurface, SurfaceEvent, SurfaceFrame};
use crate::adapter::{LabelError, LabelResult};
use crate::geometry::{Corner, Dimensions, Point, Rectangle, Rectangles};

const DEFAULT_HANDLE_TOLERANCE: i32 = 8;
const DEFAULT_HIT_PADDING: i32 = 4;
const DEFAULT_MIN_BOX_SIZE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Max distance from a corner, per axis, that still grabs the handle.
    pub handle_tolerance: i32,
    pub hit_padding: i32,
    /// Created or resized boxes below this size on either axis are rejected.
    pub min_box_size: u32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            handle_tolerance: DEFAULT_HANDLE_TOLERANCE,
            hit_padding: DEFAULT_HIT_PADDING,
            min_box_size: DEFAULT_MIN_BOX_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragState {
    Create {
        start: Point,
        current: Point,
    },
    Move {
        id: String,
        origin: Rectangle,
        start: Point,
        current: Point,
    },
    Resize {
        id: String,
        corner: Corner,
        origin: Rectangle,
        current: Point,
    },
}

impl DragState {
    fn target_id(&self) -> Option<&str> {
        match self {
            Self::Create { .. } => None,
            Self::Move { id, .. } | Self::Resize { id, .. } => Some(id),
        }
    }

    fn set_current(&mut self, point: Point) {
        match self {
            Self::Create { current, .. }
            | Self::Move { current, .. }
            | Self::Resize { current, .. } => *current = point,
        }
    }
}

/// In-progress geometry of the active gesture. `id` is `None` while creating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPreview {
    pub id: Option<String>,
    pub rectangle: Rectangle,
}

/// Gesture model for drawing, moving and resizing boxes in displayed space.
#[derive(Debug, Clone, Default)]
pub struct BoxEditor {
    options: EditorOptions,
    frame: Option<SurfaceFrame>,
    drag: Option<DragState>,
}

impl AnnotationSurface for BoxEditor {
    fn present(&mut self, frame: SurfaceFrame) {
        let scale_changed = self
            .frame
            .as_ref()
            .is_some_and(|previous| previous.generation != frame.generation);
        let target_missing = self
            .drag
            .as_ref()
            .and_then(DragState::target_id)
            .is_some_and(|id| !frame.rectangles.contains_key(id));
        if self.drag.is_some() && (scale_changed || target_missing) {
            tracing::debug!(
                scale_changed,
                target_missing,
                "cancelling drag after frame change"
            );
            self.drag = None;
        }
        self.frame = Some(frame);
    }
}

impl BoxEditor {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            options,
            frame: None,
            drag: None,
        }
    }

    pub fn options(&self) -> EditorOptions {
        self.options
    }

    pub fn frame(&self) -> Option<&SurfaceFrame> {
        self.frame.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }

    pub fn press(&mut self, point: Point) -> Vec<SurfaceEvent> {
        let Some(frame) = self.frame.as_mut() else {
            return Vec::new();
        };
        let point = clamp_point(point, frame.displayed);

        if let Some((id, corner)) = selected_handle_at(frame, point, self.options.handle_tolerance)
        {
            let origin = frame.rectangles[&id];
            self.drag = Some(DragState::Resize {
                id,
                corner,
                origin,
                current: point,
            });
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(id) = rectangle_at(frame, point, self.options.hit_padding) {
            if frame.selected.as_deref() != Some(id.as_str()) {
                frame.selected = Some(id.clone());
                events.push(SurfaceEvent::SelectionChanged(Some(id.clone())));
            }
            let origin = frame.rectangles[&id];
            self.drag = Some(DragState::Move {
                id,
                origin,
                start: point,
                current: point,
            });
            return events;
        }

        if frame.selected.take().is_some() {
            events.push(SurfaceEvent::SelectionChanged(None));
        }
        self.drag = Some(DragState::Create {
            start: point,
            current: point,
        });
        events
    }

    pub fn drag_to(&mut self, point: Point) {
        let (Some(frame), Some(drag)) = (self.frame.as_ref(), self.drag.as_mut()) else {
            return;
        };
        drag.set_current(clamp_point(point, frame.displayed));
    }

    pub fn release(&mut self, point: Point) -> Vec<SurfaceEvent> {
        self.drag_to(point);
        let (Some(frame), Some(drag)) = (self.frame.as_mut(), self.drag.take()) else {
            return Vec::new();
        };
        let min_size = self.options.min_box_size;

        match drag {
            DragState::Create { start, current } => {
                let rectangle = Rectangle::spanning(start, current);
                if rectangle.width < min_size || rectangle.height < min_size {
                    return Vec::new();
                }
                let id = Uuid::new_v4().to_string();
                frame.rectangles.insert(id.clone(), rectangle);
                frame.selected = Some(id.clone());
                vec![
                    SurfaceEvent::RectanglesEdited(frame.rectangles.clone()),
                    SurfaceEvent::SelectionChanged(Some(id)),
                ]
            }
            DragState::Move {
                id,
                origin,
                start,
                current,
            } => {
                let moved = moved_within(
                    origin,
                    current.x.saturating_sub(start.x),
                    current.y.saturating_sub(start.y),
                    frame.displayed,
                );
                replace_rectangle(&mut frame.rectangles, id, origin, moved)
            }
            DragState::Resize {
                id,
                corner,
                origin,
                current,
            } => match resized_from_corner(origin, corner, current, min_size) {
                Some(resized) => replace_rectangle(&mut frame.rectangles, id, origin, resized),
                None => Vec::new(),
            },
        }
    }

    pub fn preview(&self) -> Option<DragPreview> {
        let frame = self.frame.as_ref()?;
        let preview = match self.drag.as_ref()? {
            DragState::Create { start, current } => DragPreview {
                id: None,
                rectangle: Rectangle::spanning(*start, *current),
            },
            DragState::Move {
                id,
                origin,
                start,
                current,
            } => DragPreview {
                id: Some(id.clone()),
                rectangle: moved_within(
                    *origin,
                    current.x.saturating_sub(start.x),
                    current.y.saturating_sub(start.y),
                    frame.displayed,
                ),
            },
            DragState::Resize {
                id,
                corner,
                origin,
                current,
            } => DragPreview {
                id: Some(id.clone()),
                rectangle: Rectangle::spanning(origin.corner(corner.opposite()), *current),
            },
        };
        Some(preview)
    }

    pub fn select(&mut self, id: Option<&str>) -> LabelResult<Vec<SurfaceEvent>> {
        let Some(frame) = self.frame.as_mut() else {
            return Err(LabelError::FitUnavailable);
        };
        if let Some(id) = id {
            if !frame.rectangles.contains_key(id) {
                return Err(LabelError::RectangleNotFound { id: id.to_string() });
            }
        }
        if frame.selected.as_deref() == id {
            return Ok(Vec::new());
        }
        frame.selected = id.map(str::to_owned);
        Ok(vec![SurfaceEvent::SelectionChanged(frame.selected.clone())])
    }

    /// Moves the selection to the next id in key order, wrapping around.
    pub fn select_next(&mut self) -> Vec<SurfaceEvent> {
        let next = {
            let Some(frame) = self.frame.as_ref() else {
                return Vec::new();
            };
            let mut ids = frame.rectangles.keys();
            match frame.selected.as_deref() {
                Some(current) => frame
                    .rectangles
                    .keys()
                    .skip_while(|id| id.as_str() != current)
                    .nth(1)
                    .or_else(|| ids.next())
                    .cloned(),
                None => ids.next().cloned(),
            }
        };
        self.select(next.as_deref()).unwrap_or_default()
    }

    pub fn delete_selected(&mut self) -> Vec<SurfaceEvent> {
        self.drag = None;
        let Some(frame) = self.frame.as_mut() else {
            return Vec::new();
        };
        let Some(id) = frame.selected.take() else {
            return Vec::new();
        };
        if frame.rectangles.remove(&id).is_none() {
            return vec![SurfaceEvent::SelectionChanged(None)];
        }
        vec![
            SurfaceEvent::RectanglesEdited(frame.rectangles.clone()),
            SurfaceEvent::SelectionChanged(None),
        ]
    }
}

fn replace_rectangle(
    rectangles: &mut Rectangles,
    id: String,
    origin: Rectangle,
    next: Rectangle,
) -> Vec<SurfaceEvent> {
    if next == origin {
        return Vec::new();
    }
    rectangles.insert(id, next);
    vec![SurfaceEvent::RectanglesEdited(rectangles.clone())]
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn clamp_point(point: Point, bounds: Dimensions) -> Point {
    Point::new(
        point.x.clamp(0, to_i32(bounds.width)),
        point.y.clamp(0, to_i32(bounds.height)),
    )
}

fn selected_handle_at(
    frame: &SurfaceFrame,
    point: Point,
    tolerance: i32,
) -> Option<(String, Corner)> {
    let id = frame.selected.as_ref()?;
    let rectangle = frame.rectangles.get(id)?;
    rectangle
        .corners()
        .into_iter()
        .find(|(_, corner)| {
            (point.x - corner.x).abs() <= tolerance && (point.y - corner.y).abs() <= tolerance
        })
        .map(|(corner, _)| (id.clone(), corner))
}

/// The selected box wins when hit; otherwise the smallest box under the point,
/// so nested boxes stay reachable.
fn rectangle_at(frame: &SurfaceFrame, point: Point, padding: i32) -> Option<String> {
    if let Some(selected) = frame.selected.as_ref() {
        if frame
            .rectangles
            .get(selected)
            .is_some_and(|rectangle| rectangle.contains(point, padding))
        {
            return Some(selected.clone());
        }
    }
    frame
        .rectangles
        .iter()
        .filter(|(_, rectangle)| rectangle.contains(point, padding))
        .min_by_key(|(_, rectangle)| u64::from(rectangle.width) * u64::from(rectangle.height))
        .map(|(id, _)| id.clone())
}

fn moved_within(origin: Rectangle, delta_x: i32, delta_y: i32, bounds: Dimensions) -> Rectangle {
    let max_x = to_i32(bounds.width)
        .saturating_sub(to_i32(origin.width))
        .max(0);
    let max_y = to_i32(bounds.height)
        .saturating_sub(to_i32(origin.height))
        .max(0);
    Rectangle {
        x: origin.x.saturating_add(delta_x).clamp(0, max_x),
        y: origin.y.saturating_add(delta_y).clamp(0, max_y),
        ..origin
    }
}

fn resized_from_corner(
    origin: Rectangle,
    corner: Corner,
    point: Point,
    min_size: u32,
) -> Option<Rectangle> {
    let resized = Rectangle::spanning(origin.corner(corner.opposite()), point);
    (resized.width >= min_size && resized.height >= min_size).then_some(resized)
}
