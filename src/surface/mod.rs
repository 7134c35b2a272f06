//! Displayed-space drawing surface contract.
//!
//! A surface knows nothing about scaling. It is handed a [`SurfaceFrame`] and
//! reports completed gestures as [`SurfaceEvent`]s carrying whole mappings.

mod editor;

pub use editor::{BoxEditor, DragPreview, EditorOptions};

use crate::geometry::{Dimensions, Rectangles};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceFrame {
    pub displayed: Dimensions,
    pub rectangles: Rectangles,
    pub selected: Option<String>,
    /// Fit generation the rectangles were projected with.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    RectanglesEdited(Rectangles),
    SelectionChanged(Option<String>),
}

pub trait AnnotationSurface {
    fn present(&mut self, frame: SurfaceFrame);
}
