//! The boundary between native-space storage and the displayed-space surface.
//!
//! [`ScaledWindow`] is the only type that sees both spaces. It is rebuilt from
//! the current [`Fit`] on every render and never outlives a scale change.

use thiserror::Error;

use crate::fit::Fit;
use crate::geometry::{Dimensions, Rectangles, ScaleFactor};
use crate::surface::{SurfaceEvent, SurfaceFrame};
use crate::transform::scale_rectangles;

pub type LabelResult<T> = std::result::Result<T, LabelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("edit was made against projection {actual}, current projection is {expected}")]
    StaleProjection { expected: u64, actual: u64 },

    #[error("no container fit is available yet")]
    FitUnavailable,

    #[error("rectangle not found: {id}")]
    RectangleNotFound { id: String },
}

/// Receiver of native-space updates. Every rectangle update is a full
/// replacement mapping.
pub trait LabelOwner {
    fn on_rectangles_change(&mut self, rectangles: Rectangles);

    fn on_selection_change(&mut self, id: Option<String>);
}

/// Adapts a pair of closures to [`LabelOwner`].
pub struct OwnerCallbacks<R, S> {
    on_rectangles_change: R,
    on_selection_change: S,
}

impl<R, S> OwnerCallbacks<R, S>
where
    R: FnMut(Rectangles),
    S: FnMut(Option<String>),
{
    pub fn new(on_rectangles_change: R, on_selection_change: S) -> Self {
        Self {
            on_rectangles_change,
            on_selection_change,
        }
    }
}

impl<R, S> LabelOwner for OwnerCallbacks<R, S>
where
    R: FnMut(Rectangles),
    S: FnMut(Option<String>),
{
    fn on_rectangles_change(&mut self, rectangles: Rectangles) {
        (self.on_rectangles_change)(rectangles);
    }

    fn on_selection_change(&mut self, id: Option<String>) {
        (self.on_selection_change)(id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledWindow {
    fit: Fit,
    generation: u64,
}

impl ScaledWindow {
    pub const fn new(fit: Fit, generation: u64) -> Self {
        Self { fit, generation }
    }

    pub const fn fit(&self) -> Fit {
        self.fit
    }

    pub const fn displayed(&self) -> Dimensions {
        self.fit.displayed
    }

    pub const fn scale(&self) -> ScaleFactor {
        self.fit.scale
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn to_displayed(&self, native: &Rectangles) -> Rectangles {
        scale_rectangles(native, self.fit.scale)
    }

    pub fn to_native(&self, displayed: &Rectangles) -> Rectangles {
        scale_rectangles(displayed, self.fit.scale.reciprocal())
    }

    pub fn frame(&self, native: &Rectangles, selected: Option<&str>) -> SurfaceFrame {
        SurfaceFrame {
            displayed: self.fit.displayed,
            rectangles: self.to_displayed(native),
            selected: selected.map(str::to_owned),
            generation: self.generation,
        }
    }

    pub fn forward<O>(&self, event: SurfaceEvent, owner: &mut O)
    where
        O: LabelOwner + ?Sized,
    {
        match event {
            SurfaceEvent::RectanglesEdited(displayed) => {
                let native = self.to_native(&displayed);
                tracing::debug!(
                    count = native.len(),
                    scale = self.fit.scale.get(),
                    generation = self.generation,
                    "forwarding edited rectangles in native space"
                );
                owner.on_rectangles_change(native);
            }
            SurfaceEvent::SelectionChanged(id) => {
                tracing::debug!(selected = ?id, "forwarding selection change");
                owner.on_selection_change(id);
            }
        }
    }

    /// Like [`forward`](Self::forward), but refuses events produced against a
    /// different projection than this window's.
    pub fn forward_stamped<O>(
        &self,
        stamp: u64,
        event: SurfaceEvent,
        owner: &mut O,
    ) -> LabelResult<()>
    where
        O: LabelOwner + ?Sized,
    {
        if stamp != self.generation {
            tracing::warn!(
                expected = self.generation,
                actual = stamp,
                "dropping surface edit made against an outdated projection"
            );
            return Err(LabelError::StaleProjection {
                expected: self.generation,
                actual: stamp,
            });
        }
        self.forward(event, owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::compute_fit;
    use crate::geometry::Rectangle;

    #[derive(Default)]
    struct RecordingOwner {
        rectangles: Vec<Rectangles>,
        selections: Vec<Option<String>>,
    }

    impl LabelOwner for RecordingOwner {
        fn on_rectangles_change(&mut self, rectangles: Rectangles) {
            self.rectangles.push(rectangles);
        }

        fn on_selection_change(&mut self, id: Option<String>) {
            self.selections.push(id);
        }
    }

    fn window() -> ScaledWindow {
        let fit = compute_fit(Dimensions::new(1000, 500), Dimensions::new(400, 400))
            .expect("fit should exist");
        ScaledWindow::new(fit, 7)
    }

    fn single(id: &str, rectangle: Rectangle) -> Rectangles {
        let mut rectangles = Rectangles::new();
        rectangles.insert(id.to_string(), rectangle);
        rectangles
    }

    #[test]
    fn frame_projects_native_rectangles_into_displayed_space() {
        let native = single("box", Rectangle::new(100, 50, 200, 100));
        let frame = window().frame(&native, Some("box"));

        assert_eq!(frame.displayed, Dimensions::new(400, 200));
        assert_eq!(frame.rectangles["box"], Rectangle::new(40, 20, 80, 40));
        assert_eq!(frame.selected.as_deref(), Some("box"));
        assert_eq!(frame.generation, 7);
    }

    #[test]
    fn forward_converts_edits_back_to_native_space() {
        let mut owner = RecordingOwner::default();
        let edited = single("box", Rectangle::new(60, 20, 80, 40));

        window().forward(SurfaceEvent::RectanglesEdited(edited), &mut owner);

        assert_eq!(
            owner.rectangles,
            vec![single("box", Rectangle::new(150, 50, 200, 100))]
        );
        assert!(owner.selections.is_empty());
    }

    #[test]
    fn forward_passes_selection_through_unchanged() {
        let mut owner = RecordingOwner::default();
        let window = window();
        window.forward(
            SurfaceEvent::SelectionChanged(Some("box".to_string())),
            &mut owner,
        );
        window.forward(SurfaceEvent::SelectionChanged(None), &mut owner);

        assert_eq!(owner.selections, vec![Some("box".to_string()), None]);
        assert!(owner.rectangles.is_empty());
    }

    #[test]
    fn forward_stamped_rejects_outdated_projection() {
        let mut owner = RecordingOwner::default();
        let edited = single("box", Rectangle::new(60, 20, 80, 40));

        let err = window()
            .forward_stamped(6, SurfaceEvent::RectanglesEdited(edited), &mut owner)
            .expect_err("stale stamp should be refused");

        assert_eq!(
            err,
            LabelError::StaleProjection {
                expected: 7,
                actual: 6
            }
        );
        assert!(owner.rectangles.is_empty());
    }

    #[test]
    fn owner_callbacks_invoke_closures() {
        let mut seen_rectangles = 0;
        let mut seen_selection = None;
        {
            let mut owner = OwnerCallbacks::new(
                |rectangles: Rectangles| seen_rectangles = rectangles.len(),
                |id: Option<String>| seen_selection = id,
            );
            let window = window();
            window.forward(
                SurfaceEvent::RectanglesEdited(single("a", Rectangle::new(0, 0, 4, 4))),
                &mut owner,
            );
            window.forward(
                SurfaceEvent::SelectionChanged(Some("a".to_string())),
                &mut owner,
            );
        }
        assert_eq!(seen_rectangles, 1);
        assert_eq!(seen_selection.as_deref(), Some("a"));
    }
}
