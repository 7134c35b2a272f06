//! Widget-level render contract: image status, container fit and the owner's
//! rectangles combined into one view.

use crate::adapter::{LabelError, LabelOwner, LabelResult, ScaledWindow};
use crate::fit::{ContainerFitResolver, Fit};
use crate::geometry::{Dimensions, Rectangles};
use crate::source::ImageStatus;
use crate::surface::{SurfaceEvent, SurfaceFrame};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabellerView {
    /// No image was supplied.
    NoImage,
    Loading,
    LoadFailed { message: String },
    /// Image is loaded but the container has not been measured with area yet.
    AwaitingMeasurement,
    Ready(SurfaceFrame),
}

impl LabellerView {
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageLabeller {
    status: ImageStatus,
    resolver: ContainerFitResolver,
}

impl ImageLabeller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &ImageStatus {
        &self.status
    }

    /// Any status change moves the fit generation forward, so frames rendered
    /// for a previous image can never be mistaken for current ones.
    pub fn set_image_status(&mut self, status: ImageStatus) {
        tracing::debug!(?status, "image status changed");
        match status.native() {
            Some(native) => {
                self.resolver.set_native(native);
            }
            None => self.resolver.clear_native(),
        }
        self.status = status;
    }

    /// Applies a container measurement. The container is tracked even before
    /// an image is loaded so the first fit is available immediately.
    pub fn on_container_resized(&mut self, container: Dimensions) -> Option<Fit> {
        self.resolver.observe(container)
    }

    pub fn fit(&self) -> Option<Fit> {
        self.resolver.fit()
    }

    pub fn window(&self) -> Option<ScaledWindow> {
        let fit = self.resolver.fit()?;
        Some(ScaledWindow::new(fit, self.resolver.generation()))
    }

    pub fn render(&self, rectangles: &Rectangles, selected: Option<&str>) -> LabellerView {
        match &self.status {
            ImageStatus::Empty => LabellerView::NoImage,
            ImageStatus::Loading => LabellerView::Loading,
            ImageStatus::Failed { message } => LabellerView::LoadFailed {
                message: message.clone(),
            },
            ImageStatus::Loaded(_) => match self.window() {
                Some(window) => LabellerView::Ready(window.frame(rectangles, selected)),
                None => LabellerView::AwaitingMeasurement,
            },
        }
    }

    /// Routes a surface event to the owner through the current projection.
    /// `stamp` is the generation of the frame the event was produced against.
    pub fn handle_event<O>(
        &self,
        stamp: u64,
        event: SurfaceEvent,
        owner: &mut O,
    ) -> LabelResult<()>
    where
        O: LabelOwner + ?Sized,
    {
        match (self.window(), event) {
            (Some(window), event) => window.forward_stamped(stamp, event, owner),
            (None, SurfaceEvent::SelectionChanged(id)) => {
                owner.on_selection_change(id);
                Ok(())
            }
            (None, SurfaceEvent::RectanglesEdited(_)) => Err(LabelError::FitUnavailable),
        }
    }
}
