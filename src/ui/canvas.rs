use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use gtk4::cairo;
use gtk4::gdk::prelude::GdkCairoContextExt;
use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::prelude::*;
use gtk4::DrawingArea;

use super::style::LAYOUT_TOKENS;
use crate::collapse::IdCollapser;
use crate::config::LabellerConfig;
use crate::error::{AppError, AppResult};
use crate::geometry::{Color, Dimensions, Point, Rectangle};
use crate::labeller::{ImageLabeller, LabellerView};
use crate::source::{load_status, ImageStatus};
use crate::state::AnnotationStore;
use crate::surface::{AnnotationSurface, BoxEditor, DragPreview, SurfaceEvent};

/// Header probe first, then pixel decode. A decode failure downgrades the
/// status to `Failed`.
fn open_image(path: &Path) -> (ImageStatus, Option<Pixbuf>) {
    let status = load_status(path);
    if status.native().is_none() {
        return (status, None);
    }
    match Pixbuf::from_file(path).map_err(AppError::from) {
        Ok(pixbuf) => (status, Some(pixbuf)),
        Err(err) => {
            tracing::warn!(%err, ?path, "image pixels could not be decoded");
            let message = err.to_string();
            (ImageStatus::Failed { message }, None)
        }
    }
}

/// Drawing area that shows one image with its boxes and edits them in place.
///
/// The widget owns the projection; stored rectangles stay in native pixels and
/// live in the shared store. Runtime state is held by the signal closures
/// attached to `area`.
pub struct LabellerWidget {
    area: DrawingArea,
}

struct LabellerRuntime {
    labeller: RefCell<ImageLabeller>,
    editor: RefCell<BoxEditor>,
    store: Rc<RefCell<AnnotationStore>>,
    pixbuf: Option<Pixbuf>,
    config: LabellerConfig,
    allocation: Cell<Dimensions>,
    drag_start: Cell<(f64, f64)>,
}

impl LabellerWidget {
    pub fn new(
        image_path: &Path,
        store: Rc<RefCell<AnnotationStore>>,
        config: LabellerConfig,
    ) -> Self {
        let area = DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.set_focusable(true);

        let mut labeller = ImageLabeller::new();
        labeller.set_image_status(ImageStatus::Loading);
        let (status, pixbuf) = open_image(image_path);
        labeller.set_image_status(status);

        let runtime = Rc::new(LabellerRuntime {
            labeller: RefCell::new(labeller),
            editor: RefCell::new(BoxEditor::new(config.editor_options())),
            store,
            pixbuf,
            config,
            allocation: Cell::new(Dimensions::new(0, 0)),
            drag_start: Cell::new((0.0, 0.0)),
        });

        connect_resize(&area, &runtime);
        connect_draw(&area, &runtime);
        connect_drag_gesture(&area, &runtime);
        connect_key_controller(&area, &runtime);

        Self { area }
    }

    pub fn widget(&self) -> &DrawingArea {
        &self.area
    }
}

impl LabellerRuntime {
    fn render(&self) -> LabellerView {
        let labeller = self.labeller.borrow();
        let store = self.store.borrow();
        labeller.render(store.rectangles(), store.selected())
    }

    fn refresh(&self) {
        if let LabellerView::Ready(frame) = self.render() {
            self.editor.borrow_mut().present(frame);
        }
    }

    fn on_resize(&self, allocation: Dimensions) {
        self.allocation.set(allocation);
        let container = padded_container(allocation, LAYOUT_TOKENS.canvas_padding);
        let fit = self.labeller.borrow_mut().on_container_resized(container);
        if fit.is_some() {
            self.refresh();
        }
    }

    fn dispatch(&self, events: Vec<SurfaceEvent>) {
        if events.is_empty() {
            return;
        }
        let Some(stamp) = self.editor.borrow().frame().map(|frame| frame.generation) else {
            return;
        };
        for event in events {
            if let Err(err) = self.forward(stamp, event) {
                tracing::warn!(%err, "surface event dropped");
            }
        }
        self.refresh();
    }

    fn forward(&self, stamp: u64, event: SurfaceEvent) -> AppResult<()> {
        let labeller = self.labeller.borrow();
        let mut store = self.store.borrow_mut();
        labeller.handle_event(stamp, event, &mut *store)?;
        Ok(())
    }

    fn image_origin(&self) -> (f64, f64) {
        self.labeller.borrow().fit().map_or((0.0, 0.0), |fit| {
            centered_origin(self.allocation.get(), fit.displayed)
        })
    }

    fn surface_point(&self, x: f64, y: f64) -> Point {
        to_surface_point(x, y, self.image_origin())
    }

    fn draw(&self, context: &cairo::Context, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        match self.render() {
            LabellerView::Ready(_) => self.draw_ready(context),
            LabellerView::LoadFailed { message } => {
                draw_message(context, &format!("Could not load image: {message}"));
            }
            LabellerView::Loading | LabellerView::AwaitingMeasurement => {
                draw_placeholder(context, width, height);
            }
            LabellerView::NoImage => draw_message(context, "No image"),
        }
    }

    fn draw_ready(&self, context: &cairo::Context) {
        let Some(fit) = self.labeller.borrow().fit() else {
            return;
        };
        let (origin_x, origin_y) = centered_origin(self.allocation.get(), fit.displayed);
        context.save().ok();
        context.translate(origin_x, origin_y);

        if let Some(pixbuf) = self.pixbuf.as_ref() {
            context.save().ok();
            context.scale(
                f64::from(fit.displayed.width) / f64::from(pixbuf.width().max(1)),
                f64::from(fit.displayed.height) / f64::from(pixbuf.height().max(1)),
            );
            context.set_source_pixbuf(pixbuf, 0.0, 0.0);
            context.paint().ok();
            context.restore().ok();
        }

        let editor = self.editor.borrow();
        if let Some(frame) = editor.frame() {
            let preview = editor.preview();
            let collapser = IdCollapser::new(self.config.min_prefix_len)
                .with_source(frame.rectangles.keys().cloned());
            for (id, rectangle) in &frame.rectangles {
                let rectangle = match preview.as_ref() {
                    Some(DragPreview {
                        id: Some(preview_id),
                        rectangle,
                    }) if preview_id == id => *rectangle,
                    _ => *rectangle,
                };
                let selected = frame.selected.as_deref() == Some(id.as_str());
                let color = if selected {
                    self.config.selected_color
                } else {
                    self.config.box_color
                };
                stroke_box(context, rectangle, color, self.config.stroke_width);
                draw_label(context, rectangle, &collapser.collapse(id), color);
                if selected {
                    draw_handles(context, rectangle, color);
                }
            }
            if let Some(DragPreview {
                id: None,
                rectangle,
            }) = preview
            {
                context.save().ok();
                context.set_dash(&[6.0, 4.0], 0.0);
                stroke_box(
                    context,
                    rectangle,
                    self.config.selected_color,
                    self.config.stroke_width,
                );
                context.restore().ok();
            }
        }
        context.restore().ok();
    }
}

fn connect_resize(area: &DrawingArea, runtime: &Rc<LabellerRuntime>) {
    let runtime = runtime.clone();
    area.connect_resize(move |area, width, height| {
        runtime.on_resize(Dimensions::new(non_negative(width), non_negative(height)));
        area.queue_draw();
    });
}

fn connect_draw(area: &DrawingArea, runtime: &Rc<LabellerRuntime>) {
    let runtime = runtime.clone();
    area.set_draw_func(move |_, context, width, height| {
        runtime.draw(context, width, height);
    });
}

fn connect_drag_gesture(area: &DrawingArea, runtime: &Rc<LabellerRuntime>) {
    let drag_gesture = gtk4::GestureDrag::new();
    drag_gesture.set_button(gtk4::gdk::BUTTON_PRIMARY);

    let begin_runtime = runtime.clone();
    let begin_area = area.downgrade();
    drag_gesture.connect_drag_begin(move |_, start_x, start_y| {
        begin_runtime.drag_start.set((start_x, start_y));
        let point = begin_runtime.surface_point(start_x, start_y);
        let events = begin_runtime.editor.borrow_mut().press(point);
        begin_runtime.dispatch(events);
        if let Some(area) = begin_area.upgrade() {
            area.grab_focus();
            area.queue_draw();
        }
    });

    let update_runtime = runtime.clone();
    let update_area = area.downgrade();
    drag_gesture.connect_drag_update(move |_, offset_x, offset_y| {
        let (start_x, start_y) = update_runtime.drag_start.get();
        let point = update_runtime.surface_point(start_x + offset_x, start_y + offset_y);
        update_runtime.editor.borrow_mut().drag_to(point);
        queue_redraw(&update_area);
    });

    let end_runtime = runtime.clone();
    let end_area = area.downgrade();
    drag_gesture.connect_drag_end(move |_, offset_x, offset_y| {
        let (start_x, start_y) = end_runtime.drag_start.get();
        let point = end_runtime.surface_point(start_x + offset_x, start_y + offset_y);
        let events = end_runtime.editor.borrow_mut().release(point);
        end_runtime.dispatch(events);
        queue_redraw(&end_area);
    });

    area.add_controller(drag_gesture);
}

fn connect_key_controller(area: &DrawingArea, runtime: &Rc<LabellerRuntime>) {
    let key_controller = gtk4::EventControllerKey::new();
    let runtime = runtime.clone();
    let key_area = area.downgrade();
    key_controller.connect_key_pressed(move |_, key, _, _| {
        let events = if matches!(key, gtk4::gdk::Key::Delete | gtk4::gdk::Key::BackSpace) {
            runtime.editor.borrow_mut().delete_selected()
        } else if key == gtk4::gdk::Key::Tab {
            runtime.editor.borrow_mut().select_next()
        } else if key == gtk4::gdk::Key::Escape {
            let mut editor = runtime.editor.borrow_mut();
            editor.cancel();
            editor.select(None).unwrap_or_default()
        } else {
            return gtk4::glib::Propagation::Proceed;
        };
        runtime.dispatch(events);
        queue_redraw(&key_area);
        gtk4::glib::Propagation::Stop
    });
    area.add_controller(key_controller);
}

fn queue_redraw(area: &gtk4::glib::WeakRef<DrawingArea>) {
    if let Some(area) = area.upgrade() {
        area.queue_draw();
    }
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn padded_container(allocation: Dimensions, padding: u32) -> Dimensions {
    let inset = padding.saturating_mul(2);
    Dimensions::new(
        allocation.width.saturating_sub(inset),
        allocation.height.saturating_sub(inset),
    )
}

/// Top-left of the displayed image when it is centered in `allocation`.
fn centered_origin(allocation: Dimensions, displayed: Dimensions) -> (f64, f64) {
    (
        (f64::from(allocation.width) - f64::from(displayed.width)).max(0.0) / 2.0,
        (f64::from(allocation.height) - f64::from(displayed.height)).max(0.0) / 2.0,
    )
}

fn to_surface_point(x: f64, y: f64, origin: (f64, f64)) -> Point {
    Point::new((x - origin.0).round() as i32, (y - origin.1).round() as i32)
}

fn set_source_color(context: &cairo::Context, color: Color) {
    let (r, g, b) = color.unit_rgb();
    context.set_source_rgb(r, g, b);
}

fn stroke_box(context: &cairo::Context, rectangle: Rectangle, color: Color, stroke_width: f64) {
    set_source_color(context, color);
    context.set_line_width(stroke_width);
    context.rectangle(
        f64::from(rectangle.x),
        f64::from(rectangle.y),
        f64::from(rectangle.width),
        f64::from(rectangle.height),
    );
    let _ = context.stroke();
}

fn draw_handles(context: &cairo::Context, rectangle: Rectangle, color: Color) {
    let size = LAYOUT_TOKENS.handle_size;
    set_source_color(context, color);
    for (_, corner) in rectangle.corners() {
        context.rectangle(
            f64::from(corner.x) - size / 2.0,
            f64::from(corner.y) - size / 2.0,
            size,
            size,
        );
    }
    let _ = context.fill();
}

fn draw_label(context: &cairo::Context, rectangle: Rectangle, label: &str, color: Color) {
    let padding = LAYOUT_TOKENS.label_padding;
    context.save().ok();
    context.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    context.set_font_size(LAYOUT_TOKENS.label_font_size);
    let text_width = context
        .text_extents(label)
        .map_or(0.0, |extents| extents.x_advance());
    let x = f64::from(rectangle.x);
    let y = (f64::from(rectangle.y) - LAYOUT_TOKENS.label_font_size - padding * 2.0).max(0.0);

    set_source_color(context, color);
    context.rectangle(
        x,
        y,
        text_width + padding * 2.0,
        LAYOUT_TOKENS.label_font_size + padding * 2.0,
    );
    let _ = context.fill();

    context.set_source_rgb(0.0, 0.0, 0.0);
    context.move_to(x + padding, y + padding + LAYOUT_TOKENS.label_font_size * 0.85);
    let _ = context.show_text(label);
    context.restore().ok();
}

fn draw_placeholder(context: &cairo::Context, width: i32, height: i32) {
    let padding = f64::from(LAYOUT_TOKENS.canvas_padding);
    context.save().ok();
    context.set_source_rgba(0.5, 0.5, 0.5, 0.25);
    context.rectangle(
        padding,
        padding,
        (f64::from(width) - padding * 2.0).max(0.0),
        (f64::from(height) - padding * 2.0).max(0.0),
    );
    let _ = context.fill();
    context.restore().ok();
}

fn draw_message(context: &cairo::Context, message: &str) {
    let padding = f64::from(LAYOUT_TOKENS.canvas_padding);
    context.save().ok();
    context.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    context.set_font_size(LAYOUT_TOKENS.message_font_size);
    context.set_source_rgb(0.85, 0.2, 0.2);
    context.move_to(padding, padding + LAYOUT_TOKENS.message_font_size);
    let _ = context.show_text(message);
    context.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_container_shrinks_both_axes_and_saturates() {
        assert_eq!(
            padded_container(Dimensions::new(432, 232), 16),
            Dimensions::new(400, 200)
        );
        assert_eq!(
            padded_container(Dimensions::new(20, 40), 16),
            Dimensions::new(0, 8)
        );
    }

    #[test]
    fn centered_origin_splits_leftover_space() {
        let origin = centered_origin(Dimensions::new(432, 432), Dimensions::new(400, 200));
        assert_eq!(origin, (16.0, 116.0));
    }

    #[test]
    fn centered_origin_never_goes_negative() {
        let origin = centered_origin(Dimensions::new(100, 100), Dimensions::new(120, 80));
        assert_eq!(origin, (0.0, 10.0));
    }

    #[test]
    fn surface_point_subtracts_origin_and_rounds() {
        assert_eq!(
            to_surface_point(56.6, 136.4, (16.0, 116.0)),
            Point::new(41, 20)
        );
    }

    #[test]
    fn negative_allocation_is_treated_as_empty() {
        assert_eq!(non_negative(-3), 0);
        assert_eq!(non_negative(42), 42);
    }

    #[test]
    fn missing_image_opens_as_failed_status_without_pixels() {
        let path = std::env::temp_dir().join("boxmark-missing-image-for-canvas.png");
        let (status, pixbuf) = open_image(&path);
        assert!(matches!(status, ImageStatus::Failed { .. }));
        assert!(pixbuf.is_none());
    }
}
