//! GTK binding: one window hosting the labeller canvas.

mod canvas;
pub mod style;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{gio, Application, ApplicationWindow};

pub use canvas::LabellerWidget;
pub use style::{StyleTokens, LAYOUT_TOKENS};

use crate::config::LabellerConfig;
use crate::state::AnnotationStore;

const APP_ID: &str = "io.github.boxmark.Labeller";

pub fn run_labeller_window(image_path: PathBuf, config: LabellerConfig) -> gtk4::glib::ExitCode {
    let application = Application::new(Some(APP_ID), gio::ApplicationFlags::NON_UNIQUE);
    application.connect_activate(move |app| {
        let store = Rc::new(RefCell::new(AnnotationStore::new()));
        let widget = LabellerWidget::new(&image_path, store, config.clone());
        let window = build_window(app, &window_title(&image_path), LAYOUT_TOKENS);
        window.set_child(Some(widget.widget()));
        window.present();
        widget.widget().grab_focus();
    });

    // GTK would treat the image path as a file to open; only argv[0] is forwarded.
    let gtk_args = std::env::args().take(1).collect::<Vec<_>>();
    application.run_with_args(&gtk_args)
}

fn build_window(app: &Application, title: &str, tokens: StyleTokens) -> ApplicationWindow {
    let window = ApplicationWindow::new(app);
    window.set_title(Some(title));
    window.set_default_size(tokens.window_default_width, tokens.window_default_height);
    window.set_size_request(tokens.window_min_width, tokens.window_min_height);
    window.set_resizable(true);
    window
}

fn window_title(image_path: &std::path::Path) -> String {
    match image_path.file_name() {
        Some(name) => format!("boxmark - {}", name.to_string_lossy()),
        None => "boxmark".to_string(),
    }
}
