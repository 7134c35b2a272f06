pub mod adapter;
pub mod collapse;
mod config;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod labeller;
pub mod logging;
pub mod source;
pub mod state;
pub mod surface;
pub mod transform;
pub mod ui;

use std::path::PathBuf;

pub use adapter::{LabelError, LabelOwner, LabelResult, OwnerCallbacks, ScaledWindow};
pub use collapse::{collapse_id, expand_prefix, IdCollapser};
pub use config::{load_labeller_config, LabellerConfig};
pub use error::{AppError, AppResult};
pub use fit::{compute_fit, ContainerFitResolver, Fit};
pub use labeller::{ImageLabeller, LabellerView};
pub use transform::{project_rectangles, scale_rectangle, scale_rectangles};

/// Entrypoint used by the CLI binary: `boxmark <image>`.
pub fn run() -> AppResult<()> {
    logging::init();

    let image_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(AppError::MissingImageArgument)?;
    let config = load_labeller_config();
    tracing::info!(path = ?image_path, "starting boxmark");

    let exit_code = ui::run_labeller_window(image_path, config);
    tracing::info!(?exit_code, "labeller window closed");
    Ok(())
}
