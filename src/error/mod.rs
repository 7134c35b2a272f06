use crate::adapter::LabelError;
use crate::source::SourceError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("failed to decode image pixels: {0}")]
    Pixbuf(#[from] gtk4::glib::Error),

    #[error("usage: boxmark <image>")]
    MissingImageArgument,
}
