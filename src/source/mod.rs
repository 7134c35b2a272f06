//! Image loading collaborator: native size plus load status.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::Dimensions;

pub type SourceResult<T> = std::result::Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read image {path}: {source}")]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} has no pixels")]
    EmptyImage { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageStatus {
    /// Nothing to show yet.
    #[default]
    Empty,
    Loading,
    Loaded(Dimensions),
    Failed { message: String },
}

impl ImageStatus {
    pub fn from_result(result: SourceResult<Dimensions>) -> Self {
        match result {
            Ok(dimensions) => Self::Loaded(dimensions),
            Err(err) => Self::Failed {
                message: err.to_string(),
            },
        }
    }

    pub const fn native(&self) -> Option<Dimensions> {
        match self {
            Self::Loaded(dimensions) => Some(*dimensions),
            _ => None,
        }
    }
}

/// Reads the native pixel size from the image header without decoding pixels.
pub fn probe_image(path: &Path) -> SourceResult<Dimensions> {
    let (width, height) =
        image::image_dimensions(path).map_err(|source| SourceError::ImageUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let dimensions = Dimensions::new(width, height);
    if !dimensions.has_area() {
        return Err(SourceError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(?path, width, height, "probed image dimensions");
    Ok(dimensions)
}

pub fn load_status(path: &Path) -> ImageStatus {
    let status = ImageStatus::from_result(probe_image(path));
    if let ImageStatus::Failed { message } = &status {
        tracing::warn!(?path, %message, "image failed to load");
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_image_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("boxmark-{}-{name}", std::process::id()))
    }

    #[test]
    fn probe_reads_native_size_from_png_header() {
        let path = temp_image_path("probe.png");
        image::RgbImage::new(64, 32)
            .save(&path)
            .expect("test image should save");

        let dimensions = probe_image(&path).expect("probe should succeed");
        assert_eq!(dimensions, Dimensions::new(64, 32));
        assert_eq!(load_status(&path), ImageStatus::Loaded(dimensions));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_failed_status() {
        let path = temp_image_path("missing.png");
        let err = probe_image(&path).expect_err("missing file should fail");
        assert!(matches!(err, SourceError::ImageUnreadable { .. }));

        let status = load_status(&path);
        assert!(matches!(status, ImageStatus::Failed { .. }));
        assert_eq!(status.native(), None);
    }
}
