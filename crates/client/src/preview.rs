//! Image selection and preview checks

use coinforge_core::{ImageConstraints, ImageDimensions, ImageUpload, LaunchResult, ValidationError};
use std::path::Path;

/// An image that passed the upload constraints
#[derive(Debug, Clone)]
pub struct ImagePreview {
    pub upload: ImageUpload,
    pub dimensions: ImageDimensions,
}

/// Check a selected image against the constraints before it is accepted
pub fn preview_image(
    upload: ImageUpload,
    constraints: &ImageConstraints,
) -> Result<ImagePreview, ValidationError> {
    let dimensions = constraints.check(&upload.bytes)?;
    Ok(ImagePreview { upload, dimensions })
}

/// Read an image file from disk, guessing the content type from its extension
pub fn read_image_file(path: &Path) -> LaunchResult<ImageUpload> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let upload = ImageUpload::new(file_name, bytes);
    Ok(match content_type_for(path) {
        Some(content_type) => upload.with_content_type(content_type),
        None => upload,
    })
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
