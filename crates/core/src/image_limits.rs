//! Upload limits for token images

use crate::constants::{MAX_IMAGE_BYTES, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH};
use crate::error::ValidationError;
use image::ImageReader;
use std::io::Cursor;

/// Pixel size of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Size and pixel limits an image must meet before it is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConstraints {
    pub max_bytes: usize,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ImageConstraints {
    fn default() -> Self {
        Self {
            max_bytes: MAX_IMAGE_BYTES,
            max_width: MAX_IMAGE_WIDTH,
            max_height: MAX_IMAGE_HEIGHT,
        }
    }
}

impl ImageConstraints {
    /// Check byte size first, then decode the header for dimensions
    pub fn check(&self, bytes: &[u8]) -> Result<ImageDimensions, ValidationError> {
        if bytes.len() > self.max_bytes {
            return Err(ValidationError::ImageTooLarge {
                size: bytes.len(),
                limit_mb: self.max_bytes / (1024 * 1024),
            });
        }

        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|_| ValidationError::ImageUnreadable)?
            .into_dimensions()
            .map_err(|_| ValidationError::ImageUnreadable)?;

        if width > self.max_width || height > self.max_height {
            return Err(ValidationError::ImageDimensions {
                width,
                height,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }

        Ok(ImageDimensions { width, height })
    }
}
