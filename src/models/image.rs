use crate::error::{ColorGenError, Result};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

pub const DOWNLOAD_FILE_NAME: &str = "coloring_image.png";

/// A decoded image returned by the generation service.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
    pub source_url: String,
}

impl GeneratedImage {
    pub fn from_bytes(bytes: &[u8], source_url: impl Into<String>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ColorGenError::ImageError("image data is empty".into()));
        }

        let format = detect_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;

        Ok(Self {
            image,
            format,
            source_url: source_url.into(),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Re-encodes the raster as PNG for download.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

pub fn too_large(size: usize, max: usize) -> ColorGenError {
    ColorGenError::ImageError(format!(
        "image data is too large: {} bytes (max: {} bytes)",
        size, max
    ))
}

/// Sniffs the format from magic bytes; the fetch response's content type is not trusted.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),
        _ => Err(ColorGenError::ImageError("unsupported image format".into())),
    }
}
