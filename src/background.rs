use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BackgroundError;

// Static counter for generating unique IDs
static NEXT_BACKGROUND_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded background picture, owned by whoever loaded it.
///
/// The drawing surface only ever holds a `Weak` to this.
#[derive(Debug)]
pub struct BackgroundImage {
    id: u64,
    pixels: RgbaImage,
}

pub type BackgroundRef = Arc<BackgroundImage>;

impl BackgroundImage {
    pub fn new(pixels: RgbaImage) -> Self {
        let id = NEXT_BACKGROUND_ID.fetch_add(1, Ordering::SeqCst);
        Self { id, pixels }
    }

    pub fn new_ref(pixels: RgbaImage) -> BackgroundRef {
        Arc::new(Self::new(pixels))
    }

    /// Decode any format the `image` crate understands
    pub fn from_bytes(bytes: &[u8]) -> Result<BackgroundRef, BackgroundError> {
        let decoded = image::load_from_memory(bytes)?;
        log::debug!(
            "Decoded background image: {}x{}",
            decoded.width(),
            decoded.height()
        );
        Ok(Self::new_ref(decoded.to_rgba8()))
    }

    pub fn from_path(path: &Path) -> Result<BackgroundRef, BackgroundError> {
        let bytes = std::fs::read(path).map_err(|source| BackgroundError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading background from {}", path.display());
        Self::from_bytes(&bytes)
    }

    /// Process-unique id, stable for the lifetime of this image
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    #[test]
    fn test_decode_png_bytes() {
        let source = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let background = BackgroundImage::from_bytes(&bytes).unwrap();
        assert_eq!((background.width(), background.height()), (3, 2));
        assert_eq!(background.pixels().get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = BackgroundImage::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, BackgroundError::Decode(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BackgroundImage::from_path(Path::new("/nonexistent/background.png")).unwrap_err();
        assert!(matches!(err, BackgroundError::Io { .. }));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = BackgroundImage::new(RgbaImage::new(1, 1));
        let b = BackgroundImage::new(RgbaImage::new(1, 1));
        assert_ne!(a.id(), b.id());
    }
}
