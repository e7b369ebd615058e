use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use orb_core::frame::FrameBuffer;
use orb_core::traits::Source;

use crate::resize::resize_frame;

/// Source d'image statique, ramenée à la résolution de capture.
///
/// Always returns the same frame, so the mosaic is recomputed every tick from
/// an unchanging buffer.
///
/// # Example
/// ```no_run
/// use orb_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::new(Path::new("still.png"), (320, 240)).unwrap();
/// ```
pub struct ImageSource {
    frame: Arc<FrameBuffer>,
}

impl ImageSource {
    /// Load an image from disk and resize it to `capture` (width, height).
    ///
    /// # Errors
    /// Returns an error if the image cannot be loaded or resized.
    pub fn new(path: &Path, capture: (u32, u32)) -> Result<Self> {
        let frame = load_image(path)?;
        let frame = resize_frame(&frame, capture.0, capture.1)
            .with_context(|| format!("Redimensionnement impossible pour {}", path.display()))?;
        log::info!(
            "Image chargée : {} -> {}x{}",
            path.display(),
            frame.width,
            frame.height
        );
        Ok(Self {
            frame: Arc::new(frame),
        })
    }
}

impl Source for ImageSource {
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> {
        Some(Arc::clone(&self.frame))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// Charge une image disque en `FrameBuffer` RGBA, à sa taille d'origine.
///
/// # Errors
/// Returns an error if the image cannot be decoded.
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(FrameBuffer::from_raw(width, height, rgba.into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_resizes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        let img = image::RgbaImage::from_pixel(64, 48, image::Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();

        let mut source = ImageSource::new(&path, (32, 24)).unwrap();
        assert_eq!(source.native_size(), (32, 24));
        assert!(!source.is_live());
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.pixel(5, 5), (255, 0, 0, 255));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSource::new(&dir.path().join("nope.png"), (32, 24)).is_err());
    }
}
