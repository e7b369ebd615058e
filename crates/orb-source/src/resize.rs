use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use orb_core::frame::FrameBuffer;

/// Resizer RGBA réutilisable wrappant fast_image_resize.
///
/// Box filtering: used both to bring still images down to the capture size and
/// to shrink the 1920×1080 canvas to terminal resolution, where averaging
/// every covered pixel matters more than sharpness.
///
/// # Example
/// ```
/// use orb_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Copie de la source (l'API fast_image_resize exige `&mut` sur la source).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if either buffer is inconsistent with its dimensions.
    ///
    /// # Example
    /// ```
    /// use orb_source::resize::Resizer;
    /// use orb_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let mut src = FrameBuffer::new(100, 100);
    /// src.fill_rgb(0, 255, 0);
    /// let mut dst = FrameBuffer::new(50, 50);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// assert_eq!(dst.pixel(10, 10), (0, 255, 0, 255));
    /// ```
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
        let (dw, dh) = (dst.width, dst.height);
        self.resize_rgba(&src.data, src.width, src.height, &mut dst.data, dw, dh)
    }

    /// Resize a raw RGBA byte slice into another one.
    ///
    /// # Errors
    /// Returns an error if a slice length does not match its dimensions.
    pub fn resize_rgba(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        dst: &mut [u8],
        dst_w: u32,
        dst_h: u32,
    ) -> Result<()> {
        if src_w == dst_w && src_h == dst_h {
            anyhow::ensure!(src.len() == dst.len(), "Buffers de tailles différentes");
            dst.copy_from_slice(src);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(src);

        let src_image = Image::from_slice_u8(src_w, src_h, &mut self.src_buf, PixelType::U8x4)
            .context("Invalid source dimensions")?;
        let mut dst_image = Image::from_slice_u8(dst_w, dst_h, dst, PixelType::U8x4)
            .context("Invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;
        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for one-shot usage. DO NOT use in hot path.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use orb_source::resize::resize_frame;
/// use orb_core::frame::FrameBuffer;
/// let src = FrameBuffer::new(640, 480);
/// let dst = resize_frame(&src, 320, 240).unwrap();
/// assert_eq!(dst.width, 320);
/// ```
pub fn resize_frame(src: &FrameBuffer, width: u32, height: u32) -> Result<FrameBuffer> {
    let mut dst = FrameBuffer::new(width, height);
    Resizer::new().resize_into(src, &mut dst)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_is_a_copy() {
        let mut src = FrameBuffer::new(3, 3);
        src.set_rgb(1, 2, 9, 8, 7);
        let out = resize_frame(&src, 3, 3).unwrap();
        assert_eq!(out.data, src.data);
    }

    #[test]
    fn mismatched_slice_is_rejected() {
        let mut r = Resizer::new();
        let mut dst = vec![0u8; 16];
        assert!(r.resize_rgba(&[0u8; 8], 2, 2, &mut dst, 2, 2).is_err());
    }
}
