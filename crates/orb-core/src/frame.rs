use crate::error::CoreError;

/// Buffer de pixels de capture. Lu en lecture seule par l'échantillonneur.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use orb_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir transparent aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use orb_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(320, 240);
    /// assert_eq!(fb.data.len(), 320 * 240 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Wraps an existing RGBA byte vector.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] for a zero-sized frame and
    /// [`CoreError::BufferSize`] when `data` does not hold exactly
    /// `width * height * 4` bytes.
    ///
    /// # Example
    /// ```
    /// use orb_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    /// assert_eq!(fb.pixel(1, 0), (0, 0, 255, 255));
    /// assert!(FrameBuffer::from_raw(2, 2, vec![0; 4]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// `true` quand le buffer ne contient aucune image exploitable
    /// (dimension nulle ou données plus courtes que `width × height × 4`).
    ///
    /// # Example
    /// ```
    /// use orb_core::frame::FrameBuffer;
    /// assert!(FrameBuffer::new(0, 240).is_empty());
    /// assert!(!FrameBuffer::new(4, 4).is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0
            || self.height == 0
            || self.data.len() < self.width as usize * self.height as usize * 4
    }

    /// Accès au pixel (x, y) → (r, g, b, a). Hors limites → (0, 0, 0, 0).
    ///
    /// # Example
    /// ```
    /// use orb_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    /// assert_eq!(fb.pixel(50, 50), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        if x >= self.width || y >= self.height {
            return (0, 0, 0, 0);
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        match self.data.get(idx..idx + 4) {
            Some(px) => (px[0], px[1], px[2], px[3]),
            None => (0, 0, 0, 0),
        }
    }

    /// Écrit un pixel opaque. Ignoré hors limites.
    ///
    /// # Example
    /// ```
    /// use orb_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(2, 2);
    /// fb.set_rgb(1, 1, 255, 0, 0);
    /// assert_eq!(fb.pixel(1, 1), (255, 0, 0, 255));
    /// ```
    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.data.get_mut(idx..idx + 4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Remplit tout le buffer d'une couleur opaque.
    pub fn fill_rgb(&mut self, r: u8, g: u8, b: u8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_buffer_is_empty() {
        let fb = FrameBuffer {
            data: vec![0; 12],
            width: 2,
            height: 2,
        };
        assert!(fb.is_empty());
        assert_eq!(fb.pixel(1, 1), (0, 0, 0, 0));
    }

    #[test]
    fn from_raw_rejects_zero_dimensions() {
        assert!(matches!(
            FrameBuffer::from_raw(0, 3, Vec::new()),
            Err(CoreError::InvalidDimensions { width: 0, height: 3 })
        ));
    }

    #[test]
    fn fill_then_read() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.fill_rgb(10, 20, 30);
        assert_eq!(fb.pixel(2, 1), (10, 20, 30, 255));
    }
}
