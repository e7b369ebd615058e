use std::sync::Arc;

use orb_core::color::hsl_to_rgb;
use orb_core::frame::FrameBuffer;
use orb_core::traits::Source;
use rayon::prelude::*;

/// Taille du pool de frames recyclées.
const POOL_SIZE: usize = 4;

/// Mire animée pour tourner sans caméra : bandes de teinte qui défilent,
/// assombries en haut, avec une tache blanche qui parcourt l'image.
///
/// The white spot and the dark rows exercise the brightness filter; the hue
/// bands give the tolerance filter many distinct buckets.
///
/// # Example
/// ```
/// use orb_core::traits::Source;
/// use orb_source::pattern::PatternSource;
/// let mut src = PatternSource::new(32, 24);
/// let frame = src.next_frame().unwrap();
/// assert_eq!(frame.width, 32);
/// ```
pub struct PatternSource {
    width: u32,
    height: u32,
    pool: Vec<Arc<FrameBuffer>>,
    frame_count: u64,
}

impl PatternSource {
    /// Create a generator for frames of `width × height`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let pool = (0..POOL_SIZE)
            .map(|_| Arc::new(FrameBuffer::new(width, height)))
            .collect();
        Self {
            width,
            height,
            pool,
            frame_count: 0,
        }
    }
}

impl Source for PatternSource {
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> {
        let free_idx = self
            .pool
            .iter()
            .position(|a| Arc::strong_count(a) == 1)
            .unwrap_or(0);
        // pool saturé : on saute la frame
        let fb = Arc::get_mut(&mut self.pool[free_idx])?;

        let t = self.frame_count as f32 / 30.0;
        let w = self.width as f32;
        let h = self.height as f32;
        let spot_x = (0.5 + 0.35 * (t * 0.7).cos()) * w;
        let spot_y = (0.5 + 0.35 * (t * 1.1).sin()) * h;
        let spot_r2 = (h * 0.12).powi(2);
        let row_bytes = self.width as usize * 4;

        if row_bytes > 0 {
            fb.data
                .par_chunks_exact_mut(row_bytes)
                .enumerate()
                .for_each(|(y, row)| {
                    let fy = y as f32;
                    let lightness = 15.0 + 45.0 * fy / h.max(1.0);
                    for (x, px) in row.chunks_exact_mut(4).enumerate() {
                        let fx = x as f32;
                        let (r, g, b) = if (fx - spot_x).powi(2) + (fy - spot_y).powi(2) < spot_r2 {
                            (255, 255, 255)
                        } else {
                            hsl_to_rgb(fx / w * 360.0 + t * 40.0, 80.0, lightness)
                        };
                        px.copy_from_slice(&[r, g, b, 255]);
                    }
                });
        }

        self.frame_count += 1;
        Some(Arc::clone(&self.pool[free_idx]))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_live(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_opaque_and_animated() {
        let mut src = PatternSource::new(40, 30);
        let a = src.next_frame().unwrap();
        let first = a.data.clone();
        assert!(a.data.chunks_exact(4).all(|px| px[3] == 255));
        drop(a);
        for _ in 0..10 {
            src.next_frame();
        }
        let b = src.next_frame().unwrap();
        assert_ne!(first, b.data);
    }

    #[test]
    fn held_frames_are_not_overwritten() {
        let mut src = PatternSource::new(8, 8);
        let held = src.next_frame().unwrap();
        let snapshot = held.data.clone();
        for _ in 0..3 {
            src.next_frame();
        }
        assert_eq!(held.data, snapshot);
    }
}
