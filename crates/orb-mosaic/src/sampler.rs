use orb_core::color::{Hsl, lerp, map_range, rgb_to_hsl};
use orb_core::config::Params;
use orb_core::draw::CanvasSize;
use orb_core::frame::FrameBuffer;

use crate::bucket::{BucketCounts, BucketKey};

/// Échantillons plus clairs que ce seuil sont écartés (quasi-blancs).
pub const MAX_LIGHTNESS: u8 = 85;
/// Échantillons moins saturés que ce seuil sont écartés (quasi-gris).
pub const MIN_SATURATION: u8 = 5;
/// Cible de saturation quand `light` vaut 1.
pub const WASHED_SATURATION: f32 = 20.0;
/// Cible de luminosité quand `light` vaut 1.
pub const WASHED_LIGHTNESS: f32 = 95.0;

/// Échantillon retenu, prêt à être rendu en pixel volumétrique.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetainedSample {
    /// Hue of the source pixel, unchanged.
    pub h: u16,
    /// Saturation blended toward 20 by `light`.
    pub s: f32,
    /// Lightness blended toward 95 by `light`.
    pub l: f32,
    /// Screen-space x (horizontally mirrored).
    pub x: f32,
    /// Screen-space y.
    pub y: f32,
    /// Tile size (grid stride) the sample was taken with.
    pub tile: u32,
    /// Column of the sampled pixel in the capture frame.
    pub grid_x: u32,
    /// Row of the sampled pixel in the capture frame.
    pub grid_y: u32,
}

/// Compteurs d'une passe d'échantillonnage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Grid cells read from the frame.
    pub cells_visited: u32,
    /// Samples emitted.
    pub retained: u32,
    /// Samples dropped as near-white or near-gray.
    pub filtered_out: u32,
    /// Samples dropped because their bucket was over tolerance.
    pub over_tolerance: u32,
}

/// Une passe d'échantillonnage sur une frame : itérateur paresseux de [`RetainedSample`].
///
/// Walks the frame row by row with stride `params.detail`, starting at (0, 0).
/// Each pass owns a fresh [`BucketCounts`]; nothing carries over to the next
/// frame. An empty frame yields nothing.
///
/// # Example
/// ```
/// use orb_core::config::Params;
/// use orb_core::draw::CanvasSize;
/// use orb_core::frame::FrameBuffer;
/// use orb_mosaic::sampler::SamplePass;
///
/// let mut frame = FrameBuffer::new(4, 4);
/// frame.fill_rgb(255, 0, 0);
/// let params = Params { light: 0.0, tolerance: 2, detail: 2, scale: 5.0 };
/// let samples: Vec<_> = SamplePass::new(&frame, params, CanvasSize::new(40, 40)).collect();
/// // 4 cellules rouges, même classe : seules les 2 premières passent
/// assert_eq!(samples.len(), 2);
/// ```
pub struct SamplePass<'a> {
    frame: &'a FrameBuffer,
    params: Params,
    canvas: CanvasSize,
    stride: u32,
    x: u32,
    y: u32,
    counts: BucketCounts,
    stats: PassStats,
}

impl<'a> SamplePass<'a> {
    /// Start a pass over `frame` with a snapshot of the parameters.
    #[must_use]
    pub fn new(frame: &'a FrameBuffer, params: Params, canvas: CanvasSize) -> Self {
        let stride = params.detail.max(1);
        // buffer vide ou tronqué : la passe n'émet rien
        let y = if frame.is_empty() { frame.height } else { 0 };
        Self {
            frame,
            params,
            canvas,
            stride,
            x: 0,
            y,
            counts: BucketCounts::default(),
            stats: PassStats::default(),
        }
    }

    /// Statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Bucket counts accumulated so far.
    #[must_use]
    pub fn counts(&self) -> &BucketCounts {
        &self.counts
    }

    /// Next grid cell in row-major order, or `None` past the last row.
    fn advance(&mut self) -> Option<(u32, u32)> {
        if self.y >= self.frame.height {
            return None;
        }
        let cell = (self.x, self.y);
        self.x = self.x.saturating_add(self.stride);
        if self.x >= self.frame.width {
            self.x = 0;
            self.y = self.y.saturating_add(self.stride);
        }
        Some(cell)
    }

    fn retain(&self, c: Hsl, gx: u32, gy: u32) -> RetainedSample {
        let fw = self.frame.width as f32;
        let fh = self.frame.height as f32;
        let cw = self.canvas.width as f32;
        let ch = self.canvas.height as f32;
        RetainedSample {
            h: c.h,
            s: lerp(f32::from(c.s), WASHED_SATURATION, self.params.light),
            l: lerp(f32::from(c.l), WASHED_LIGHTNESS, self.params.light),
            // miroir horizontal : la caméra se comporte comme un miroir
            x: map_range(gx as f32, 0.0, fw, cw, 0.0),
            y: map_range(gy as f32, 0.0, fh, 0.0, ch),
            tile: self.params.detail,
            grid_x: gx,
            grid_y: gy,
        }
    }
}

impl Iterator for SamplePass<'_> {
    type Item = RetainedSample;

    fn next(&mut self) -> Option<RetainedSample> {
        while let Some((gx, gy)) = self.advance() {
            self.stats.cells_visited += 1;
            let (r, g, b, _) = self.frame.pixel(gx, gy);
            let c = rgb_to_hsl(r, g, b);

            if c.l > MAX_LIGHTNESS || c.s < MIN_SATURATION {
                self.stats.filtered_out += 1;
                continue;
            }

            if self.counts.bump(BucketKey::quantize(c)) > self.params.tolerance {
                self.stats.over_tolerance += 1;
                continue;
            }

            self.stats.retained += 1;
            return Some(self.retain(c, gx, gy));
        }
        None
    }
}

/// Nombre de cellules de grille visitées pour une frame `width × height` et un pas donné.
///
/// # Example
/// ```
/// use orb_mosaic::sampler::grid_cells;
/// assert_eq!(grid_cells(320, 240, 3), 107 * 80);
/// assert_eq!(grid_cells(0, 240, 3), 0);
/// ```
#[must_use]
pub fn grid_cells(width: u32, height: u32, stride: u32) -> u32 {
    let stride = stride.max(1);
    width.div_ceil(stride) * height.div_ceil(stride)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(light: f32, tolerance: u32, detail: u32) -> Params {
        Params {
            light,
            tolerance,
            detail,
            scale: 5.0,
        }
    }

    #[test]
    fn empty_frame_emits_nothing() {
        let frame = FrameBuffer::new(0, 0);
        let mut pass = SamplePass::new(&frame, Params::default(), CanvasSize::default());
        assert!(pass.next().is_none());
        assert_eq!(pass.stats().cells_visited, 0);
    }

    #[test]
    fn truncated_frame_emits_nothing() {
        let frame = FrameBuffer {
            data: vec![255, 0, 0, 255],
            width: 4,
            height: 4,
        };
        assert_eq!(
            SamplePass::new(&frame, Params::default(), CanvasSize::default()).count(),
            0
        );
    }

    #[test]
    fn white_and_gray_are_filtered() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.set_rgb(0, 0, 255, 255, 255);
        frame.set_rgb(1, 0, 128, 128, 128);
        let mut pass = SamplePass::new(&frame, params(0.0, 50, 1), CanvasSize::default());
        assert!(pass.next().is_none());
        assert_eq!(pass.stats().filtered_out, 2);
    }

    #[test]
    fn tolerance_gates_nth_sample() {
        let mut frame = FrameBuffer::new(10, 1);
        frame.fill_rgb(0, 0, 255);
        let mut pass = SamplePass::new(&frame, params(0.0, 3, 1), CanvasSize::default());
        let retained: Vec<_> = pass.by_ref().collect();
        assert_eq!(retained.len(), 3);
        assert_eq!(
            retained.iter().map(|s| s.grid_x).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        let stats = pass.stats();
        assert_eq!(stats.over_tolerance, 7);
        assert_eq!(pass.counts().get(BucketKey { h: 240, s: 100, l: 50 }), 10);
    }

    #[test]
    fn light_blends_toward_washed_out() {
        let mut frame = FrameBuffer::new(1, 1);
        frame.set_rgb(0, 0, 0, 255, 0);
        let s = SamplePass::new(&frame, params(1.0, 10, 2), CanvasSize::default())
            .next()
            .unwrap();
        assert_eq!(s.h, 120);
        assert!((s.s - WASHED_SATURATION).abs() < 1e-4);
        assert!((s.l - WASHED_LIGHTNESS).abs() < 1e-4);

        let s = SamplePass::new(&frame, params(0.5, 10, 2), CanvasSize::default())
            .next()
            .unwrap();
        assert!((s.s - 60.0).abs() < 1e-4);
        assert!((s.l - 72.5).abs() < 1e-4);
    }

    #[test]
    fn positions_are_mirrored_horizontally() {
        let mut frame = FrameBuffer::new(4, 4);
        frame.fill_rgb(255, 0, 0);
        let canvas = CanvasSize::new(400, 200);
        let samples: Vec<_> = SamplePass::new(&frame, params(0.0, 50, 2), canvas).collect();
        assert_eq!(samples.len(), 4);
        assert!((samples[0].x - 400.0).abs() < 1e-4);
        assert!(samples[0].y.abs() < 1e-4);
        assert!((samples[1].x - 200.0).abs() < 1e-4);
        assert!((samples[3].y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn grid_walk_matches_cell_count() {
        let frame = FrameBuffer::new(11, 7);
        for stride in 1..=10 {
            let mut pass = SamplePass::new(&frame, params(0.0, 50, stride), CanvasSize::default());
            pass.by_ref().for_each(drop);
            assert_eq!(pass.stats().cells_visited, grid_cells(11, 7, stride), "stride {stride}");
        }
    }
}
