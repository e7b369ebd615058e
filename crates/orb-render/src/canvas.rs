use anyhow::{Context, Result};
use orb_core::color::hsl_to_rgb;
use orb_core::draw::{CanvasSize, DrawCommand, HslaColor};
use orb_core::traits::DrawTarget;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

/// Surface de dessin persistante (1920×1080 par défaut), rastérisée par tiny-skia.
///
/// Never cleared between frames: the translucent fade rectangle each frame
/// draws is what turns old orbs into trails.
///
/// # Example
/// ```
/// use orb_core::draw::{CanvasSize, DrawCommand, HslaColor};
/// use orb_core::traits::DrawTarget;
/// use orb_render::canvas::RasterCanvas;
///
/// let mut canvas = RasterCanvas::new(CanvasSize::new(64, 64)).unwrap();
/// canvas.draw(&DrawCommand::Ellipse { cx: 32.0, cy: 32.0, diameter: 20.0, color: HslaColor::new(0.0, 100.0, 50.0, 1.0) });
/// assert_eq!(canvas.rgb_at(32, 32), Some((255, 0, 0)));
/// ```
pub struct RasterCanvas {
    pixmap: Pixmap,
    size: CanvasSize,
    paint: Paint<'static>,
}

impl RasterCanvas {
    /// Create an opaque white canvas.
    ///
    /// # Errors
    /// Returns an error for a zero-sized canvas.
    pub fn new(size: CanvasSize) -> Result<Self> {
        let mut pixmap = Pixmap::new(size.width, size.height)
            .with_context(|| format!("Canvas invalide : {}x{}", size.width, size.height))?;
        pixmap.fill(Color::WHITE);
        let mut paint = Paint::default();
        paint.anti_alias = true;
        Ok(Self {
            pixmap,
            size,
            paint,
        })
    }

    /// Canvas dimensions.
    #[must_use]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Raw premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Couleur (non prémultipliée) d'un pixel, `None` hors limites.
    #[must_use]
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        // Pixmap::pixel ne contrôle que l'index linéaire
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some((px.red(), px.green(), px.blue()))
    }

    fn set_color(&mut self, c: HslaColor) -> bool {
        let a = c.a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return false;
        }
        let (r, g, b) = hsl_to_rgb(c.h, c.s, c.l);
        let color = Color::from_rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            a,
        );
        match color {
            Some(color) => {
                self.paint.set_color(color);
                true
            }
            None => false,
        }
    }
}

impl DrawTarget for RasterCanvas {
    fn draw(&mut self, cmd: &DrawCommand) {
        if !self.set_color(cmd.color()) {
            return;
        }
        match *cmd {
            DrawCommand::Rect { x, y, w, h, .. } => {
                if let Some(rect) = Rect::from_xywh(x, y, w, h) {
                    self.pixmap
                        .fill_rect(rect, &self.paint, Transform::identity(), None);
                }
            }
            DrawCommand::Ellipse { cx, cy, diameter, .. } => {
                // rayon nul : rien à dessiner
                if let Some(path) = PathBuilder::from_circle(cx, cy, diameter / 2.0) {
                    self.pixmap.fill_path(
                        &path,
                        &self.paint,
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_mosaic::compose::FADE_COLOR;

    #[test]
    fn starts_white() {
        let canvas = RasterCanvas::new(CanvasSize::new(4, 4)).unwrap();
        assert_eq!(canvas.rgb_at(3, 3), Some((255, 255, 255)));
        assert_eq!(canvas.rgb_at(4, 0), None);
        assert_eq!(canvas.rgb_at(0, 4), None);
    }

    #[test]
    fn out_of_range_column_does_not_wrap_to_next_row() {
        let mut canvas = RasterCanvas::new(CanvasSize::new(4, 4)).unwrap();
        canvas.draw(&DrawCommand::Rect {
            x: 0.0,
            y: 1.0,
            w: 1.0,
            h: 1.0,
            color: HslaColor::new(0.0, 100.0, 50.0, 1.0),
        });
        assert_eq!(canvas.rgb_at(0, 1), Some((255, 0, 0)));
        assert_eq!(canvas.rgb_at(4, 0), None);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(RasterCanvas::new(CanvasSize::new(0, 10)).is_err());
    }

    #[test]
    fn fade_rect_moves_toward_its_color() {
        let mut canvas = RasterCanvas::new(CanvasSize::new(8, 8)).unwrap();
        canvas.draw(&DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            w: 8.0,
            h: 8.0,
            color: HslaColor::new(240.0, 100.0, 50.0, 1.0),
        });
        assert_eq!(canvas.rgb_at(4, 4), Some((0, 0, 255)));

        let fade = DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            w: 8.0,
            h: 8.0,
            color: FADE_COLOR,
        };
        let mut previous_red = 0u8;
        for _ in 0..200 {
            canvas.draw(&fade);
            let (r, g, _) = canvas.rgb_at(4, 4).unwrap();
            assert_eq!(r, g);
            assert!(r >= previous_red, "{r} < {previous_red}");
            previous_red = r;
        }
        // l = 95 % -> 242 ; la quantification 8 bits arrête le fondu un peu avant
        let (r, g, b) = canvas.rgb_at(4, 4).unwrap();
        for c in [r, g, b] {
            assert!((i32::from(c) - 242).abs() <= 15, "({r},{g},{b})");
        }
    }

    #[test]
    fn zero_diameter_and_transparent_are_noops() {
        let mut canvas = RasterCanvas::new(CanvasSize::new(8, 8)).unwrap();
        let before = canvas.data().to_vec();
        canvas.draw(&DrawCommand::Ellipse {
            cx: 4.0,
            cy: 4.0,
            diameter: 0.0,
            color: HslaColor::new(0.0, 100.0, 50.0, 1.0),
        });
        canvas.draw(&DrawCommand::Ellipse {
            cx: 4.0,
            cy: 4.0,
            diameter: 6.0,
            color: HslaColor::new(0.0, 100.0, 50.0, 0.0),
        });
        assert_eq!(canvas.data(), &before[..]);
    }
}
