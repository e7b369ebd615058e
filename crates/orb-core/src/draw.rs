/// Couleur HSL + alpha d'une commande de dessin.
///
/// `h` en degrés, `s`/`l` en pourcent, `a` dans [0, 1].
///
/// # Example
/// ```
/// use orb_core::draw::HslaColor;
/// let c = HslaColor::new(220.0, 70.0, 50.0, 1.0);
/// assert_eq!(c.h, 220.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HslaColor {
    /// Hue in degrees.
    pub h: f32,
    /// Saturation in percent.
    pub s: f32,
    /// Lightness in percent.
    pub l: f32,
    /// Opacity in [0, 1].
    pub a: f32,
}

impl HslaColor {
    /// Build a color from its four components.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Achromatic color of lightness `l` (percent).
    #[must_use]
    pub const fn gray(l: f32, a: f32) -> Self {
        Self { h: 0.0, s: 0.0, l, a }
    }
}

/// Dimensions de la surface de dessin, en pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Build a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        let (width, height) = crate::config::CANVAS_SIZE;
        Self { width, height }
    }
}

/// Une primitive de dessin immédiat, sans état.
///
/// Le rendu est exprimé comme une liste de commandes : testable sans surface
/// d'affichage, rastérisée ensuite par un [`DrawTarget`](crate::traits::DrawTarget).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled axis-aligned rectangle, top-left corner at (x, y).
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: HslaColor,
    },
    /// Filled circle-shaped ellipse centred on (cx, cy).
    Ellipse {
        cx: f32,
        cy: f32,
        diameter: f32,
        color: HslaColor,
    },
}

impl DrawCommand {
    /// Color of the primitive.
    #[must_use]
    pub fn color(&self) -> HslaColor {
        match *self {
            DrawCommand::Rect { color, .. } | DrawCommand::Ellipse { color, .. } => color,
        }
    }
}
