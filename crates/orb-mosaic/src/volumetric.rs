use orb_core::color::{lerp, map_range, wrap_hue};
use orb_core::draw::{DrawCommand, HslaColor};
use orb_core::traits::DrawTarget;

/// Nombre de couches d'ellipses par pixel volumétrique.
pub const LAYERS: u32 = 16;

const LAYERS_F: f32 = LAYERS as f32;
/// Layers above this index form the dense core (15 and 16).
const CORE_THRESHOLD: f32 = LAYERS_F * 0.9;
/// Layers below this index form the inner glow (1 to 6).
const GLOW_THRESHOLD: f32 = LAYERS_F * 0.4;
/// Opacité de la couche la plus grande.
const MAX_ALPHA: f32 = 0.06;
/// Le halo achromatique ne concerne que les couches 1 et 2.
const HALO_BELOW: u32 = 3;
const HALO_GROWTH: f32 = 1.4;
const HALO_ALPHA: f32 = 0.15;

/// Une couche calculée : ellipse colorée plus halo éventuel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    /// Layer index in [1, 16].
    pub index: u32,
    /// Diameter of the colored ellipse.
    pub diameter: f32,
    /// Color of the colored ellipse (lightness already clamped to [0, 100]).
    pub color: HslaColor,
    /// Achromatic halo drawn right before the colored ellipse, if any.
    pub halo: Option<(f32, HslaColor)>,
}

/// Calcule la couche `i` (1..=16) d'un pixel volumétrique.
///
/// `tile` is the grid stride, `hue` the sample hue in degrees, `light` and
/// `scale` the current parameters. Pure function of its inputs.
///
/// # Example
/// ```
/// use orb_mosaic::volumetric::layer;
/// let outer = layer(16, 3.0, 0.0, 0.0, 5.0);
/// assert_eq!(outer.diameter, 15.0);
/// assert!((outer.color.a - 0.06).abs() < 1e-6);
/// assert!(outer.halo.is_none());
/// assert!(layer(1, 3.0, 0.0, 0.0, 5.0).halo.is_some());
/// ```
#[must_use]
pub fn layer(i: u32, tile: f32, hue: f32, light: f32, scale: f32) -> Layer {
    let fi = i as f32;
    let diameter = map_range(fi, 0.0, LAYERS_F, 0.0, tile * scale);
    let alpha = map_range(fi, 0.0, LAYERS_F, 0.0, MAX_ALPHA);

    // extrapolation non bornée sous 14.4 : seule la luminosité finale est bornée
    let center_intensity = map_range(fi, CORE_THRESHOLD, LAYERS_F, 1.0, 0.0);
    let is_core = fi > CORE_THRESHOLD;
    let baseline = map_range(fi, 0.0, LAYERS_F, 100.0, 40.0);

    let (h, s, l) = if fi < GLOW_THRESHOLD {
        (
            wrap_hue(hue + map_range(fi, 0.0, GLOW_THRESHOLD, -10.0, 10.0)),
            lerp(10.0, 25.0, 1.0 - light),
            lerp(85.0, 98.0, light),
        )
    } else {
        let (s_from, s_to) = if is_core { (45.0, 10.0) } else { (65.0, 25.0) };
        (
            wrap_hue(hue + map_range(fi, 0.0, LAYERS_F, -20.0, 20.0)),
            lerp(s_from, s_to, light),
            lerp(baseline + center_intensity * 25.0, 98.0, light),
        )
    };

    let halo = (i < HALO_BELOW).then(|| {
        (
            diameter * HALO_GROWTH,
            HslaColor::gray(85.0 + fi * 3.0, HALO_ALPHA),
        )
    });

    Layer {
        index: i,
        diameter,
        color: HslaColor::new(h, s, l.clamp(0.0, 100.0), alpha),
        halo,
    }
}

/// Les 16 couches, de l'arrière (16, la plus grande) vers l'avant (1).
///
/// # Example
/// ```
/// use orb_mosaic::volumetric::volumetric_layers;
/// let idx: Vec<u32> = volumetric_layers(3.0, 200.0, 0.5, 5.0).map(|l| l.index).collect();
/// assert_eq!(idx.first(), Some(&16));
/// assert_eq!(idx.last(), Some(&1));
/// ```
pub fn volumetric_layers(
    tile: f32,
    hue: f32,
    light: f32,
    scale: f32,
) -> impl Iterator<Item = Layer> {
    (1..=LAYERS).rev().map(move |i| layer(i, tile, hue, light, scale))
}

/// Dessine un pixel volumétrique centré sur (x, y) : 16 ellipses + 2 halos.
///
/// Issues exactly 18 draw calls regardless of parameters.
///
/// # Example
/// ```
/// use orb_core::draw::DrawCommand;
/// use orb_mosaic::volumetric::draw_volumetric_pixel;
/// let mut cmds: Vec<DrawCommand> = Vec::new();
/// draw_volumetric_pixel(&mut cmds, 100.0, 50.0, 3, 0.0, 0.5, 5.0);
/// assert_eq!(cmds.len(), 18);
/// ```
pub fn draw_volumetric_pixel<T: DrawTarget + ?Sized>(
    target: &mut T,
    x: f32,
    y: f32,
    tile: u32,
    hue: f32,
    light: f32,
    scale: f32,
) {
    for layer in volumetric_layers(tile as f32, hue, light, scale) {
        if let Some((diameter, color)) = layer.halo {
            target.draw(&DrawCommand::Ellipse {
                cx: x,
                cy: y,
                diameter,
                color,
            });
        }
        target.draw(&DrawCommand::Ellipse {
            cx: x,
            cy: y,
            diameter: layer.diameter,
            color: layer.color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(hue: f32, light: f32) -> Vec<Layer> {
        volumetric_layers(3.0, hue, light, 5.0).collect()
    }

    #[test]
    fn sizes_and_alpha_grow_with_index() {
        for l in all(120.0, 0.3) {
            let fi = l.index as f32;
            assert!((l.diameter - fi / 16.0 * 15.0).abs() < 1e-4);
            assert!((l.color.a - fi / 16.0 * 0.06).abs() < 1e-6);
        }
    }

    #[test]
    fn halos_only_on_first_two_layers() {
        let halos: Vec<_> = all(0.0, 0.5)
            .into_iter()
            .filter_map(|l| l.halo.map(|h| (l.index, h)))
            .collect();
        assert_eq!(halos.len(), 2);
        let (i, (d, c)) = halos[0];
        assert_eq!(i, 2);
        assert!((d - 2.0 / 16.0 * 15.0 * 1.4).abs() < 1e-4);
        assert!((c.l - 91.0).abs() < 1e-4);
        assert!((c.s).abs() < f32::EPSILON);
        assert!((c.a - 0.15).abs() < f32::EPSILON);
        let (i, (_, c)) = halos[1];
        assert_eq!(i, 1);
        assert!((c.l - 88.0).abs() < 1e-4);
    }

    #[test]
    fn inner_glow_uses_narrow_hue_jitter() {
        let l = layer(6, 3.0, 100.0, 0.0, 5.0);
        // -10 + 6/6.4 * 20 = 8.75
        assert!((l.color.h - 108.75).abs() < 1e-3);
        assert!((l.color.s - 25.0).abs() < 1e-4);
        assert!((l.color.l - 85.0).abs() < 1e-4);
    }

    #[test]
    fn outer_layers_use_wide_hue_jitter() {
        let l = layer(8, 3.0, 100.0, 0.0, 5.0);
        assert!((l.color.h - 100.0).abs() < 1e-3);
        assert!((l.color.s - 65.0).abs() < 1e-4);
        // baseline 70 + centerIntensity (1 + 6.4/1.6 = 5) * 25 -> borné à 100
        assert!((l.color.l - 100.0).abs() < 1e-4);
    }

    #[test]
    fn core_layers() {
        let top = layer(16, 3.0, 100.0, 0.0, 5.0);
        assert!((top.color.s - 45.0).abs() < 1e-4);
        // baseline 40, centerIntensity 0
        assert!((top.color.l - 40.0).abs() < 1e-4);
        assert!((top.color.h - 120.0).abs() < 1e-3);

        let l15 = layer(15, 3.0, 100.0, 0.0, 5.0);
        // baseline 43.75 + 0.625 * 25
        assert!((l15.color.l - 59.375).abs() < 1e-3);
    }

    #[test]
    fn full_light_collapses_to_washed_endpoints() {
        for l in all(200.0, 1.0) {
            assert!((l.color.l - 98.0).abs() < 1e-4, "layer {}", l.index);
            let expected_s = if l.index < 7 || l.index > 14 {
                10.0
            } else {
                25.0
            };
            assert!((l.color.s - expected_s).abs() < 1e-4, "layer {}", l.index);
        }
    }

    #[test]
    fn hue_wraps_near_zero() {
        let l = layer(1, 3.0, 2.0, 0.0, 5.0);
        // 2 - 10 + 1/6.4*20 = -4.875 -> 355.125
        assert!((l.color.h - 355.125).abs() < 1e-3);
        let l = layer(16, 3.0, 350.0, 0.0, 5.0);
        assert!((l.color.h - 10.0).abs() < 1e-3);
    }

    #[test]
    fn draw_order_puts_halo_before_its_layer() {
        let mut cmds: Vec<DrawCommand> = Vec::new();
        draw_volumetric_pixel(&mut cmds, 0.0, 0.0, 4, 30.0, 0.2, 10.0);
        assert_eq!(cmds.len(), 18);
        // ... 16..3 (14 ellipses), halo(2), 2, halo(1), 1
        let sat: Vec<f32> = cmds.iter().map(|c| c.color().s).collect();
        assert!(sat[14].abs() < f32::EPSILON);
        assert!(sat[15] > 0.0);
        assert!(sat[16].abs() < f32::EPSILON);
        assert!(sat[17] > 0.0);
        if let DrawCommand::Ellipse { diameter, .. } = cmds[17] {
            assert!((diameter - 40.0 / 16.0).abs() < 1e-4);
        }
    }
}
