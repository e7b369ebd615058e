/// Couleur HSL entière : h ∈ [0, 360), s ∈ [0, 100], l ∈ [0, 100].
///
/// # Example
/// ```
/// use orb_core::color::Hsl;
/// let c = Hsl { h: 220, s: 70, l: 50 };
/// assert_eq!(c.h, 220);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hsl {
    /// Hue in whole degrees.
    pub h: u16,
    /// Saturation in whole percent.
    pub s: u8,
    /// Lightness in whole percent.
    pub l: u8,
}

/// Convertit RGB [0,255] → HSL (degrés / pourcent / pourcent), tronqué à l'entier.
///
/// Total over its domain. Achromatic inputs (r == g == b) yield h = s = 0.
///
/// # Example
/// ```
/// use orb_core::color::{rgb_to_hsl, Hsl};
/// assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0, s: 100, l: 50 });
/// assert_eq!(rgb_to_hsl(0, 0, 255), Hsl { h: 240, s: 100, l: 50 });
/// ```
#[must_use]
#[allow(clippy::float_cmp)] // max is one of r/g/b exactly
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let sector = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (sector * 60.0, s)
    };

    Hsl {
        h: h.rem_euclid(360.0).floor() as u16,
        s: (s * 100.0).floor() as u8,
        l: (l * 100.0).floor() as u8,
    }
}

/// Convertit HSL → RGB [0,255]. `h` en degrés (ramené dans [0, 360)), `s`/`l` en pourcent.
///
/// # Example
/// ```
/// use orb_core::color::hsl_to_rgb;
/// assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), (0, 255, 0));
/// assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), (255, 255, 255));
/// ```
#[must_use]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = wrap_hue(h) / 360.0;
    let s = s.clamp(0.0, 100.0) / 100.0;
    let l = l.clamp(0.0, 100.0) / 100.0;

    if s <= 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        to_byte(hue_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_channel(p, q, h)),
        to_byte(hue_channel(p, q, h - 1.0 / 3.0)),
    )
}

#[inline(always)]
fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[inline(always)]
fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Ramène une teinte quelconque dans [0, 360).
///
/// Unlike `%`, negative hues wrap around instead of keeping their sign.
///
/// # Example
/// ```
/// use orb_core::color::wrap_hue;
/// assert_eq!(wrap_hue(-5.0), 355.0);
/// assert_eq!(wrap_hue(370.0), 10.0);
/// ```
#[inline]
#[must_use]
pub fn wrap_hue(h: f32) -> f32 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid peut rendre exactement 360.0 pour -ε
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Interpolation linéaire non bornée : `a + (b - a) * t`.
///
/// # Example
/// ```
/// use orb_core::color::lerp;
/// assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
/// ```
#[inline(always)]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Re-projette `v` de `[in_lo, in_hi]` vers `[out_lo, out_hi]`, sans bornage.
///
/// Values outside the input range extrapolate linearly.
///
/// # Example
/// ```
/// use orb_core::color::map_range;
/// assert_eq!(map_range(8.0, 0.0, 16.0, 0.0, 1.0), 0.5);
/// assert_eq!(map_range(-1.0, 0.0, 1.0, 0.0, 10.0), -10.0);
/// ```
#[inline(always)]
#[must_use]
pub fn map_range(v: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    (v - in_lo) / (in_hi - in_lo) * (out_hi - out_lo) + out_lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_and_white() {
        assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 255, 0), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 0, 255), Hsl { h: 240, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(255, 255, 255), Hsl { h: 0, s: 0, l: 100 });
        assert_eq!(rgb_to_hsl(0, 0, 0), Hsl { h: 0, s: 0, l: 0 });
    }

    #[test]
    fn grays_are_achromatic() {
        for v in 0..=255u8 {
            let c = rgb_to_hsl(v, v, v);
            assert_eq!(c.h, 0, "gray {v}");
            assert_eq!(c.s, 0, "gray {v}");
        }
    }

    #[test]
    fn output_stays_in_range() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let c = rgb_to_hsl(r as u8, g as u8, b as u8);
                    assert!(c.h < 360, "h={} for ({r},{g},{b})", c.h);
                    assert!(c.s <= 100, "s={} for ({r},{g},{b})", c.s);
                    assert!(c.l <= 100, "l={} for ({r},{g},{b})", c.l);
                }
            }
        }
    }

    #[test]
    fn magenta_side_wraps_below_360() {
        // max = r, g < b: le secteur +6 doit rester sous 360°
        let c = rgb_to_hsl(255, 0, 1);
        assert!(c.h >= 359 && c.h < 360, "h={}", c.h);
    }

    #[test]
    fn hsl_roundtrip_close() {
        for &(r, g, b) in &[(200u8, 50u8, 50u8), (12, 180, 90), (90, 90, 250), (255, 200, 0)] {
            let c = rgb_to_hsl(r, g, b);
            let (r2, g2, b2) = hsl_to_rgb(f32::from(c.h), f32::from(c.s), f32::from(c.l));
            // HSL tronqué à l'entier : tolérance de quelques niveaux
            assert!((i16::from(r) - i16::from(r2)).abs() <= 6, "R {r} vs {r2}");
            assert!((i16::from(g) - i16::from(g2)).abs() <= 6, "G {g} vs {g2}");
            assert!((i16::from(b) - i16::from(b2)).abs() <= 6, "B {b} vs {b2}");
        }
    }

    #[test]
    fn wrap_hue_handles_negatives() {
        assert!((wrap_hue(-20.0) - 340.0).abs() < 1e-4);
        assert!(wrap_hue(-1e-7) < 360.0);
        assert!((wrap_hue(720.0)).abs() < 1e-4);
    }
}
