/// Résolution de capture caméra par défaut.
pub const CAPTURE_SIZE: (u32, u32) = (320, 240);

/// Surface de dessin par défaut.
pub const CANVAS_SIZE: (u32, u32) = (1920, 1080);

/// Range, default and increment of one user-facing control.
///
/// # Example
/// ```
/// use orb_core::config::{ParamId, ParamSpec};
/// let spec = ParamId::Detail.spec();
/// assert_eq!(spec.min, 2.0);
/// assert_eq!(spec.snap(7.4), 7.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Smallest allowed value.
    pub min: f32,
    /// Largest allowed value.
    pub max: f32,
    /// Value at start-up and after a reset.
    pub default: f32,
    /// Increment of one keyboard nudge.
    pub step: f32,
}

impl ParamSpec {
    /// Clamp `v` into `[min, max]` and snap it onto the step grid anchored at `min`.
    #[must_use]
    pub fn snap(&self, v: f32) -> f32 {
        if !v.is_finite() {
            return self.default;
        }
        let steps = ((v - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // déjà sur la grille : on garde la valeur telle quelle (bruit flottant)
        if (snapped - v).abs() <= self.step * 1e-3 {
            return v.clamp(self.min, self.max);
        }
        snapped.clamp(self.min, self.max)
    }
}

/// Identifiant d'un des quatre curseurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Biais lumière / couleur [0, 1].
    Light,
    /// Répétitions tolérées par classe de couleur [1, 50].
    Tolerance,
    /// Pas de la grille d'échantillonnage en pixels [2, 10].
    Detail,
    /// Facteur d'échelle des pixels volumétriques [1, 30].
    Scale,
}

impl ParamId {
    /// All controls, in display order.
    pub const ALL: [ParamId; 4] = [
        ParamId::Light,
        ParamId::Tolerance,
        ParamId::Detail,
        ParamId::Scale,
    ];

    /// Control range for this parameter.
    #[must_use]
    pub const fn spec(self) -> ParamSpec {
        match self {
            ParamId::Light => ParamSpec {
                min: 0.0,
                max: 1.0,
                default: 0.5,
                step: 0.001,
            },
            ParamId::Tolerance => ParamSpec {
                min: 1.0,
                max: 50.0,
                default: 10.0,
                step: 1.0,
            },
            ParamId::Detail => ParamSpec {
                min: 2.0,
                max: 10.0,
                default: 3.0,
                step: 1.0,
            },
            ParamId::Scale => ParamSpec {
                min: 1.0,
                max: 30.0,
                default: 5.0,
                step: 0.5,
            },
        }
    }

    /// Libellé affiché à côté du curseur.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ParamId::Light => "Light / Color",
            ParamId::Tolerance => "Repetition tol.",
            ParamId::Detail => "Detail",
            ParamId::Scale => "Size",
        }
    }

    /// Next control in display order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            ParamId::Light => ParamId::Tolerance,
            ParamId::Tolerance => ParamId::Detail,
            ParamId::Detail => ParamId::Scale,
            ParamId::Scale => ParamId::Light,
        }
    }

    /// Previous control in display order, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            ParamId::Light => ParamId::Scale,
            ParamId::Tolerance => ParamId::Light,
            ParamId::Detail => ParamId::Tolerance,
            ParamId::Scale => ParamId::Detail,
        }
    }
}

/// Les quatre paramètres utilisateur, lus une seule fois en début de frame.
///
/// `Copy` : chaque frame travaille sur son propre instantané, aucune
/// modification ne peut l'atteindre en cours de passe.
///
/// # Example
/// ```
/// use orb_core::config::Params;
/// let p = Params::default();
/// assert_eq!(p.tolerance, 10);
/// assert_eq!(p.detail, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    /// Light/color bias [0.0, 1.0]. 0 = source colors, 1 = washed out.
    pub light: f32,
    /// Max retained samples per color bucket and frame [1, 50].
    pub tolerance: u32,
    /// Grid stride / tile size in capture pixels [2, 10].
    pub detail: u32,
    /// Volumetric pixel scale factor [1.0, 30.0], step 0.5.
    pub scale: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            light: ParamId::Light.spec().default,
            tolerance: ParamId::Tolerance.spec().default as u32,
            detail: ParamId::Detail.spec().default as u32,
            scale: ParamId::Scale.spec().default,
        }
    }
}

impl Params {
    /// Valeur courante d'un paramètre, en flottant.
    #[must_use]
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Light => self.light,
            ParamId::Tolerance => self.tolerance as f32,
            ParamId::Detail => self.detail as f32,
            ParamId::Scale => self.scale,
        }
    }

    /// Écrit un paramètre, ramené dans sa plage et sur sa grille de pas.
    ///
    /// # Example
    /// ```
    /// use orb_core::config::{ParamId, Params};
    /// let mut p = Params::default();
    /// p.set(ParamId::Scale, 99.0);
    /// assert_eq!(p.scale, 30.0);
    /// ```
    pub fn set(&mut self, id: ParamId, value: f32) {
        let v = id.spec().snap(value);
        match id {
            ParamId::Light => self.light = v,
            ParamId::Tolerance => self.tolerance = v as u32,
            ParamId::Detail => self.detail = v as u32,
            ParamId::Scale => self.scale = v,
        }
    }

    /// Déplace un paramètre de `steps` crans (négatif = vers le minimum).
    ///
    /// # Example
    /// ```
    /// use orb_core::config::{ParamId, Params};
    /// let mut p = Params::default();
    /// p.nudge(ParamId::Detail, 2);
    /// assert_eq!(p.detail, 5);
    /// p.nudge(ParamId::Detail, -100);
    /// assert_eq!(p.detail, 2);
    /// ```
    pub fn nudge(&mut self, id: ParamId, steps: i32) {
        let spec = id.spec();
        self.set(id, self.get(id) + steps as f32 * spec.step);
    }

    /// Clamp all fields to their valid ranges.
    ///
    /// Returns `true` if at least one value had to be corrected.
    ///
    /// # Example
    /// ```
    /// use orb_core::config::Params;
    /// let mut p = Params { light: 2.0, tolerance: 0, detail: 3, scale: 5.0 };
    /// assert!(p.clamp_all());
    /// assert_eq!(p.light, 1.0);
    /// assert_eq!(p.tolerance, 1);
    /// ```
    pub fn clamp_all(&mut self) -> bool {
        let before = *self;
        for id in ParamId::ALL {
            self.set(id, self.get(id));
        }
        let changed = before != *self;
        if changed {
            log::warn!("Paramètres hors plage corrigés : {before:?} -> {self:?}");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_specs() {
        let p = Params::default();
        for id in ParamId::ALL {
            assert!((p.get(id) - id.spec().default).abs() < f32::EPSILON, "{id:?}");
        }
    }

    #[test]
    fn light_nudges_by_thousandths() {
        let mut p = Params::default();
        p.nudge(ParamId::Light, 10);
        assert!((p.light - 0.51).abs() < 1e-4);
        p.nudge(ParamId::Light, 10_000);
        assert!((p.light - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn scale_snaps_to_half_steps() {
        let mut p = Params::default();
        p.set(ParamId::Scale, 7.3);
        assert!((p.scale - 7.5).abs() < f32::EPSILON);
        p.nudge(ParamId::Scale, -1);
        assert!((p.scale - 7.0).abs() < f32::EPSILON);
    }

    #[test]
    fn in_range_values_are_untouched() {
        let mut p = Params {
            light: 0.25,
            tolerance: 50,
            detail: 10,
            scale: 1.0,
        };
        assert!(!p.clamp_all());
    }

    #[test]
    fn non_finite_falls_back_to_default() {
        let mut p = Params::default();
        p.set(ParamId::Light, f32::NAN);
        assert!((p.light - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn selection_cycles() {
        let mut id = ParamId::Light;
        for _ in 0..4 {
            id = id.next();
        }
        assert_eq!(id, ParamId::Light);
        assert_eq!(ParamId::Light.prev(), ParamId::Scale);
    }
}
