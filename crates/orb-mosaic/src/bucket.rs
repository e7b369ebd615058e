use std::collections::HashMap;

use orb_core::color::Hsl;

/// Classe de couleur grossière : chaque canal HSL arrondi à la dizaine la plus proche.
///
/// # Example
/// ```
/// use orb_core::color::Hsl;
/// use orb_mosaic::bucket::BucketKey;
/// let k = BucketKey::quantize(Hsl { h: 355, s: 44, l: 45 });
/// assert_eq!(k, BucketKey { h: 360, s: 40, l: 50 });
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BucketKey {
    /// Hue rounded to a multiple of 10 (0..=360; 355+ rounds up to 360).
    pub h: u16,
    /// Saturation rounded to a multiple of 10.
    pub s: u8,
    /// Lightness rounded to a multiple of 10.
    pub l: u8,
}

impl BucketKey {
    /// Round each channel to the nearest multiple of 10, halves going up.
    #[inline]
    #[must_use]
    pub fn quantize(c: Hsl) -> Self {
        Self {
            h: (c.h + 5) / 10 * 10,
            s: ((u16::from(c.s) + 5) / 10 * 10) as u8,
            l: ((u16::from(c.l) + 5) / 10 * 10) as u8,
        }
    }
}

/// Compteur d'occurrences par classe, vivant le temps d'une seule passe.
///
/// # Example
/// ```
/// use orb_mosaic::bucket::{BucketCounts, BucketKey};
/// let mut counts = BucketCounts::default();
/// let k = BucketKey { h: 0, s: 100, l: 50 };
/// assert_eq!(counts.bump(k), 1);
/// assert_eq!(counts.bump(k), 2);
/// assert_eq!(counts.get(k), 2);
/// ```
#[derive(Debug, Default)]
pub struct BucketCounts {
    counts: HashMap<BucketKey, u32>,
}

impl BucketCounts {
    /// Increment the count for `key` (creating it at 1) and return the new count.
    #[inline]
    pub fn bump(&mut self, key: BucketKey) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Current count for `key`, 0 if never seen.
    #[must_use]
    pub fn get(&self, key: BucketKey) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct buckets seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// `true` if no sample has been counted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_up() {
        let k = BucketKey::quantize(Hsl { h: 5, s: 15, l: 25 });
        assert_eq!(k, BucketKey { h: 10, s: 20, l: 30 });
        let k = BucketKey::quantize(Hsl { h: 4, s: 14, l: 24 });
        assert_eq!(k, BucketKey { h: 0, s: 10, l: 20 });
    }

    #[test]
    fn extremes_stay_representable() {
        let k = BucketKey::quantize(Hsl { h: 359, s: 100, l: 100 });
        assert_eq!(k, BucketKey { h: 360, s: 100, l: 100 });
    }

    #[test]
    fn near_colors_share_a_bucket() {
        let a = BucketKey::quantize(Hsl { h: 121, s: 88, l: 47 });
        let b = BucketKey::quantize(Hsl { h: 118, s: 92, l: 53 });
        assert_eq!(a, b);
    }

    #[test]
    fn counts_are_per_key() {
        let mut counts = BucketCounts::default();
        let a = BucketKey { h: 10, s: 50, l: 50 };
        let b = BucketKey { h: 20, s: 50, l: 50 };
        counts.bump(a);
        counts.bump(a);
        counts.bump(b);
        assert_eq!(counts.get(a), 2);
        assert_eq!(counts.get(b), 1);
        assert_eq!(counts.len(), 2);
    }
}
