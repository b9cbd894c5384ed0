//! HSLA colors shared by the simulation and the renderer

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Color in HSLA space (hue in degrees, the rest in 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Fully saturated random hue (cursor trail)
    pub fn random_vivid<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random_range(0.0..360.0), 1.0, 0.5, 1.0)
    }

    /// Soft pastel random hue (creature bodies)
    pub fn random_pastel<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random_range(0.0..360.0_f32).floor(), 0.7, 0.7, 0.9)
    }

    /// Same color with the hue nudged by up to `spread` degrees and lightened
    pub fn spark<R: Rng + ?Sized>(&self, rng: &mut R, spread: f32) -> Self {
        let jitter = if spread > 0.0 {
            rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        Self {
            h: (self.h + jitter).rem_euclid(360.0),
            a: 1.0,
            ..self.lightened()
        }
    }

    /// Brighter, more saturated variant of the same hue
    pub fn lightened(&self) -> Self {
        Self::new(self.h, self.s.max(0.8), (self.l + 0.1).min(0.9), self.a)
    }

    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    /// CSS `hsla()` string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!(
            "hsla({:.0}, {:.0}%, {:.0}%, {:.3})",
            self.h,
            self.s * 100.0,
            self.l * 100.0,
            self.a.clamp(0.0, 1.0)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_to_css() {
        assert_eq!(
            Hsla::new(200.0, 0.7, 0.7, 0.9).to_css(),
            "hsla(200, 70%, 70%, 0.900)"
        );
        assert_eq!(Hsla::new(0.0, 1.0, 0.5, 2.0).to_css(), "hsla(0, 100%, 50%, 1.000)");
    }

    #[test]
    fn test_spark_stays_near_hue() {
        let mut rng = Pcg32::seed_from_u64(7);
        let base = Hsla::new(355.0, 0.7, 0.7, 0.9);
        for _ in 0..50 {
            let s = base.spark(&mut rng, 20.0);
            assert!((0.0..360.0).contains(&s.h));
            let diff = (s.h - base.h + 540.0).rem_euclid(360.0) - 180.0;
            assert!(diff.abs() <= 20.0 + 1e-3);
            assert!(s.l <= 0.9);
        }
    }
}
