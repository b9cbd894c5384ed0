//! Jelly Pop - swipe-to-pop jellyfish on a 2D canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particles, creatures, spawning, gesture hit detection)
//! - `renderer`: Drawing onto an abstract 2D surface (Canvas 2D on the web)
//! - `settings`: User-tunable interaction thresholds, persisted in LocalStorage
//! - `tuning`: Data-driven engine constants
//! - `audio`: Synthesised chimes via Web Audio (WASM only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{InteractionSettings, QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Fixed engine constants that are not worth tuning
pub mod consts {
    /// Nominal frame duration at 60 fps (ms), used by the headless driver
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// First level of a session
    pub const FIRST_LEVEL: u32 = 1;

    /// Alpha of the translucent background wash drawn each frame (motion trails)
    pub const TRAIL_WASH_ALPHA: f32 = 0.12;
}

/// Unit vector pointing from `from` toward `to` (zero if the points coincide)
#[inline]
pub fn unit_toward(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Directional alignment of a swipe with a target.
///
/// Returns the dot product of the normalized swipe direction and the unit
/// vector from `pointer` to `target`, in [-1, 1]. A zero-length swipe or a
/// pointer sitting exactly on the target yields 0.
#[inline]
pub fn alignment(swipe: Vec2, pointer: Vec2, target: Vec2) -> f32 {
    swipe.normalize_or_zero().dot(unit_toward(pointer, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_toward_degenerate() {
        assert_eq!(unit_toward(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        let u = unit_toward(Vec2::ZERO, Vec2::new(0.0, -10.0));
        assert!((u - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_alignment() {
        // Swiping right toward a target on the right
        let a = alignment(Vec2::new(3.0, 0.0), Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0));
        assert!((a - 1.0).abs() < 1e-6);
        // Swiping away from the target
        let a = alignment(Vec2::new(-3.0, 0.0), Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0));
        assert!((a + 1.0).abs() < 1e-6);
        // Perpendicular
        let a = alignment(Vec2::new(0.0, 5.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!(a.abs() < 1e-6);
        // Pointer on the target
        assert_eq!(alignment(Vec2::X, Vec2::ONE, Vec2::ONE), 0.0);
    }
}
