//! Drifting creatures that can be popped
//!
//! Both species share one struct and one update contract; the `Species` tag
//! only changes body proportions, appendages and how the sprite is drawn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Hsla;
use super::state::Viewport;
use crate::tuning::Tuning;

/// Creature species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    /// Round bell with trailing tentacles
    Jellyfish,
    /// Flat wide body with a single whip tail, faces its travel direction
    Stingray,
}

impl Species {
    /// Species spawned on a given level
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        if level >= tuning.stingray_level {
            Species::Stingray
        } else {
            Species::Jellyfish
        }
    }

    /// Default body proportions
    pub fn default_shape(&self) -> CreatureShape {
        match self {
            Species::Jellyfish => CreatureShape {
                width_factor: 1.1,
                height_factor: 0.8,
                appendages: 5,
                appendage_length: 1.5,
            },
            Species::Stingray => CreatureShape {
                width_factor: 1.6,
                height_factor: 0.7,
                appendages: 1,
                appendage_length: 2.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Jellyfish => "jellyfish",
            Species::Stingray => "stingray",
        }
    }
}

/// Body proportions relative to the creature's radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureShape {
    /// Horizontal half-extent as a multiple of radius
    pub width_factor: f32,
    /// Vertical half-extent as a multiple of radius
    pub height_factor: f32,
    /// Tentacle (jellyfish) or tail (stingray) count
    pub appendages: u32,
    /// Appendage length as a multiple of radius
    pub appendage_length: f32,
}

/// Where a creature is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    /// Popped: fading and shrinking until removed
    Disappearing,
}

/// Why a creature left the live set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    Faded,
    Expired,
    OffScreen,
}

/// A creature entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub species: Species,
    pub pos: Vec2,
    /// Base radius; shrinks while disappearing
    pub radius: f32,
    pub shape: CreatureShape,
    /// Sprite rotation (radians)
    pub rotation: f32,
    /// Unit travel direction
    pub dir: Vec2,
    /// Base speed (px/tick) before the global ramp
    pub speed: f32,
    /// Oscillation phase for bob and sway
    pub phase: f32,
    /// Phase advance per tick
    pub sway_speed: f32,
    pub age: u32,
    pub max_age: u32,
    pub color: Hsla,
    /// 0-1; strictly decreasing once disappearing
    pub opacity: f32,
    pub lifecycle: Lifecycle,
    /// Time of the last successful pop (ms)
    pub last_hit_at: Option<f64>,
    /// Time the creature entered the world (ms)
    pub spawned_at: f64,
}

impl Creature {
    /// A creature with its species' default proportions. The spawner
    /// randomizes the rest.
    pub fn new(
        id: u32,
        species: Species,
        pos: Vec2,
        radius: f32,
        dir: Vec2,
        speed: f32,
        spawned_at: f64,
    ) -> Self {
        let dir = dir.normalize_or_zero();
        Self {
            id,
            species,
            pos,
            radius,
            shape: species.default_shape(),
            rotation: facing(species, dir),
            dir,
            speed,
            phase: 0.0,
            sway_speed: 0.02,
            age: 0,
            max_age: 1200,
            color: Hsla::new(190.0, 0.7, 0.7, 0.9),
            opacity: 1.0,
            lifecycle: Lifecycle::Alive,
            last_hit_at: None,
            spawned_at,
        }
    }

    pub fn is_disappearing(&self) -> bool {
        self.lifecycle == Lifecycle::Disappearing
    }

    /// Largest half-extent of the body; the hit-test radius
    pub fn body_radius(&self) -> f32 {
        self.radius * self.shape.width_factor.max(self.shape.height_factor)
    }

    /// Whether a point lies within the body (hover highlight only)
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.pos.distance(p) < self.body_radius()
    }

    /// Start disappearing. Returns false if already popped.
    pub fn pop(&mut self, now_ms: f64) -> bool {
        if self.is_disappearing() {
            return false;
        }
        self.lifecycle = Lifecycle::Disappearing;
        self.last_hit_at = Some(now_ms);
        true
    }

    /// Advance one tick
    pub fn update(&mut self, speed_ramp: f32, tuning: &Tuning) {
        self.phase += self.sway_speed;
        self.pos += self.dir * self.speed * speed_ramp;

        // Bob along whichever axis we're not mainly travelling on
        let bob_axis = if self.dir.x.abs() >= self.dir.y.abs() {
            Vec2::Y
        } else {
            Vec2::X
        };
        self.pos += bob_axis * self.phase.sin() * tuning.bob_amplitude;

        if self.species == Species::Stingray {
            self.rotation = facing(self.species, self.dir) + (self.phase * 2.0).sin() * 0.06;
        }

        self.age = self.age.saturating_add(1);

        if self.is_disappearing() {
            self.opacity = (self.opacity - tuning.fade_rate).max(0.0);
            self.radius *= tuning.shrink_factor;
        }
    }

    /// Check whether this creature should leave the live set
    pub fn removal_cause(&self, viewport: Viewport, tuning: &Tuning) -> Option<RemovalCause> {
        if self.is_disappearing() && self.opacity <= tuning.removal_opacity {
            return Some(RemovalCause::Faded);
        }
        if self.age > self.max_age {
            return Some(RemovalCause::Expired);
        }
        let margin = tuning.offscreen_margin + self.body_radius();
        let off = self.pos.x < -margin
            || self.pos.x > viewport.width + margin
            || self.pos.y < -margin
            || self.pos.y > viewport.height + margin;
        off.then_some(RemovalCause::OffScreen)
    }
}

/// Sprite rotation for a travel direction. Jellyfish always stay upright.
fn facing(species: Species, dir: Vec2) -> f32 {
    match species {
        Species::Jellyfish => 0.0,
        Species::Stingray => dir.y.atan2(dir.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn jelly() -> Creature {
        Creature::new(1, Species::Jellyfish, Vec2::new(400.0, 300.0), 20.0, Vec2::X, 1.0, 0.0)
    }

    #[test]
    fn test_body_radius_uses_wider_extent() {
        let c = jelly();
        assert!((c.body_radius() - 22.0).abs() < 1e-5);
        let mut ray = c.clone();
        ray.shape = Species::Stingray.default_shape();
        assert!((ray.body_radius() - 32.0).abs() < 1e-5);
    }

    #[test]
    fn test_pop_is_idempotent() {
        let mut c = jelly();
        assert!(c.pop(1000.0));
        assert!(!c.pop(2000.0));
        assert_eq!(c.last_hit_at, Some(1000.0));
        assert!(c.is_disappearing());
    }

    #[test]
    fn test_moves_along_direction_with_ramp() {
        let tuning = Tuning {
            bob_amplitude: 0.0,
            ..Default::default()
        };
        let mut c = jelly();
        c.update(2.0, &tuning);
        assert!((c.pos.x - 402.0).abs() < 1e-4);
        assert!((c.pos.y - 300.0).abs() < 1e-4);
        assert_eq!(c.age, 1);
    }

    #[test]
    fn test_bob_is_perpendicular_to_travel() {
        let tuning = Tuning::default();
        let mut c = jelly();
        c.phase = std::f32::consts::FRAC_PI_2 - c.sway_speed;
        c.speed = 0.0;
        c.update(1.0, &tuning);
        // Horizontal traveller bobs vertically
        assert!((c.pos.x - 400.0).abs() < 1e-4);
        assert!((c.pos.y - 300.6).abs() < 1e-3);

        let mut v = Creature::new(2, Species::Jellyfish, Vec2::new(400.0, 300.0), 20.0, Vec2::Y, 0.0, 0.0);
        v.phase = std::f32::consts::FRAC_PI_2 - v.sway_speed;
        v.update(1.0, &tuning);
        assert!((v.pos.x - 400.6).abs() < 1e-3);
        assert!((v.pos.y - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_disappearing_fades_shrinks_and_keeps_moving() {
        let tuning = Tuning::default();
        let mut c = jelly();
        c.pop(0.0);
        let before = c.clone();
        c.update(1.0, &tuning);
        assert!(c.opacity < before.opacity);
        assert!(c.radius < before.radius);
        assert!(c.pos.x > before.pos.x);
    }

    #[test]
    fn test_removal_causes() {
        let tuning = Tuning::default();
        let mut c = jelly();
        assert_eq!(c.removal_cause(viewport(), &tuning), None);

        c.age = c.max_age + 1;
        assert_eq!(c.removal_cause(viewport(), &tuning), Some(RemovalCause::Expired));

        let mut c = jelly();
        c.pos.x = -tuning.offscreen_margin - c.body_radius() - 1.0;
        assert_eq!(c.removal_cause(viewport(), &tuning), Some(RemovalCause::OffScreen));

        let mut c = jelly();
        c.pos.y = 600.0 + tuning.offscreen_margin + c.body_radius() + 1.0;
        assert_eq!(c.removal_cause(viewport(), &tuning), Some(RemovalCause::OffScreen));

        let mut c = jelly();
        c.pop(0.0);
        c.opacity = tuning.removal_opacity;
        assert_eq!(c.removal_cause(viewport(), &tuning), Some(RemovalCause::Faded));
    }

    #[test]
    fn test_alive_low_opacity_is_not_faded() {
        let tuning = Tuning::default();
        let mut c = jelly();
        c.opacity = 0.0;
        assert_eq!(c.removal_cause(viewport(), &tuning), None);
    }

    #[test]
    fn test_stingray_faces_travel() {
        let c = Creature::new(3, Species::Stingray, Vec2::ZERO, 20.0, Vec2::new(0.0, -1.0), 1.0, 0.0);
        assert!((c.rotation + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_disappearing_opacity_strictly_decreases(
            start in 0.1f32..1.0,
            ramp in 0.5f32..3.0,
        ) {
            let tuning = Tuning::default();
            let mut c = jelly();
            c.opacity = start;
            c.pop(0.0);
            let vp = Viewport::new(10_000.0, 10_000.0);
            let mut last = c.opacity;
            let mut ticks = 0;
            loop {
                c.update(ramp, &tuning);
                ticks += 1;
                prop_assert!(c.opacity < last);
                prop_assert!(c.is_disappearing());
                last = c.opacity;
                if c.removal_cause(vp, &tuning).is_some() {
                    break;
                }
                prop_assert!(ticks < 1000);
            }
        }
    }
}
