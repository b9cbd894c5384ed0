//! Short-lived particles: cursor trail dots and pop bursts

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::Hsla;
use crate::tuning::Tuning;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radius in px; shrinks by `decay` every tick
    pub size: f32,
    pub decay: f32,
    pub color: Hsla,
}

impl Particle {
    /// One dot of the cursor trail, drifting slowly in a random direction
    pub fn trail<R: Rng + ?Sized>(pos: Vec2, tuning: &Tuning, rng: &mut R) -> Self {
        let speed = tuning.trail_speed;
        let vel = if speed > 0.0 {
            Vec2::new(rng.random_range(-speed..speed), rng.random_range(-speed..speed))
        } else {
            Vec2::ZERO
        };
        Self {
            pos,
            vel,
            size: rng.random_range(tuning.trail_size_min..=tuning.trail_size_max),
            decay: tuning.particle_decay,
            color: Hsla::random_vivid(rng),
        }
    }

    /// Burst of particles flying outward from a popped creature
    pub fn burst<R: Rng + ?Sized>(
        center: Vec2,
        base: Hsla,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Vec<Self> {
        let count = tuning.pop_burst_count;
        (0..count)
            .map(|i| {
                // Evenly spread with a little jitter so bursts don't look gridded
                let angle = (i as f32 / count as f32) * std::f32::consts::TAU
                    + rng.random_range(-0.2..0.2);
                let speed =
                    rng.random_range(tuning.pop_burst_speed_min..=tuning.pop_burst_speed_max);
                Self {
                    pos: center,
                    vel: Vec2::from_angle(angle) * speed,
                    size: rng.random_range(tuning.pop_burst_size_min..=tuning.pop_burst_size_max),
                    decay: tuning.particle_decay,
                    color: base.spark(rng, 20.0),
                }
            })
            .collect()
    }

    /// Advance one tick: drift and shrink (never below zero)
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.size = (self.size - self.decay).max(0.0);
    }

    pub fn is_dead(&self, epsilon: f32) -> bool {
        self.size <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_update_moves_and_shrinks() {
        let mut p = Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(1.0, -0.5),
            size: 3.0,
            decay: 0.1,
            color: Hsla::new(0.0, 1.0, 0.5, 1.0),
        };
        p.update();
        assert_eq!(p.pos, Vec2::new(11.0, 9.5));
        assert!((p.size - 2.9).abs() < 1e-6);
    }

    #[test]
    fn test_size_floors_at_zero() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 0.05,
            decay: 0.1,
            color: Hsla::new(0.0, 1.0, 0.5, 1.0),
        };
        p.update();
        assert_eq!(p.size, 0.0);
        assert!(p.is_dead(0.2));
    }

    #[test]
    fn test_trail_within_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let p = Particle::trail(Vec2::new(5.0, 5.0), &tuning, &mut rng);
            assert!(p.size >= tuning.trail_size_min && p.size <= tuning.trail_size_max);
            assert!(p.vel.x.abs() <= tuning.trail_speed && p.vel.y.abs() <= tuning.trail_speed);
        }
    }

    #[test]
    fn test_burst_moves_outward() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let center = Vec2::new(50.0, 50.0);
        let mut burst = Particle::burst(center, Hsla::new(120.0, 0.7, 0.7, 0.9), &tuning, &mut rng);
        assert_eq!(burst.len(), tuning.pop_burst_count as usize);
        for p in &mut burst {
            p.update();
            assert!(p.pos.distance(center) >= tuning.pop_burst_speed_min - 1e-4);
        }
    }

    proptest! {
        #[test]
        fn prop_size_never_increases(size in 0.0f32..20.0, decay in 0.0f32..1.0, ticks in 1usize..300) {
            let mut p = Particle {
                pos: Vec2::ZERO,
                vel: Vec2::new(0.3, 0.3),
                size,
                decay,
                color: Hsla::new(0.0, 1.0, 0.5, 1.0),
            };
            let mut last = p.size;
            for _ in 0..ticks {
                p.update();
                prop_assert!(p.size <= last);
                prop_assert!(p.size >= 0.0);
                last = p.size;
            }
        }
    }
}
