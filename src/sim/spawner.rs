//! Timer-driven creature spawning
//!
//! Creatures enter from a random screen edge heading inward. Species and
//! size/speed ranges depend on the level: later levels bring smaller, faster
//! creatures.

use glam::Vec2;
use rand::Rng;

use super::color::Hsla;
use super::creature::{Creature, CreatureShape, Species};
use super::state::Viewport;
use crate::tuning::Tuning;

/// Screen edge a creature enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySide {
    Left,
    Right,
    Top,
    Bottom,
}

impl EntrySide {
    pub const ALL: [EntrySide; 4] = [
        EntrySide::Left,
        EntrySide::Right,
        EntrySide::Top,
        EntrySide::Bottom,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Unit vector pointing from this edge into the viewport
    pub fn inward(&self) -> Vec2 {
        match self {
            EntrySide::Left => Vec2::X,
            EntrySide::Right => Vec2::NEG_X,
            EntrySide::Top => Vec2::Y,
            EntrySide::Bottom => Vec2::NEG_Y,
        }
    }
}

/// What the spawner needs to know about the world right now
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub level: u32,
    pub viewport: Viewport,
    pub now_ms: f64,
}

/// Frame-counting spawner with a population cap
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Frames since the last timed spawn
    pub timer: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame. Returns true when a timed spawn is due.
    pub fn advance(&mut self, tuning: &Tuning) -> bool {
        self.timer += 1;
        if self.timer > tuning.spawn_interval_ticks {
            self.timer = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.timer = 0;
    }

    /// Add one creature unless the population is at the cap.
    ///
    /// `next_id` is only consumed when a creature is actually created.
    pub fn try_spawn<R: Rng + ?Sized>(
        &self,
        creatures: &mut Vec<Creature>,
        next_id: &mut u32,
        ctx: SpawnContext,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<u32> {
        if creatures.len() >= tuning.max_creatures {
            return None;
        }
        let id = *next_id;
        *next_id += 1;

        let side = EntrySide::random(rng);
        let creature = build_creature(id, side, ctx, tuning, rng);
        log::debug!(
            "Spawned {} #{} from {:?} at ({:.0}, {:.0})",
            creature.species.as_str(),
            id,
            side,
            creature.pos.x,
            creature.pos.y
        );
        creatures.push(creature);
        Some(id)
    }
}

/// Build a creature just outside `side`, heading inward
pub fn build_creature<R: Rng + ?Sized>(
    id: u32,
    side: EntrySide,
    ctx: SpawnContext,
    tuning: &Tuning,
    rng: &mut R,
) -> Creature {
    let species = Species::for_level(ctx.level, tuning);
    let size_scale = tuning.level_size_scale(ctx.level);
    let speed_scale = tuning.level_speed_scale(ctx.level);

    let (radius, speed, shape) = match species {
        Species::Jellyfish => (
            rng.random_range(tuning.jelly_radius_min..=tuning.jelly_radius_max),
            rng.random_range(tuning.jelly_speed_min..=tuning.jelly_speed_max),
            CreatureShape {
                appendages: rng
                    .random_range(tuning.jelly_tentacles_min..=tuning.jelly_tentacles_max),
                appendage_length: rng.random_range(
                    tuning.jelly_tentacle_length_min..=tuning.jelly_tentacle_length_max,
                ),
                ..species.default_shape()
            },
        ),
        Species::Stingray => (
            rng.random_range(tuning.ray_radius_min..=tuning.ray_radius_max),
            rng.random_range(tuning.ray_speed_min..=tuning.ray_speed_max),
            CreatureShape {
                appendage_length: rng
                    .random_range(tuning.ray_tail_length_min..=tuning.ray_tail_length_max),
                ..species.default_shape()
            },
        ),
    };
    let radius = radius * size_scale;
    let speed = speed * speed_scale;

    let extent = radius * shape.width_factor.max(shape.height_factor);
    let offset = extent + rng.random_range(0.0..=tuning.spawn_offset_max);
    let Viewport { width, height } = ctx.viewport;
    let pos = match side {
        EntrySide::Left => Vec2::new(-offset, rng.random_range(height * 0.1..=height * 0.9)),
        EntrySide::Right => Vec2::new(width + offset, rng.random_range(height * 0.1..=height * 0.9)),
        EntrySide::Top => Vec2::new(rng.random_range(width * 0.1..=width * 0.9), -offset),
        EntrySide::Bottom => Vec2::new(rng.random_range(width * 0.1..=width * 0.9), height + offset),
    };

    let tilt = rng.random_range(-tuning.spawn_tilt..=tuning.spawn_tilt);
    let dir = Vec2::from_angle(tilt).rotate(side.inward());

    let mut creature = Creature::new(id, species, pos, radius, dir, speed, ctx.now_ms);
    creature.shape = shape;
    creature.phase = rng.random_range(0.0..std::f32::consts::TAU);
    creature.sway_speed = rng.random_range(tuning.sway_speed_min..=tuning.sway_speed_max);
    creature.max_age = rng.random_range(tuning.max_age_min..=tuning.max_age_max);
    creature.color = Hsla::random_pastel(rng);
    creature
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(level: u32) -> SpawnContext {
        SpawnContext {
            level,
            viewport: Viewport::new(800.0, 600.0),
            now_ms: 1234.0,
        }
    }

    #[test]
    fn test_advance_fires_after_interval() {
        let tuning = Tuning {
            spawn_interval_ticks: 3,
            ..Default::default()
        };
        let mut spawner = Spawner::new();
        let fired: Vec<bool> = (0..8).map(|_| spawner.advance(&tuning)).collect();
        assert_eq!(fired, [false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn test_cap_is_respected() {
        let tuning = Tuning {
            max_creatures: 3,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let spawner = Spawner::new();
        let mut creatures = Vec::new();
        let mut next_id = 1;
        for _ in 0..10 {
            spawner.try_spawn(&mut creatures, &mut next_id, ctx(1), &tuning, &mut rng);
        }
        assert_eq!(creatures.len(), 3);
        assert_eq!(next_id, 4);
        let ids: Vec<u32> = creatures.iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_spawns_outside_edge_heading_inward() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for side in EntrySide::ALL {
            for _ in 0..20 {
                let c = build_creature(1, side, ctx(1), &tuning, &mut rng);
                let r = c.body_radius();
                match side {
                    EntrySide::Left => assert!(c.pos.x <= -r),
                    EntrySide::Right => assert!(c.pos.x >= 800.0 + r),
                    EntrySide::Top => assert!(c.pos.y <= -r),
                    EntrySide::Bottom => assert!(c.pos.y >= 600.0 + r),
                }
                assert!(c.dir.dot(side.inward()) > 0.9);
                assert!((c.dir.length() - 1.0).abs() < 1e-4);
                assert_eq!(c.spawned_at, 1234.0);
                // Fresh spawns sit inside the culling margin
                assert!(c.removal_cause(ctx(1).viewport, &tuning).is_none());
            }
        }
    }

    #[test]
    fn test_species_by_level() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let c = build_creature(1, EntrySide::Left, ctx(1), &tuning, &mut rng);
        assert_eq!(c.species, Species::Jellyfish);
        assert!(c.shape.appendages >= 4 && c.shape.appendages <= 7);
        let c = build_creature(2, EntrySide::Left, ctx(2), &tuning, &mut rng);
        assert_eq!(c.species, Species::Stingray);
        assert_eq!(c.shape.appendages, 1);
    }

    #[test]
    fn test_later_levels_are_smaller_and_faster() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..50 {
            let c = build_creature(1, EntrySide::Top, ctx(10), &tuning, &mut rng);
            assert!(c.radius <= tuning.ray_radius_max * tuning.level_size_scale(10) + 1e-4);
            assert!(c.speed >= tuning.ray_speed_min * tuning.level_speed_scale(10) - 1e-4);
        }
    }
}
