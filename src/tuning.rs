//! Data-driven engine constants
//!
//! Every number that shapes how the simulation feels lives here instead of
//! being scattered through update logic. `Tuning::default()` is the shipped
//! balance; tests build their own to pin behavior down.

use serde::{Deserialize, Serialize};

/// Engine tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Particles ===
    /// Trail particles emitted per pointer sample (before quality scaling)
    pub trail_particles_per_sample: u32,
    /// Trail particle initial size range (px)
    pub trail_size_min: f32,
    pub trail_size_max: f32,
    /// Trail particle max speed per axis (px/tick)
    pub trail_speed: f32,
    /// Size lost by every particle per tick
    pub particle_decay: f32,
    /// Particles at or below this size are dead
    pub particle_epsilon: f32,
    /// Particles emitted when a creature pops
    pub pop_burst_count: u32,
    /// Pop burst outward speed range (px/tick)
    pub pop_burst_speed_min: f32,
    pub pop_burst_speed_max: f32,
    /// Pop burst particle size range (px)
    pub pop_burst_size_min: f32,
    pub pop_burst_size_max: f32,

    // === Creature lifecycle ===
    /// Opacity lost per tick while disappearing
    pub fade_rate: f32,
    /// Radius multiplier per tick while disappearing (< 1)
    pub shrink_factor: f32,
    /// Disappearing creatures at or below this opacity are removed
    pub removal_opacity: f32,
    /// Extra room beyond the viewport (on top of body radius) before a creature is culled
    pub offscreen_margin: f32,

    // === Gesture detection ===
    /// Time after spawn during which a creature cannot be popped (ms)
    pub spawn_grace_ms: f64,
    /// Minimum spacing between two pops of the same creature (ms)
    pub per_creature_cooldown_ms: f64,
    /// Previous sample must be beyond this fraction of body radius to count as entering
    pub entering_outer_factor: f32,
    /// Current sample must be within this fraction of body radius to pop
    pub proximity_factor: f32,

    // === Spawning ===
    /// Frames between timed spawn attempts
    pub spawn_interval_ticks: u32,
    /// Live creature cap
    pub max_creatures: usize,
    /// Creatures placed when a level starts
    pub initial_creatures: usize,
    /// How far outside the edge a creature may start (px, on top of body radius)
    pub spawn_offset_max: f32,
    /// Max deviation of the travel direction from the inward normal (radians)
    pub spawn_tilt: f32,

    // === Jellyfish shape ===
    pub jelly_radius_min: f32,
    pub jelly_radius_max: f32,
    pub jelly_speed_min: f32,
    pub jelly_speed_max: f32,
    pub jelly_tentacles_min: u32,
    pub jelly_tentacles_max: u32,
    /// Tentacle length range as a multiple of radius
    pub jelly_tentacle_length_min: f32,
    pub jelly_tentacle_length_max: f32,

    // === Stingray shape ===
    pub ray_radius_min: f32,
    pub ray_radius_max: f32,
    pub ray_speed_min: f32,
    pub ray_speed_max: f32,
    pub ray_tail_length_min: f32,
    pub ray_tail_length_max: f32,

    // === Motion ===
    /// Sway phase advance range (radians/tick)
    pub sway_speed_min: f32,
    pub sway_speed_max: f32,
    /// Perpendicular bob amplitude (px/tick)
    pub bob_amplitude: f32,
    /// Lifespan range (ticks)
    pub max_age_min: u32,
    pub max_age_max: u32,
    /// Global speed ramp growth per tick
    pub speed_ramp_step: f32,
    /// Global speed ramp ceiling
    pub speed_ramp_max: f32,

    // === Levels ===
    /// Pops required to clear level 1
    pub base_pops_per_level: u32,
    /// Additional pops required per level after the first
    pub pops_per_level_step: u32,
    /// Last level; clearing it wins the game
    pub max_level: u32,
    /// Level at which stingrays replace jellyfish
    pub stingray_level: u32,
    /// Radius shrink per level: radius / (1 + k * (level - 1))
    pub level_size_falloff: f32,
    /// Speed gain per level: speed * (1 + k * (level - 1))
    pub level_speed_gain: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            trail_particles_per_sample: 5,
            trail_size_min: 2.0,
            trail_size_max: 7.0,
            trail_speed: 1.0,
            particle_decay: 0.1,
            particle_epsilon: 0.2,
            pop_burst_count: 16,
            pop_burst_speed_min: 1.5,
            pop_burst_speed_max: 4.5,
            pop_burst_size_min: 3.0,
            pop_burst_size_max: 6.0,

            fade_rate: 0.04,
            shrink_factor: 0.96,
            removal_opacity: 0.02,
            offscreen_margin: 200.0,

            spawn_grace_ms: 140.0,
            per_creature_cooldown_ms: 600.0,
            entering_outer_factor: 1.05,
            proximity_factor: 0.8,

            spawn_interval_ticks: 240,
            max_creatures: 12,
            initial_creatures: 2,
            spawn_offset_max: 100.0,
            spawn_tilt: 0.25,

            jelly_radius_min: 30.0,
            jelly_radius_max: 70.0,
            jelly_speed_min: 0.3,
            jelly_speed_max: 0.9,
            jelly_tentacles_min: 4,
            jelly_tentacles_max: 7,
            jelly_tentacle_length_min: 1.2,
            jelly_tentacle_length_max: 2.0,

            ray_radius_min: 22.0,
            ray_radius_max: 45.0,
            ray_speed_min: 0.6,
            ray_speed_max: 1.4,
            ray_tail_length_min: 1.5,
            ray_tail_length_max: 2.5,

            sway_speed_min: 0.01,
            sway_speed_max: 0.03,
            bob_amplitude: 0.6,
            max_age_min: 400,
            max_age_max: 1200,
            speed_ramp_step: 0.0002,
            speed_ramp_max: 2.5,

            base_pops_per_level: 5,
            pops_per_level_step: 2,
            max_level: 10,
            stingray_level: 2,
            level_size_falloff: 0.08,
            level_speed_gain: 0.1,
        }
    }
}

impl Tuning {
    /// Pops needed to clear `level` (1-based)
    pub fn pops_required(&self, level: u32) -> u32 {
        self.base_pops_per_level + self.pops_per_level_step * level.saturating_sub(1)
    }

    /// Radius multiplier for creatures spawned on `level`
    pub fn level_size_scale(&self, level: u32) -> f32 {
        1.0 / (1.0 + self.level_size_falloff * level.saturating_sub(1) as f32)
    }

    /// Speed multiplier for creatures spawned on `level`
    pub fn level_speed_scale(&self, level: u32) -> f32 {
        1.0 + self.level_speed_gain * level.saturating_sub(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_required_grows() {
        let t = Tuning::default();
        assert_eq!(t.pops_required(1), 5);
        assert_eq!(t.pops_required(2), 7);
        assert_eq!(t.pops_required(10), 23);
    }

    #[test]
    fn test_level_scaling_is_bounded() {
        let t = Tuning::default();
        assert_eq!(t.level_size_scale(1), 1.0);
        assert_eq!(t.level_speed_scale(1), 1.0);
        for level in 2..=t.max_level {
            assert!(t.level_size_scale(level) < t.level_size_scale(level - 1));
            assert!(t.level_size_scale(level) > 0.0);
            assert!(t.level_speed_scale(level) > t.level_speed_scale(level - 1));
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t: Tuning = serde_json::from_str(r#"{"max_creatures": 3}"#).unwrap();
        assert_eq!(t.max_creatures, 3);
        assert_eq!(t.spawn_grace_ms, 140.0);
    }
}
