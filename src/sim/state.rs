//! Simulation state and core types
//!
//! Everything the frame loop and the pointer handler mutate lives in
//! `SimState`. Both run on the same thread and never overlap, so nothing here
//! needs locking.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::color::Hsla;
use super::creature::Creature;
use super::gesture::SuppressReason;
use super::particle::Particle;
use super::spawner::{SpawnContext, Spawner};
use crate::consts::FIRST_LEVEL;
use crate::settings::QualityPreset;
use crate::tuning::Tuning;

/// Drawable area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Current phase of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Ticking and accepting pointer input
    Running,
    /// Frozen: no ticks, no trail, no hit detection
    Paused,
    /// Final level cleared; creatures drift off, nothing new spawns
    Won,
}

/// Level and pop counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Current level (1-based)
    pub level: u32,
    /// Pops since the level started
    pub pops_this_level: u32,
    /// Pops needed to clear this level
    pub pops_required: u32,
    /// Pops over the whole session
    pub total_pops: u64,
}

impl LevelProgress {
    pub fn new(level: u32, tuning: &Tuning) -> Self {
        Self {
            level,
            pops_this_level: 0,
            pops_required: tuning.pops_required(level),
            total_pops: 0,
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.pops_this_level >= self.pops_required
    }
}

/// Things that happened, for the audio/HUD/log collaborators to consume
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A creature popped: play the chime, bump the score
    Popped { id: u32, pos: Vec2, color: Hsla },
    /// A new level started
    LevelAdvanced { level: u32 },
    /// The last level was cleared
    GameWon,
    /// Diagnostic: the pointer was inside a creature but a gate blocked the pop
    ChimeSuppressed { id: u32, reason: SuppressReason },
    /// Simulation paused; audio should pause too
    Paused,
    /// Simulation resumed
    Resumed,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Engine constants
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: SimPhase,
    /// Phase to return to when a pause ends
    pub resume_phase: SimPhase,
    pub progress: LevelProgress,
    /// Frames ticked while running
    pub time_ticks: u64,
    /// Latest timestamp seen from the frame loop or pointer (ms)
    pub now_ms: f64,
    /// Global speed multiplier, creeping up while running
    pub speed_ramp: f32,
    /// Live creatures (spawn order, ascending id)
    pub creatures: Vec<Creature>,
    /// Visual particles
    pub particles: Vec<Particle>,
    pub spawner: Spawner,
    /// Whether creatures spawn at all
    pub creatures_enabled: bool,
    /// Live particle cap
    pub max_particles: usize,
    /// Trail particles per pointer sample
    pub trail_per_sample: u32,
    /// Last pointer position, if one has been seen since start/resume
    pub last_pointer: Option<Vec2>,
    /// Time of the most recent pop of any creature (ms)
    pub last_global_pop: Option<f64>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl SimState {
    /// Create a new simulation with default tuning and the first level seeded
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self::with_tuning(seed, viewport, Tuning::default())
    }

    /// Create a new simulation with custom tuning
    pub fn with_tuning(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let quality = QualityPreset::default();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            progress: LevelProgress::new(FIRST_LEVEL, &tuning),
            trail_per_sample: trail_count(&tuning, quality),
            tuning,
            viewport,
            phase: SimPhase::Running,
            resume_phase: SimPhase::Running,
            time_ticks: 0,
            now_ms: 0.0,
            speed_ramp: 1.0,
            creatures: Vec::new(),
            particles: Vec::new(),
            spawner: Spawner::new(),
            creatures_enabled: true,
            max_particles: quality.max_particles(),
            last_pointer: None,
            last_global_pop: None,
            events: Vec::new(),
            next_id: 1,
        };

        state.seed_level();

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Apply a quality preset's particle budget
    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.max_particles = quality.max_particles();
        self.trail_per_sample = trail_count(&self.tuning, quality);
        self.cap_particles();
    }

    /// Queue an event for external consumers
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ask the spawner for one creature. No-op at the cap or while disabled.
    pub fn try_spawn(&mut self) -> Option<u32> {
        if !self.creatures_enabled || self.phase == SimPhase::Won {
            return None;
        }
        let ctx = SpawnContext {
            level: self.progress.level,
            viewport: self.viewport,
            now_ms: self.now_ms,
        };
        self.spawner.try_spawn(
            &mut self.creatures,
            &mut self.next_id,
            ctx,
            &self.tuning,
            &mut self.rng,
        )
    }

    /// Populate a fresh level with its opening creatures
    pub fn seed_level(&mut self) {
        self.spawner.reset();
        for _ in 0..self.tuning.initial_creatures {
            if self.try_spawn().is_none() {
                break;
            }
        }
    }

    /// Add particles, dropping the oldest beyond the cap
    pub fn push_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
        self.cap_particles();
    }

    fn cap_particles(&mut self) {
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Look up a live creature by id
    pub fn creature(&self, id: u32) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }
}

fn trail_count(tuning: &Tuning, quality: QualityPreset) -> u32 {
    ((tuning.trail_particles_per_sample as f32 * quality.trail_quality()).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seeds_first_level() {
        let state = SimState::new(42, Viewport::new(800.0, 600.0));
        assert_eq!(state.progress.level, 1);
        assert_eq!(state.progress.pops_required, 5);
        assert_eq!(state.creatures.len(), 2);
        assert_eq!(state.phase, SimPhase::Running);
        assert!(state.creatures.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = SimState::new(7, Viewport::new(800.0, 600.0));
        let b = SimState::new(7, Viewport::new(800.0, 600.0));
        for (ca, cb) in a.creatures.iter().zip(&b.creatures) {
            assert_eq!(ca.pos, cb.pos);
            assert_eq!(ca.radius, cb.radius);
        }
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut state = SimState::new(1, Viewport::new(800.0, 600.0));
        state.set_quality(QualityPreset::Low);
        let cap = state.max_particles;
        let tuning = state.tuning.clone();
        let burst: Vec<Particle> = (0..cap + 10)
            .map(|i| {
                let mut p = Particle::trail(Vec2::ZERO, &tuning, state.rng());
                p.pos.x = i as f32;
                p
            })
            .collect();
        state.push_particles(burst);
        assert_eq!(state.particles.len(), cap);
        assert_eq!(state.particles[0].pos.x, 10.0);
    }

    #[test]
    fn test_drain_events() {
        let mut state = SimState::new(1, Viewport::new(800.0, 600.0));
        state.emit(GameEvent::Paused);
        state.emit(GameEvent::Resumed);
        assert_eq!(state.events().len(), 2);
        assert_eq!(state.drain_events(), vec![GameEvent::Paused, GameEvent::Resumed]);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_disabled_creatures_do_not_spawn() {
        let mut state = SimState::new(1, Viewport::new(800.0, 600.0));
        state.creatures_enabled = false;
        assert_eq!(state.try_spawn(), None);
    }
}
