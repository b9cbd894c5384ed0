//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per animation frame, timestamps passed in
//! - Seeded RNG only
//! - Stable iteration order (creatures in spawn order)
//! - No rendering or platform dependencies

pub mod color;
pub mod creature;
pub mod gesture;
pub mod particle;
pub mod spawner;
pub mod state;
pub mod tick;

pub use color::Hsla;
pub use creature::{Creature, CreatureShape, Lifecycle, RemovalCause, Species};
pub use gesture::{HitScan, PointerSample, SuppressReason, SwipeMetrics, Verdict, evaluate, scan_for_pop};
pub use particle::Particle;
pub use spawner::{EntrySide, SpawnContext, Spawner, build_creature};
pub use state::{GameEvent, LevelProgress, SimPhase, SimState, Viewport};
pub use tick::{
    pause, pointer_move, reset_pointer, resume, set_creatures_enabled, skip_to_level, tick,
    toggle_pause,
};
