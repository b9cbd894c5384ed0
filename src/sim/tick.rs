//! Frame tick and pointer handling
//!
//! `tick` advances everything by one animation frame. `pointer_move` handles
//! one pointer sample: trail particles plus hit detection. The two interleave
//! freely on the same thread.

use super::gesture::{PointerSample, scan_for_pop};
use super::particle::Particle;
use super::state::{GameEvent, LevelProgress, SimPhase, SimState};
use crate::settings::InteractionSettings;

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState, now_ms: f64) {
    if state.phase == SimPhase::Paused {
        return;
    }

    state.now_ms = now_ms;
    state.time_ticks += 1;

    state.speed_ramp = (state.speed_ramp + state.tuning.speed_ramp_step)
        .min(state.tuning.speed_ramp_max.max(1.0));

    // Creatures: move, then cull
    let ramp = state.speed_ramp;
    for creature in &mut state.creatures {
        creature.update(ramp, &state.tuning);
    }
    let viewport = state.viewport;
    let tuning = &state.tuning;
    state.creatures.retain(|c| match c.removal_cause(viewport, tuning) {
        Some(cause) => {
            log::debug!("Removed {} #{} ({:?})", c.species.as_str(), c.id, cause);
            false
        }
        None => true,
    });

    // Level progression
    if state.phase == SimPhase::Running && state.progress.is_cleared() {
        if state.progress.level >= state.tuning.max_level {
            state.phase = SimPhase::Won;
            state.emit(GameEvent::GameWon);
            log::info!(
                "All {} levels cleared ({} pops)",
                state.tuning.max_level,
                state.progress.total_pops
            );
        } else {
            let next = state.progress.level + 1;
            start_level(state, next);
        }
    }

    // Timed spawns
    if state.spawner.advance(&state.tuning) {
        state.try_spawn();
    }

    // Particles: move, shrink, cull
    let epsilon = state.tuning.particle_epsilon;
    for particle in &mut state.particles {
        particle.update();
    }
    state.particles.retain(|p| !p.is_dead(epsilon));
}

/// Handle one pointer sample. Returns the id of the creature popped, if any.
///
/// `settings` is read fresh on every call. Ignored while paused.
pub fn pointer_move(
    state: &mut SimState,
    sample: PointerSample,
    settings: &InteractionSettings,
) -> Option<u32> {
    if state.phase == SimPhase::Paused {
        return None;
    }

    let now_ms = sample.time_ms;
    state.now_ms = now_ms;
    let prev = state.last_pointer.replace(sample.pos);

    // Trail
    let tuning = state.tuning.clone();
    let trail: Vec<Particle> = (0..state.trail_per_sample)
        .map(|_| Particle::trail(sample.pos, &tuning, state.rng()))
        .collect();
    state.push_particles(trail);

    if state.phase != SimPhase::Running {
        return None;
    }

    let scan = scan_for_pop(
        prev,
        sample.pos,
        &state.creatures,
        settings,
        &state.tuning,
        now_ms,
        state.last_global_pop,
    );

    for (id, reason) in scan.suppressed {
        log::debug!("Pop of #{} suppressed: {}", id, reason.as_str());
        state.emit(GameEvent::ChimeSuppressed { id, reason });
    }

    let index = scan.popped?;
    let creature = &mut state.creatures[index];
    if !creature.pop(now_ms) {
        return None;
    }
    let (id, pos, color) = (creature.id, creature.pos, creature.color);

    state.last_global_pop = Some(now_ms);
    let burst = Particle::burst(pos, color, &tuning, state.rng());
    state.push_particles(burst);

    state.progress.pops_this_level += 1;
    state.progress.total_pops += 1;
    log::info!(
        "Popped #{} ({}/{} on level {})",
        id,
        state.progress.pops_this_level,
        state.progress.pops_required,
        state.progress.level
    );
    state.emit(GameEvent::Popped { id, pos, color });

    Some(id)
}

/// Stop ticking and ignore pointer input until resumed
pub fn pause(state: &mut SimState) {
    if state.phase == SimPhase::Paused {
        return;
    }
    state.resume_phase = state.phase;
    state.phase = SimPhase::Paused;
    state.emit(GameEvent::Paused);
    log::info!("Paused");
}

/// Resume after a pause. Missed frames are not replayed.
pub fn resume(state: &mut SimState) {
    if state.phase != SimPhase::Paused {
        return;
    }
    // A threshold crossed just before pausing is picked up by the next tick
    state.phase = state.resume_phase;
    // The pointer may have moved anywhere meanwhile; don't treat that as a swipe
    reset_pointer(state);
    state.emit(GameEvent::Resumed);
    log::info!("Resumed");
}

/// Toggle between paused and running. Returns true if now paused.
pub fn toggle_pause(state: &mut SimState) -> bool {
    if state.phase == SimPhase::Paused {
        resume(state);
        false
    } else {
        pause(state);
        true
    }
}

/// Jump straight to a level (clamped to the valid range)
pub fn skip_to_level(state: &mut SimState, level: u32) {
    let level = level.clamp(1, state.tuning.max_level.max(1));
    if state.phase == SimPhase::Won {
        state.phase = SimPhase::Running;
    }
    state.resume_phase = SimPhase::Running;
    start_level(state, level);
}

/// Forget the last pointer position, so the next sample starts a new swipe.
///
/// Call when a touch begins or ends or the pointer leaves the canvas.
pub fn reset_pointer(state: &mut SimState) {
    state.last_pointer = None;
}

/// Turn creature spawning on or off. Turning off clears the live set;
/// turning on spawns one immediately.
pub fn set_creatures_enabled(state: &mut SimState, enabled: bool) {
    if state.creatures_enabled == enabled {
        return;
    }
    state.creatures_enabled = enabled;
    if enabled {
        state.spawner.reset();
        state.try_spawn();
    } else {
        state.creatures.clear();
    }
    log::info!("Creatures {}", if enabled { "enabled" } else { "disabled" });
}

/// Clear the board and start `level`
fn start_level(state: &mut SimState, level: u32) {
    let total_pops = state.progress.total_pops;
    state.progress = LevelProgress {
        total_pops,
        ..LevelProgress::new(level, &state.tuning)
    };
    state.creatures.clear();
    state.seed_level();
    state.emit(GameEvent::LevelAdvanced { level });
    log::info!(
        "Level {} ({} pops to clear)",
        level,
        state.progress.pops_required
    );
}
