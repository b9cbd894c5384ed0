//! Swipe hit detection
//!
//! The tricky part of Jelly Pop: deciding whether one pointer-move sample
//! "pops" a creature. Pointer events arrive at browser cadence, so a fast
//! swipe can jump clean over a small creature between two samples. Two paths
//! lead to a pop:
//!
//! - **Entering**: the previous sample was outside the body and the current
//!   one is well inside. Direction doesn't matter.
//! - **Directed**: the pointer moved far enough and the swipe points at the
//!   creature (dot product of swipe direction and direction to the creature
//!   clears the alignment threshold), ending inside the body.
//!
//! Either way the creature must be past its spawn grace and both the
//! per-creature and global cooldowns must have elapsed. At most one creature
//! pops per sample.

use glam::Vec2;

use super::creature::Creature;
use crate::settings::InteractionSettings;
use crate::tuning::Tuning;
use crate::alignment;

/// One pointer position with its timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pos: Vec2,
    /// Milliseconds on the same clock as the simulation's `now_ms`
    pub time_ms: f64,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, time_ms: f64) -> Self {
        Self {
            pos: Vec2::new(x, y),
            time_ms,
        }
    }
}

/// Why a creature under the pointer did not pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Pointer barely moved and did not enter the body
    BelowMovementThreshold,
    /// Creature spawned too recently
    SpawnGrace,
    /// Swipe did not point at the creature
    Misaligned,
    /// Same creature popped too recently
    PerCreatureCooldown,
    /// Some creature popped too recently
    GlobalCooldown,
}

impl SuppressReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuppressReason::BelowMovementThreshold => "movementThreshold",
            SuppressReason::SpawnGrace => "spawnGrace",
            SuppressReason::Misaligned => "alignment",
            SuppressReason::PerCreatureCooldown => "perCreatureCooldown",
            SuppressReason::GlobalCooldown => "globalCooldown",
        }
    }
}

/// Geometry of one sample relative to one creature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeMetrics {
    /// Pointer displacement since the previous sample
    pub moved: f32,
    pub dist_prev: f32,
    pub dist_now: f32,
    pub body_radius: f32,
    /// Swipe direction · direction from the pointer to the creature
    pub dot: f32,
    pub entering: bool,
    /// Current sample is deep enough inside the body to count
    pub inside: bool,
}

impl SwipeMetrics {
    pub fn measure(prev: Vec2, now: Vec2, creature: &Creature, tuning: &Tuning) -> Self {
        let swipe = now - prev;
        let body_radius = creature.body_radius();
        let dist_prev = prev.distance(creature.pos);
        let dist_now = now.distance(creature.pos);
        let inside = dist_now < body_radius * tuning.proximity_factor;
        // Measure direction from the current sample unless it sits dead on the
        // center, where only the previous sample gives a direction
        let from = if dist_now > 0.0 { now } else { prev };
        Self {
            moved: swipe.length(),
            dist_prev,
            dist_now,
            body_radius,
            dot: alignment(swipe, from, creature.pos),
            entering: dist_prev > body_radius * tuning.entering_outer_factor && inside,
            inside,
        }
    }
}

/// Outcome of evaluating one creature against one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every gate passed
    Pop,
    /// Pointer is inside the body but a gate failed
    Suppressed(SuppressReason),
    /// Not under the pointer, or already popped
    Miss,
}

/// Run every gate for a single creature
pub fn evaluate(
    creature: &Creature,
    prev: Vec2,
    now: Vec2,
    settings: &InteractionSettings,
    tuning: &Tuning,
    now_ms: f64,
    last_global_pop: Option<f64>,
) -> Verdict {
    if creature.is_disappearing() {
        return Verdict::Miss;
    }

    let m = SwipeMetrics::measure(prev, now, creature, tuning);

    // Proximity is required on every path
    if !m.inside {
        return Verdict::Miss;
    }

    let reason = if m.moved < settings.movement_threshold && !m.entering {
        Some(SuppressReason::BelowMovementThreshold)
    } else if now_ms - creature.spawned_at < tuning.spawn_grace_ms {
        Some(SuppressReason::SpawnGrace)
    } else if !m.entering && m.dot < settings.alignment_threshold {
        Some(SuppressReason::Misaligned)
    } else if creature
        .last_hit_at
        .is_some_and(|t| now_ms - t <= tuning.per_creature_cooldown_ms)
    {
        Some(SuppressReason::PerCreatureCooldown)
    } else if last_global_pop.is_some_and(|t| now_ms - t <= settings.global_cooldown_ms) {
        Some(SuppressReason::GlobalCooldown)
    } else {
        None
    };

    match reason {
        None => Verdict::Pop,
        Some(reason) => Verdict::Suppressed(reason),
    }
}

/// Result of scanning all creatures for one sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitScan {
    /// Index into the creature slice of the creature to pop
    pub popped: Option<usize>,
    /// Creatures under the pointer that did not pop, with the first failed gate
    pub suppressed: Vec<(u32, SuppressReason)>,
}

/// Find the creature (if any) popped by moving from `prev` to `now`.
///
/// Settings are sanitized on every call and never stored. With no previous
/// sample there is no swipe and nothing is evaluated. Scanning stops at the
/// first creature that pops.
pub fn scan_for_pop(
    prev: Option<Vec2>,
    now: Vec2,
    creatures: &[Creature],
    settings: &InteractionSettings,
    tuning: &Tuning,
    now_ms: f64,
    last_global_pop: Option<f64>,
) -> HitScan {
    let mut scan = HitScan::default();
    let Some(prev) = prev else {
        return scan;
    };
    let settings = settings.sanitized();

    for (index, creature) in creatures.iter().enumerate() {
        match evaluate(creature, prev, now, &settings, tuning, now_ms, last_global_pop) {
            Verdict::Pop => {
                scan.popped = Some(index);
                break;
            }
            Verdict::Suppressed(reason) => scan.suppressed.push((creature.id, reason)),
            Verdict::Miss => {}
        }
    }
    scan
}
