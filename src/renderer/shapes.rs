//! Drawing routines for particles and creatures

use glam::Vec2;
use std::f32::consts::PI;

use super::Surface;
use crate::consts::TRAIL_WASH_ALPHA;
use crate::sim::{Creature, Particle, SimState, Species};

/// Hover ring around the creature under the pointer
const HOVER_RING: &str = "rgba(255, 255, 255, 0.55)";

/// Draw one frame: translucent wash (motion trails), creatures, then particles on top
pub fn draw_frame(surface: &mut impl Surface, state: &SimState) {
    let size = Vec2::new(state.viewport.width, state.viewport.height);
    surface.set_alpha(1.0);
    surface.fill_rect(
        Vec2::ZERO,
        size,
        &format!("rgba(0, 0, 0, {})", TRAIL_WASH_ALPHA),
    );

    for creature in &state.creatures {
        draw_creature(surface, creature, state.last_pointer);
    }

    for particle in &state.particles {
        draw_particle(surface, particle);
    }
}

pub fn draw_particle(surface: &mut impl Surface, particle: &Particle) {
    if particle.size <= 0.0 {
        return;
    }
    surface.fill_circle(particle.pos, particle.size, &particle.color.to_css());
}

/// Draw a creature at its position, faded by its opacity.
///
/// The hover ring is purely visual; it has nothing to do with hit detection.
pub fn draw_creature(surface: &mut impl Surface, creature: &Creature, pointer: Option<Vec2>) {
    if creature.opacity <= 0.0 || creature.radius <= 0.0 {
        return;
    }

    let hovered = !creature.is_disappearing() && pointer.is_some_and(|p| creature.contains_point(p));

    surface.save();
    surface.translate(creature.pos);
    surface.set_alpha(creature.opacity.clamp(0.0, 1.0));

    if hovered {
        surface.stroke_circle(Vec2::ZERO, creature.body_radius(), 2.0, HOVER_RING);
    }

    match creature.species {
        Species::Jellyfish => draw_jellyfish(surface, creature),
        Species::Stingray => draw_stingray(surface, creature),
    }

    surface.restore();
}

fn draw_jellyfish(surface: &mut impl Surface, c: &Creature) {
    let r = c.radius;
    let color = c.color.to_css();
    let shape = &c.shape;

    // Tentacles first so the bell overlaps their roots
    let n = shape.appendages;
    let spread_div = if n > 1 { (n - 1) as f32 } else { 1.0 };
    let line_width = (r * 0.06).max(1.0);
    for t in 0..n {
        let tf = t as f32;
        let angle = (tf / spread_div - 0.5) * PI * 0.8;
        let length = r * shape.appendage_length * (1.0 + 0.12 * (tf * 1.7).sin());
        let sway = (c.phase * (0.8 + tf * 0.1) + tf).sin() * 8.0;

        let root = Vec2::new(angle.cos() * r * 0.6, angle.sin() * r * 0.5 + r * 0.3);
        let c1 = Vec2::new(root.x + sway * 0.2, r * 0.6 + sway * 0.3);
        let c2 = Vec2::new(angle.cos() * length * 0.3 + sway * 0.4, r * 0.9 + length * 0.4);
        let tip = Vec2::new(angle.cos() * length + sway, r * 1.2 + length);
        surface.stroke_bezier(root, c1, c2, tip, line_width, &color);
    }

    // Bell with a lighter crown
    let bell = Vec2::new(r * shape.width_factor, r * shape.height_factor);
    surface.fill_ellipse(Vec2::ZERO, bell, &color);
    let crown = c.color.lightened().with_alpha(0.35);
    surface.fill_ellipse(Vec2::new(0.0, -r * 0.2), bell * 0.55, &crown.to_css());
}

fn draw_stingray(surface: &mut impl Surface, c: &Creature) {
    let r = c.radius;
    let color = c.color.to_css();
    let shape = &c.shape;

    surface.rotate(c.rotation);

    // Whip tail trailing behind (local -x is backwards)
    let tail_len = r * shape.appendage_length;
    let sway = (c.phase * 1.5).sin() * r * 0.3;
    let root = Vec2::new(-r * shape.height_factor * 0.9, 0.0);
    for i in 0..shape.appendages {
        let offset = (i as f32 - shape.appendages.saturating_sub(1) as f32 * 0.5) * r * 0.15;
        let start = root + Vec2::new(0.0, offset);
        surface.stroke_bezier(
            start,
            start + Vec2::new(-tail_len * 0.3, sway * 0.5),
            start + Vec2::new(-tail_len * 0.7, -sway),
            start + Vec2::new(-tail_len, sway + offset),
            (r * 0.05).max(1.0),
            &color,
        );
    }

    // Short along the heading, wide across it; wings flap by squashing the span
    let flap = 1.0 + 0.12 * (c.phase * 3.0).sin();
    let body = Vec2::new(r * shape.height_factor, r * shape.width_factor * flap);
    surface.fill_ellipse(Vec2::ZERO, body, &color);

    let belly = c.color.lightened().with_alpha(0.3);
    surface.fill_ellipse(Vec2::new(r * 0.15, 0.0), body * 0.6, &belly.to_css());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Hsla, Viewport};

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Save,
        Restore,
        Translate(Vec2),
        Rotate(f32),
        Alpha(f32),
        Rect(String),
        Circle(Vec2, f32),
        Ellipse,
        Ring(f32),
        Bezier,
    }

    #[derive(Default)]
    struct Recorder {
        cmds: Vec<Cmd>,
    }

    impl Surface for Recorder {
        fn save(&mut self) {
            self.cmds.push(Cmd::Save);
        }
        fn restore(&mut self) {
            self.cmds.push(Cmd::Restore);
        }
        fn translate(&mut self, offset: Vec2) {
            self.cmds.push(Cmd::Translate(offset));
        }
        fn rotate(&mut self, radians: f32) {
            self.cmds.push(Cmd::Rotate(radians));
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.cmds.push(Cmd::Alpha(alpha));
        }
        fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, color: &str) {
            self.cmds.push(Cmd::Rect(color.to_string()));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, _color: &str) {
            self.cmds.push(Cmd::Circle(center, radius));
        }
        fn fill_ellipse(&mut self, _center: Vec2, _radii: Vec2, _color: &str) {
            self.cmds.push(Cmd::Ellipse);
        }
        fn stroke_circle(&mut self, _center: Vec2, radius: f32, _width: f32, _color: &str) {
            self.cmds.push(Cmd::Ring(radius));
        }
        fn stroke_bezier(&mut self, _: Vec2, _: Vec2, _: Vec2, _: Vec2, _: f32, _: &str) {
            self.cmds.push(Cmd::Bezier);
        }
    }

    fn jelly(pos: Vec2) -> Creature {
        let mut c = Creature::new(1, Species::Jellyfish, pos, 20.0, Vec2::X, 1.0, 0.0);
        c.shape.appendages = 5;
        c
    }

    #[test]
    fn test_jellyfish_draws_tentacles_and_bell() {
        let mut rec = Recorder::default();
        draw_creature(&mut rec, &jelly(Vec2::new(50.0, 60.0)), None);
        assert_eq!(rec.cmds.first(), Some(&Cmd::Save));
        assert_eq!(rec.cmds.last(), Some(&Cmd::Restore));
        assert!(rec.cmds.contains(&Cmd::Translate(Vec2::new(50.0, 60.0))));
        assert_eq!(rec.cmds.iter().filter(|c| **c == Cmd::Bezier).count(), 5);
        assert_eq!(rec.cmds.iter().filter(|c| **c == Cmd::Ellipse).count(), 2);
        assert!(!rec.cmds.iter().any(|c| matches!(c, Cmd::Ring(_))));
    }

    #[test]
    fn test_hover_ring_only_when_pointer_inside() {
        let c = jelly(Vec2::new(100.0, 100.0));
        let mut rec = Recorder::default();
        draw_creature(&mut rec, &c, Some(Vec2::new(105.0, 100.0)));
        assert!(rec.cmds.contains(&Cmd::Ring(c.body_radius())));

        let mut rec = Recorder::default();
        draw_creature(&mut rec, &c, Some(Vec2::new(300.0, 100.0)));
        assert!(!rec.cmds.iter().any(|c| matches!(c, Cmd::Ring(_))));

        let mut popped = c.clone();
        popped.pop(0.0);
        let mut rec = Recorder::default();
        draw_creature(&mut rec, &popped, Some(Vec2::new(105.0, 100.0)));
        assert!(!rec.cmds.iter().any(|c| matches!(c, Cmd::Ring(_))));
    }

    #[test]
    fn test_stingray_is_rotated() {
        let mut c = Creature::new(2, Species::Stingray, Vec2::ZERO, 20.0, Vec2::Y, 1.0, 0.0);
        c.rotation = 1.0;
        let mut rec = Recorder::default();
        draw_creature(&mut rec, &c, None);
        assert!(rec.cmds.contains(&Cmd::Rotate(1.0)));
        assert_eq!(rec.cmds.iter().filter(|c| **c == Cmd::Bezier).count(), 1);
    }

    #[test]
    fn test_tailless_stingray_draws_body_only() {
        let mut c = Creature::new(3, Species::Stingray, Vec2::ZERO, 20.0, Vec2::X, 1.0, 0.0);
        c.shape.appendages = 0;
        let mut rec = Recorder::default();
        draw_creature(&mut rec, &c, None);
        assert!(!rec.cmds.contains(&Cmd::Bezier));
        assert_eq!(rec.cmds.iter().filter(|c| **c == Cmd::Ellipse).count(), 2);
    }

    #[test]
    fn test_faded_creature_draws_nothing() {
        let mut c = jelly(Vec2::ZERO);
        c.opacity = 0.0;
        let mut rec = Recorder::default();
        draw_creature(&mut rec, &c, None);
        assert!(rec.cmds.is_empty());
    }

    #[test]
    fn test_frame_order() {
        let mut state = SimState::new(1, Viewport::new(320.0, 240.0));
        state.creatures.clear();
        state.creatures.push(jelly(Vec2::new(10.0, 10.0)));
        state.particles.push(Particle {
            pos: Vec2::new(3.0, 4.0),
            vel: Vec2::ZERO,
            size: 2.0,
            decay: 0.1,
            color: Hsla::new(10.0, 1.0, 0.5, 1.0),
        });

        let mut rec = Recorder::default();
        draw_frame(&mut rec, &state);
        assert_eq!(rec.cmds[1], Cmd::Rect("rgba(0, 0, 0, 0.12)".to_string()));
        // Particles land on top of creatures
        assert_eq!(rec.cmds.last(), Some(&Cmd::Circle(Vec2::new(3.0, 4.0), 2.0)));
    }
}
