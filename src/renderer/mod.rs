//! Rendering module
//!
//! Draws the simulation onto any `Surface`. On the web that is a Canvas 2D
//! context; tests use a recorder. The renderer only reads state.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use shapes::{draw_creature, draw_frame, draw_particle};

use glam::Vec2;

/// Minimal 2D drawing surface, in CSS pixels.
///
/// Mirrors the subset of the Canvas 2D API the renderer uses. Implementations
/// swallow their own failures; a failed draw call must never affect the
/// simulation.
pub trait Surface {
    /// Push the current transform/alpha
    fn save(&mut self);
    /// Pop back to the last `save`
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn set_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: &str);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: &str);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: &str);
    /// Cubic Bézier stroke with round caps
    fn stroke_bezier(&mut self, from: Vec2, c1: Vec2, c2: Vec2, to: Vec2, width: f32, color: &str);
}
