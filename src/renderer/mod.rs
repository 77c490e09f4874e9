//! Rendering abstraction layer.
//!
//! *The geometry core never touches a pixel buffer.* The render pass only
//! sees level contents through the read-only [`Drawable`] accessors and
//! receives the [`TextureBank`] explicitly; nothing reaches for a global.
//!
//! [`RendererExt::draw_level`] paints a whole level back-to-front:
//! layers, blocks, edges, portals, then moving bodies.

use crate::world::{Drawable, Edge, Hitbox, Level, Portal, TextureBank, Tile};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Paint a floor/block tile at `opacity` (0 = invisible, 1 = opaque).
    fn draw_tile(&mut self, tile: &Tile, opacity: f32, bank: &TextureBank);

    /// Paint a wall segment.
    fn draw_edge(&mut self, edge: &Edge, bank: &TextureBank);

    /// Paint a portal; unplaced (sentinel) portals draw nothing.
    fn draw_portal(&mut self, portal: &Portal);

    /// Paint a moving body's hitbox.
    fn draw_body(&mut self, body: &Hitbox);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl painting a whole level in one call.
pub trait RendererExt: Renderer {
    fn draw_level(&mut self, level: &Level, bodies: &[Hitbox], bank: &TextureBank) {
        for layer in &level.layers {
            for tile in &layer.tiles {
                self.draw_tile(tile, layer.opacity, bank);
            }
        }
        for block in &level.blocks {
            self.draw_tile(block, 1.0, bank);
        }
        for edge in &level.edges {
            self.draw_edge(edge, bank);
        }
        for portal in level.portals() {
            if !portal.kind().is_sentinel() {
                self.draw_portal(portal);
            }
        }
        for body in bodies {
            self.draw_body(body);
        }
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::Software;
