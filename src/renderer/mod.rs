//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! The raycaster produces one [`RayHit`] per column and hands the batch to a
//! type that implements [`Renderer`]; overlays draw through the same trait.
//!
//! * `begin_frame` clears, `draw_columns` composites the walls,
//!   `end_frame` loans the finished buffer to the presenter.
//! * Primitive helpers (`fill_rect`, `draw_line`) have default bodies built
//!   on `put_pixel`, so a back-end only has to provide storage.

use crate::{
    engine::{ColumnStyle, RayHit},
    world::{Pose, TextureAtlas},
};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Current frame size in pixels.
    fn size(&self) -> (usize, usize);

    /// Whether per-column work may run on the rayon pool. The engine casts
    /// rays the same way the back-end composites them.
    fn parallel(&self) -> bool {
        false
    }

    /// Composite one wall column per hit; `hits[x]` is screen column `x`.
    fn draw_columns(
        &mut self,
        hits: &[RayHit],
        pose: &Pose,
        atlas: &TextureAtlas,
        style: &ColumnStyle,
    );

    /// Write one pixel; coordinates outside the frame are ignored.
    fn put_pixel(&mut self, x: i32, y: i32, colour: Rgba);

    /// Axis-aligned filled rectangle, clipped to the frame.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Rgba) {
        let (fw, fh) = self.size();
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(fw as i32);
        let y1 = y.saturating_add(h).min(fh as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put_pixel(px, py, colour);
            }
        }
    }

    /// Integer Bresenham line, clipped per pixel.
    fn draw_line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put_pixel(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * The slice is row-major, `w * h` pixels.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

pub mod software;

pub use software::Software;
