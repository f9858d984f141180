//! Ray-casting core: DDA hits per column, then textured column fill.

mod column;
#[allow(clippy::module_inception)]
mod engine;
mod raycast;

pub use column::{
    ColumnStyle, Stripe, Surfaces, draw_column, flat_colour, shade, stripe, tex_col, tex_row,
};
pub use engine::Engine;
pub use raycast::{HitKind, MAX_DISTANCE, RayHit, Side, camera_x, cast_all, cast_column, cast_ray};
