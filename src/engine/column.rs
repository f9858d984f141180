//! Column compositor: turns one [`RayHit`] into one screen column.
//!
//! Works on a single column slice (`len == screen height`), so columns can be
//! filled in any order or on different threads.

use crate::{
    engine::raycast::{HitKind, RayHit, Side},
    renderer::Rgba,
    world::{Pose, Texture, TextureAtlas, TextureId},
};

/// Upper bound on a projected wall, in screen heights.
const MAX_LINE_SCREENS: i64 = 1024;

/// Textures used by the floor-casting pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surfaces {
    pub floor: TextureId,
    pub ceiling: TextureId,
}

/// Per-frame drawing options shared by every column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnStyle {
    /// Multiplier applied to y-side walls (0 = black, 1 = unshaded).
    pub side_shade: f32,
    pub ceiling: Rgba,
    pub floor: Rgba,
    /// Sample wall textures; flat colours per id when false.
    pub textured: bool,
    /// Floor-cast textured floor/ceiling; flat fill when `None`.
    pub surfaces: Option<Surfaces>,
}

impl Default for ColumnStyle {
    fn default() -> Self {
        Self {
            side_shade: 0.5,
            ceiling: 0x00_383838,
            floor: 0x00_707070,
            textured: true,
            surfaces: None,
        }
    }
}

/// Vertical extent of a projected wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stripe {
    pub line_height: i64,
    pub draw_start: usize,
    pub draw_end: usize,
}

/// Project a wall at perpendicular `distance` onto a screen `height` px tall.
///
/// `draw_start <= draw_end`, both inside `0 .. height` (for `height >= 1`).
pub fn stripe(distance: f64, height: usize) -> Stripe {
    let h = height.max(1) as i64;
    let line_height = if distance > 0.0 && distance.is_finite() {
        let lh = (h as f64 / distance).floor();
        (lh.min((h * MAX_LINE_SCREENS) as f64)) as i64
    } else {
        h
    };

    let draw_start = (-line_height / 2 + h / 2).max(0);
    let draw_end = (line_height / 2 + h / 2).min(h - 1);

    Stripe {
        line_height,
        draw_start: draw_start as usize,
        draw_end: draw_end as usize,
    }
}

/// Texture row for screen row `y` of a stripe.
#[inline]
pub fn tex_row(y: usize, height: usize, line_height: i64, tex_size: usize) -> usize {
    if line_height <= 0 || tex_size == 0 {
        return 0;
    }
    let h = height as i64;
    let d = y as i64 - h / 2 + line_height / 2;
    (d * tex_size as i64 / line_height).clamp(0, tex_size as i64 - 1) as usize
}

/// Texture column for wall coordinate `u`.
#[inline]
pub fn tex_col(u: f64, tex_size: usize) -> usize {
    if tex_size == 0 || !u.is_finite() {
        return 0;
    }
    ((u * tex_size as f64).floor().max(0.0) as usize).min(tex_size - 1)
}

/// Scale each channel of `c` by `factor`.
#[inline]
pub fn shade(c: Rgba, factor: f32) -> Rgba {
    let ch = |v: u32| ((v & 0xFF) as f32 * factor).clamp(0.0, 255.0) as u32;
    ch(c >> 16) << 16 | ch(c >> 8) << 8 | ch(c)
}

/// Flat colour for a wall code (untextured mode, minimap).
pub fn flat_colour(id: TextureId) -> Rgba {
    const PALETTE: [Rgba; 6] = [
        0x00_C03030, // red
        0x00_30A030, // green
        0x00_3050C0, // blue
        0x00_E0E0E0, // white
        0x00_D0C030, // yellow
        0x00_A040B0, // purple
    ];
    if id == 0 {
        return 0x00_808080;
    }
    PALETTE[(id as usize - 1) % PALETTE.len()]
}

/// Fill one screen column (`column.len()` = screen height).
pub fn draw_column(
    column: &mut [Rgba],
    hit: &RayHit,
    pose: &Pose,
    atlas: &TextureAtlas,
    style: &ColumnStyle,
) {
    let h = column.len();
    if h == 0 {
        return;
    }

    /* background only ------------------------------------------------------*/
    if hit.kind == HitKind::Miss {
        fill_background(column, h / 2, h / 2, h / 2, hit, pose, atlas, style);
        return;
    }

    let s = stripe(hit.distance, h);

    /* wall ----------------------------------------------------------------*/
    if style.textured {
        let tex = atlas.texture_or_missing(hit.tex_id);
        let tx = tex_col(hit.u, tex.size);
        for (y, px) in column
            .iter_mut()
            .enumerate()
            .take(s.draw_end + 1)
            .skip(s.draw_start)
        {
            let ty = tex_row(y, h, s.line_height, tex.size);
            *px = side_shaded(tex.texel(tx, ty), hit.side, style.side_shade);
        }
    } else {
        let c = side_shaded(flat_colour(hit.tex_id), hit.side, style.side_shade);
        column[s.draw_start..=s.draw_end].fill(c);
    }

    fill_background(column, s.draw_start, s.draw_end + 1, h / 2, hit, pose, atlas, style);
}

#[inline]
fn side_shaded(c: Rgba, side: Side, factor: f32) -> Rgba {
    match side {
        Side::X => c,
        Side::Y => shade(c, factor),
    }
}

/// Ceiling over `0 .. ceil_end`, floor over `floor_start .. h`.
#[allow(clippy::too_many_arguments)]
fn fill_background(
    column: &mut [Rgba],
    ceil_end: usize,
    floor_start: usize,
    horizon: usize,
    hit: &RayHit,
    pose: &Pose,
    atlas: &TextureAtlas,
    style: &ColumnStyle,
) {
    let h = column.len();
    let ceil_end = ceil_end.min(h);
    let floor_start = floor_start.min(h);

    let surfaces = match style.surfaces {
        Some(s) if style.textured => s,
        _ => {
            column[..ceil_end].fill(style.ceiling);
            column[floor_start..].fill(style.floor);
            return;
        }
    };

    let floor_tex = atlas.texture_or_missing(surfaces.floor);
    let ceil_tex = atlas.texture_or_missing(surfaces.ceiling);
    let eye = h as f64 * 0.5;

    // The floor point seen at row `horizon + p` is also the ceiling point
    // seen at row `horizon - p`.
    for (y, px) in column.iter_mut().enumerate().take(ceil_end) {
        let p = horizon as i64 - y as i64;
        *px = cast_surface(p, eye, hit, pose, ceil_tex).unwrap_or(style.ceiling);
    }
    for (y, px) in column.iter_mut().enumerate().skip(floor_start) {
        let p = y as i64 - horizon as i64;
        *px = cast_surface(p, eye, hit, pose, floor_tex).unwrap_or(style.floor);
    }
}

/// Sample a horizontal surface `p` rows away from the horizon.
#[inline]
fn cast_surface(
    p: i64,
    eye: f64,
    hit: &RayHit,
    pose: &Pose,
    tex: &Texture,
) -> Option<Rgba> {
    if p <= 0 {
        return None;
    }
    let row_distance = eye / p as f64;
    let world = pose.pos + hit.ray_dir * row_distance;
    if !world.is_finite() {
        return None;
    }
    let frac = world - world.floor();
    let size = tex.size as f64;
    let tx = (frac.x * size) as usize;
    let ty = (frac.y * size) as usize;
    Some(tex.texel(tx, ty))
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
