//! Player motion over the grid.
//!
//! * Translation is split into slices of at most `MAX_SLICE` cells, so a
//!   long frame cannot tunnel through a wall.
//! * Each slice moves x then y; a blocked axis is dropped and the other
//!   one still applies, which gives wall sliding.

use glam::DVec2;

use super::InputCmd;
use crate::world::{GridMap, Pose};

/// Longest single collision-checked step, in cells.
const MAX_SLICE: f64 = 0.25;

/// Upper bound on slices per move.
const MAX_SLICES: usize = 4096;

/// Longest distance one call may cover; longer moves are shortened so no
/// slice exceeds `MAX_SLICE`.
const MAX_TRAVEL: f64 = MAX_SLICES as f64 * MAX_SLICE;

/// Speeds and body size used by [`step_pose`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    /// cells / second
    pub move_speed: f64,
    /// radians / second
    pub rot_speed: f64,
    /// Clearance kept from walls along the axis of travel, in cells.
    pub radius: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            rot_speed: 2.5,
            radius: 0.2,
        }
    }
}

/// Advance `pose` by `dt` seconds of input `cmd`.
pub fn step_pose(pose: &Pose, map: &GridMap, cmd: InputCmd, dt: f64, params: &MotionParams) -> Pose {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut next = *pose;

    /* translate along the current heading ---------------------------------*/
    let wish = next.dir.normalize_or_zero() * cmd.forward() + next.right() * cmd.strafe();
    let delta = wish.normalize_or_zero() * params.move_speed * dt;
    next.pos = slide(map, next.pos, delta, params.radius);

    /* then turn -----------------------------------------------------------*/
    let turn = cmd.turn();
    if turn != 0.0 {
        next.rotate(turn * params.rot_speed * dt);
    }
    next
}

/// Move `pos` by `delta`, cancelling per-axis components that would enter a
/// wall (or come closer than `radius` to one). Moves longer than
/// `MAX_TRAVEL` cells are cut to that length.
pub fn slide(map: &GridMap, mut pos: DVec2, delta: DVec2, radius: f64) -> DVec2 {
    if !delta.is_finite() || delta == DVec2::ZERO {
        return pos;
    }
    let delta = delta.clamp_length_max(MAX_TRAVEL);
    let slices = ((delta.abs().max_element() / MAX_SLICE).ceil() as usize).clamp(1, MAX_SLICES);
    let step = delta / slices as f64;
    let radius = radius.max(0.0);

    for _ in 0..slices {
        if step.x != 0.0 {
            let nx = pos.x + step.x;
            let edge = nx + step.x.signum() * radius;
            if map.is_open_at(DVec2::new(nx, pos.y)) && map.is_open_at(DVec2::new(edge, pos.y)) {
                pos.x = nx;
            }
        }
        if step.y != 0.0 {
            let ny = pos.y + step.y;
            let edge = ny + step.y.signum() * radius;
            if map.is_open_at(DVec2::new(pos.x, ny)) && map.is_open_at(DVec2::new(pos.x, edge)) {
                pos.y = ny;
            }
        }
    }
    pos
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
