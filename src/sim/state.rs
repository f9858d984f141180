use glam::DVec2;
use thiserror::Error;

use super::{InputCmd, MotionParams, step_pose};
use crate::{
    overlay::Rain,
    world::{GridMap, Pose},
};

#[derive(Error, Debug, PartialEq)]
pub enum SpawnError {
    #[error("spawn point ({x}, {y}) is outside the {width}×{height} map")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: usize,
        height: usize,
    },

    #[error("spawn point ({x}, {y}) is inside a wall")]
    InWall { x: f64, y: f64 },

    #[error("map has no open cell to spawn in")]
    NoOpenCell,
}

/// Everything the frame loop mutates, owned in one place.
///
/// Components borrow only the pieces they need: the raycaster reads
/// `map` + `pose`, the overlays read `rain` and the toggles.
#[derive(Clone, Debug)]
pub struct GameState {
    pub map: GridMap,
    pub pose: Pose,
    pub rain: Rain,
    pub show_minimap: bool,
    pub textured: bool,
    pub motion: MotionParams,
}

impl GameState {
    /// Fails unless `pose` stands on an open cell of `map`.
    pub fn new(map: GridMap, pose: Pose, rain: Rain, motion: MotionParams) -> Result<Self, SpawnError> {
        check_spawn(&map, pose.pos)?;
        Ok(Self {
            map,
            pose,
            rain,
            show_minimap: true,
            textured: true,
            motion,
        })
    }

    /// Apply one frame of input: toggles first, then motion, then rain.
    pub fn update(&mut self, cmd: InputCmd, dt: f64) {
        if cmd.contains(InputCmd::TOGGLE_MINIMAP) {
            self.show_minimap = !self.show_minimap;
            log::debug!("minimap {}", on_off(self.show_minimap));
        }
        if cmd.contains(InputCmd::TOGGLE_TEXTURED) {
            self.textured = !self.textured;
            log::debug!("textures {}", on_off(self.textured));
        }

        self.pose = step_pose(&self.pose, &self.map, cmd, dt, &self.motion);
        self.rain.update(dt as f32);
    }
}

/// Centre of the first open cell, for maps without an explicit spawn.
pub fn default_spawn(map: &GridMap) -> Result<DVec2, SpawnError> {
    map.first_open_cell()
        .map(|c| c.as_dvec2() + DVec2::splat(0.5))
        .ok_or(SpawnError::NoOpenCell)
}

fn check_spawn(map: &GridMap, p: DVec2) -> Result<(), SpawnError> {
    if map.cell_at(p).is_none() {
        return Err(SpawnError::OutOfBounds {
            x: p.x,
            y: p.y,
            width: map.width(),
            height: map.height(),
        });
    }
    if !map.is_open_at(p) {
        return Err(SpawnError::InWall { x: p.x, y: p.y });
    }
    Ok(())
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}
