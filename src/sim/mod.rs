mod input;
mod motion;
mod state;

pub use input::InputCmd;
pub use motion::{MotionParams, slide, step_pose};
pub use state::{GameState, SpawnError, default_spawn};
