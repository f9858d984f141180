//! Overlays drawn after the wall pass; none of them read ray hits.

pub mod minimap;
pub mod rain;

pub use minimap::MiniCell;
pub use rain::{Rain, RainDrop};
