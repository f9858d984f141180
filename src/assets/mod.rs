//! Startup loaders. Everything here runs once, before the frame loop.

mod map;
mod textures;

pub use map::{MapError, load_map, parse_map};
pub use textures::{
    export_textures, load_textures, raw_texture_path, texture_path, write_texture,
};
