mod grid;
mod pose;
mod texture;

pub use grid::{Cell, GridError, GridMap, OPEN};

pub use pose::Pose;

pub use texture::{NO_TEXTURE, Texture, TextureAtlas, TextureError, TextureId};
