//! Grid-map ray-casting maze renderer.
//!
//! * `world`    – grid map, player pose, texture atlas
//! * `engine`   – DDA ray casting and column compositing
//! * `renderer` – frame-buffer back-end
//! * `overlay`  – minimap and rain
//! * `sim`      – input commands, motion with collision, frame state
//! * `assets`   – map and texture loaders
//! * `platform` – window and keyboard (minifb)

pub mod assets;
pub mod config;
pub mod engine;
pub mod overlay;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod world;
