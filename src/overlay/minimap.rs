//! Top-down minimap drawn over the top-left corner of the frame.
//!
//! Walls come straight from the live [`GridMap`]; nothing is cached between
//! frames.

use crate::{
    engine::flat_colour,
    renderer::{Renderer, Rgba},
    world::{GridMap, OPEN, Pose, TextureId},
};

const OPEN_COLOUR: Rgba = 0x00_181818;
const PLAYER_COLOUR: Rgba = 0x00_FF0000;
const HEADING_COLOUR: Rgba = 0x00_FFFF00;

/// Heading indicator length, in cells.
const HEADING_LEN: f64 = 1.5;

/// What one minimap square shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiniCell {
    Open,
    Wall(TextureId),
    Player,
}

/// Minimap state of map cell `(x, y)` for the current pose.
pub fn cell(map: &GridMap, pose: &Pose, x: i32, y: i32) -> Option<MiniCell> {
    let code = map.cell(x, y)?;
    let player = pose.pos.floor();
    if player.is_finite() && (player.x as i32, player.y as i32) == (x, y) {
        return Some(MiniCell::Player);
    }
    Some(match code {
        OPEN => MiniCell::Open,
        id => MiniCell::Wall(id),
    })
}

/// Draw the map at `scale` pixels per cell plus the heading line.
pub fn draw<R: Renderer>(r: &mut R, map: &GridMap, pose: &Pose, scale: usize) {
    if scale == 0 {
        return;
    }
    let s = scale as i32;
    for (x, y, _) in map.iter() {
        let colour = match cell(map, pose, x, y) {
            Some(MiniCell::Wall(id)) => flat_colour(id),
            Some(MiniCell::Player) => PLAYER_COLOUR,
            Some(MiniCell::Open) | None => OPEN_COLOUR,
        };
        r.fill_rect(x * s, y * s, s, s, colour);
    }

    if !pose.pos.is_finite() || !pose.dir.is_finite() {
        return;
    }
    let scale = scale as f64;
    let eye = pose.pos * scale;
    let tip = (pose.pos + pose.dir.normalize_or_zero() * HEADING_LEN) * scale;
    r.draw_line(
        eye.x as i32,
        eye.y as i32,
        tip.x as i32,
        tip.y as i32,
        HEADING_COLOUR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Software;
    use glam::DVec2;

    fn map() -> GridMap {
        GridMap::bordered(6, 5, 3).unwrap()
    }

    #[test]
    fn cells_follow_the_live_map() {
        let map = map();
        let pose = Pose::new(DVec2::new(2.7, 3.1), DVec2::X, 0.66);
        assert_eq!(cell(&map, &pose, 0, 0), Some(MiniCell::Wall(3)));
        assert_eq!(cell(&map, &pose, 1, 1), Some(MiniCell::Open));
        assert_eq!(cell(&map, &pose, 2, 3), Some(MiniCell::Player));
        assert_eq!(cell(&map, &pose, 6, 0), None);
    }

    #[test]
    fn draws_walls_and_player() {
        let map = map();
        let pose = Pose::new(DVec2::new(2.5, 2.5), DVec2::NEG_Y, 0.66);
        let mut sw = Software::default();
        sw.begin_frame(64, 64);
        draw(&mut sw, &map, &pose, 4);

        assert_eq!(sw.pixel(1, 1), Some(flat_colour(3)));
        assert_eq!(sw.pixel(5, 5), Some(OPEN_COLOUR));
        // player cell (2, 2); heading line points up, away from this corner
        assert_eq!(sw.pixel(11, 11), Some(PLAYER_COLOUR));
        assert_eq!(sw.pixel(10, 6), Some(HEADING_COLOUR));
        // nothing past the map
        assert_eq!(sw.pixel(30, 30), Some(0x00_202020));
    }
}
