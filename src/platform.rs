//! minifb glue: keyboard → [`InputCmd`], frame buffer → window.
//!
//! Controls  W/S or ↑/↓ move · A/D strafe · ←/→ turn · M minimap ·
//! T textures · Esc quit

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::{renderer::Rgba, sim::InputCmd};

/// Held keys and the movement bit each one sets.
const HELD: [(Key, InputCmd); 8] = [
    (Key::W, InputCmd::MOVE_FORWARD),
    (Key::Up, InputCmd::MOVE_FORWARD),
    (Key::S, InputCmd::MOVE_BACK),
    (Key::Down, InputCmd::MOVE_BACK),
    (Key::A, InputCmd::STRAFE_LEFT),
    (Key::D, InputCmd::STRAFE_RIGHT),
    (Key::Left, InputCmd::TURN_LEFT),
    (Key::Right, InputCmd::TURN_RIGHT),
];

/// Keys that act once per press.
const PRESSED: [(Key, InputCmd); 3] = [
    (Key::M, InputCmd::TOGGLE_MINIMAP),
    (Key::T, InputCmd::TOGGLE_TEXTURED),
    (Key::Escape, InputCmd::QUIT),
];

pub fn open_window(title: &str, width: usize, height: usize, fps: usize) -> Result<Window, minifb::Error> {
    let mut win = Window::new(title, width, height, WindowOptions::default())?;
    win.set_target_fps(fps);
    Ok(win)
}

/// Sample the keyboard once for this frame.
pub fn poll_input(win: &Window) -> InputCmd {
    let mut cmd = keys_to_cmd(
        |k| win.is_key_down(k),
        |k| win.is_key_pressed(k, KeyRepeat::No),
    );
    if !win.is_open() {
        cmd |= InputCmd::QUIT;
    }
    cmd
}

/// Hand a finished frame to the window.
pub fn present(win: &mut Window, fb: &[Rgba], width: usize, height: usize) -> Result<(), minifb::Error> {
    win.update_with_buffer(fb, width, height)
}

fn keys_to_cmd(down: impl Fn(Key) -> bool, pressed: impl Fn(Key) -> bool) -> InputCmd {
    let held = HELD
        .iter()
        .filter(|(k, _)| down(*k))
        .fold(InputCmd::empty(), |acc, &(_, bit)| acc | bit);
    PRESSED
        .iter()
        .filter(|(k, _)| pressed(*k))
        .fold(held, |acc, &(_, bit)| acc | bit)
}
