//! Walk a grid maze in a first-person ray-cast view.
//!
//! ```bash
//! cargo run --release -- maps/demo.map
//! cargo run --release -- maps/demo.map --textures tex/ --floor-casting --parallel
//! ```
//!
//! Controls  W/S or ↑/↓ move · A/D strafe · ←/→ turn · M minimap ·
//! T textures · Esc quit

use anyhow::Context;
use clap::Parser;
use glam::DVec2;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use mazecast::{
    assets::{export_textures, load_map, load_textures},
    config::Settings,
    engine::Engine,
    overlay::Rain,
    platform::{self, open_window, poll_input},
    renderer::Software,
    sim::{GameState, InputCmd, default_spawn},
    world::{NO_TEXTURE, Pose, TextureAtlas, TextureId},
};

/// Longest simulated step, in seconds.
const MAX_DT: f64 = 0.1;

#[derive(Parser, Debug)]
#[command(name = "mazecast", version, about = "Grid-map ray-casting maze renderer")]
struct Cli {
    /// Map file: rows of whitespace-separated cell codes, 0 = open.
    map: PathBuf,

    /// Directory of `<id>.png` (or raw `<id>.argb`) textures; generated
    /// patterns when omitted.
    #[arg(long)]
    textures: Option<PathBuf>,

    /// Write the atlas as `<id>.png` files into DIR and exit.
    #[arg(long, value_name = "DIR")]
    export_textures: Option<PathBuf>,

    /// Start position `x,y` in cells; centre of the first open cell by default.
    #[arg(long, value_parser = parse_point)]
    spawn: Option<DVec2>,

    /// Initial heading in degrees, 0 = +x, 90 = +y (down the map).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    heading: f64,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Camera plane ratio (0.66 ≈ 66° FOV).
    #[arg(long)]
    fov: Option<f64>,

    /// Cast and composite columns on all cores.
    #[arg(long)]
    parallel: bool,

    /// Textured floor and ceiling instead of flat fills.
    #[arg(long)]
    floor_casting: bool,

    /// Number of rain drops (0 disables).
    #[arg(long)]
    rain: Option<usize>,

    /// Rain RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with flat-coloured walls.
    #[arg(long)]
    untextured: bool,

    /// Start with the minimap hidden.
    #[arg(long)]
    no_minimap: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        let d = Settings::default();
        Settings {
            width: self.width.unwrap_or(d.width),
            height: self.height.unwrap_or(d.height),
            fov_ratio: self.fov.unwrap_or(d.fov_ratio),
            parallel: self.parallel,
            floor_casting: self.floor_casting,
            rain_count: self.rain.unwrap_or(d.rain_count),
            seed: self.seed.unwrap_or(d.seed),
            ..d
        }
    }
}

fn parse_point(s: &str) -> Result<DVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("`{v}`: {e}"))
    };
    Ok(DVec2::new(coord(x)?, coord(y)?))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = cli.settings();
    settings.validate().context("invalid settings")?;

    // ─────────── map & textures ────────────
    let map = load_map(&cli.map).with_context(|| format!("loading map `{}`", cli.map.display()))?;

    let mut ids: Vec<TextureId> = map.texture_ids();
    ids.extend(settings.surface_ids());
    ids.sort_unstable();
    ids.dedup();

    let atlas = match &cli.textures {
        Some(dir) => load_textures(dir, &ids, settings.texture_size)
            .with_context(|| format!("loading textures from `{}`", dir.display()))?,
        None => {
            log::info!("using generated textures for ids {ids:?}");
            TextureAtlas::procedural(&ids, settings.texture_size)
        }
    };
    for &id in &ids {
        if id == NO_TEXTURE || atlas.texture(id).is_err() {
            log::warn!("texture id {id} has no image, drawing the checkerboard");
        }
    }

    if let Some(dir) = &cli.export_textures {
        let n = export_textures(dir, &atlas)
            .with_context(|| format!("exporting textures to `{}`", dir.display()))?;
        log::info!("wrote {n} textures to `{}`", dir.display());
        return Ok(());
    }

    // ─────────── player & state ────────────
    let spawn = match cli.spawn {
        Some(p) => p,
        None => default_spawn(&map)?,
    };
    let heading = DVec2::from_angle(cli.heading.to_radians());
    let pose = Pose::new(spawn, heading, settings.fov_ratio);
    log::info!(
        "spawn at ({:.2}, {:.2}), heading {:.0}°, fov {:.0}°",
        pose.pos.x,
        pose.pos.y,
        cli.heading,
        pose.fov().to_degrees()
    );

    let rain = Rain::new(
        settings.rain_count,
        settings.width,
        settings.height,
        settings.rain_speed,
        settings.seed,
    );
    let mut state = GameState::new(map, pose, rain, settings.motion()).context("invalid spawn")?;
    state.textured = !cli.untextured;
    state.show_minimap = !cli.no_minimap;

    let mut engine = Engine::new(Software::new(settings.parallel), atlas, &settings);

    let mut win = open_window("mazecast", settings.width, settings.height, settings.target_fps)
        .context("opening window")?;

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_frame = Instant::now();

    loop {
        let cmd = poll_input(&win);
        if cmd.contains(InputCmd::QUIT) {
            break;
        }

        let now = Instant::now();
        let dt = (now - last_frame).as_secs_f64().min(MAX_DT);
        last_frame = now;
        state.update(cmd, dt);

        let t0 = Instant::now();
        let mut presented = Ok(());
        engine.render_frame(&state, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            presented = platform::present(&mut win, fb, w, h);
        });
        presented.context("presenting frame")?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            log::info!("avg render: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }

    log::info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overlays_defaults() {
        let cli = Cli::parse_from([
            "mazecast",
            "demo.map",
            "--spawn",
            "2.5, 3.5",
            "--heading",
            "-90",
            "--rain",
            "0",
            "--parallel",
        ]);
        assert_eq!(cli.spawn, Some(DVec2::new(2.5, 3.5)));
        assert_eq!(cli.heading, -90.0);

        let s = cli.settings();
        assert_eq!(s.rain_count, 0);
        assert!(s.parallel);
        assert_eq!(s.width, Settings::default().width);
    }

    #[test]
    fn bad_point_is_rejected() {
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,1").is_err());
    }
}
