use crate::{
    config::Settings,
    engine::{ColumnStyle, RayHit, cast_all},
    overlay::{minimap, rain},
    renderer::{Renderer, Rgba},
    sim::GameState,
    world::TextureAtlas,
};

/// Owns everything that lives across frames on the rendering side:
/// the back-end, the texture atlas and the per-column hit buffer.
///
/// Rays are cast on the rayon pool exactly when the back-end composites
/// there ([`Renderer::parallel`]); `settings.parallel` only picks the
/// back-end in the binary.
pub struct Engine<R: Renderer> {
    pub renderer: R,
    pub atlas: TextureAtlas,
    pub style: ColumnStyle,
    width: usize,
    height: usize,
    minimap_scale: usize,
    hits: Vec<RayHit>,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, atlas: TextureAtlas, settings: &Settings) -> Self {
        Self {
            renderer,
            atlas,
            style: settings.column_style(),
            width: settings.width,
            height: settings.height,
            minimap_scale: settings.minimap_scale,
            hits: vec![RayHit::default(); settings.width],
        }
    }

    /// Whether rays and columns run on the rayon pool.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.renderer.parallel()
    }

    /// Hits from the most recent frame, left to right.
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    /// Render one frame of `state` and hand the buffer to `submit`.
    ///
    /// Order: clear → cast → walls → rain → minimap → present.
    pub fn render_frame(&mut self, state: &GameState, submit: impl FnOnce(&[Rgba], usize, usize)) {
        self.renderer.begin_frame(self.width, self.height);

        let parallel = self.parallel();
        cast_all(&state.pose, &state.map, &mut self.hits, parallel);

        let style = ColumnStyle {
            textured: state.textured,
            ..self.style
        };
        self.renderer
            .draw_columns(&self.hits, &state.pose, &self.atlas, &style);

        rain::draw(&mut self.renderer, &state.rain);
        if state.show_minimap {
            minimap::draw(&mut self.renderer, &state.map, &state.pose, self.minimap_scale);
        }

        self.renderer.end_frame(submit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{HitKind, Side},
        overlay::Rain,
        renderer::Software,
        sim::InputCmd,
        world::{GridMap, Pose},
    };
    use glam::DVec2;

    const W: usize = 64;
    const H: usize = 48;

    fn settings() -> Settings {
        Settings {
            width: W,
            height: H,
            minimap_scale: 2,
            ..Settings::default()
        }
    }

    fn state() -> GameState {
        let map = GridMap::bordered(10, 10, 1).unwrap();
        let pose = Pose::new(DVec2::new(5.0, 5.0), DVec2::X, 0.66);
        let rain = Rain::from_drops(vec![], W, H, 0);
        GameState::new(map, pose, rain, settings().motion()).unwrap()
    }

    fn frame(engine: &mut Engine<Software>, state: &GameState) -> Vec<Rgba> {
        let mut out = Vec::new();
        engine.render_frame(state, |fb, w, h| {
            assert_eq!((w, h), (W, H));
            out.extend_from_slice(fb);
        });
        out
    }

    #[test]
    fn centre_column_sees_east_wall() {
        let s = settings();
        let atlas = TextureAtlas::procedural(&[1], s.texture_size);
        let mut engine = Engine::new(Software::default(), atlas, &s);
        frame(&mut engine, &state());

        let hit = engine.hits()[W / 2];
        assert_eq!(hit.kind, HitKind::Wall);
        assert_eq!(hit.side, Side::X);
        assert!((hit.distance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn minimap_toggle_changes_only_overlay_pixels() {
        let s = settings();
        let atlas = TextureAtlas::procedural(&[1], s.texture_size);
        let mut engine = Engine::new(Software::default(), atlas, &s);
        let mut st = state();

        let with_map = frame(&mut engine, &st);
        st.update(InputCmd::TOGGLE_MINIMAP, 0.0);
        let without = frame(&mut engine, &st);

        let extent = 10 * s.minimap_scale;
        for y in 0..H {
            for x in 0..W {
                let i = y * W + x;
                if x >= extent || y >= extent {
                    assert_eq!(with_map[i], without[i], "pixel ({x}, {y}) changed");
                }
            }
        }
        assert_ne!(with_map[..W], without[..W]);
    }

    #[test]
    fn parallel_frame_matches_serial() {
        let atlas = TextureAtlas::procedural(&[1], 16);
        let mut st = state();
        st.pose.rotate(0.4);

        let mut a = Engine::new(Software::new(false), atlas.clone(), &settings());
        let mut b = Engine::new(Software::new(true), atlas, &settings());
        assert!(!a.parallel());
        assert!(b.parallel());
        assert_eq!(frame(&mut a, &st), frame(&mut b, &st));
    }

    #[test]
    fn back_end_decides_parallelism() {
        let atlas = TextureAtlas::procedural(&[1], 16);
        let par_settings = Settings {
            parallel: true,
            ..settings()
        };
        let serial = Engine::new(Software::new(false), atlas.clone(), &par_settings);
        assert!(!serial.parallel());

        let par = Engine::new(Software::new(true), atlas, &settings());
        assert!(par.parallel());
    }
}
