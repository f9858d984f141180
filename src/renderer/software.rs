//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! * Scratch is stored **column-major** (`x * height + y`): every screen
//!   column is one contiguous slice, so the compositor can hand disjoint
//!   `&mut` slices to rayon workers without locks.
//! * `end_frame` transposes into a row-major 0x00RRGGBB buffer for the
//!   window.
//! * The clear in `begin_frame` always finishes before any column worker
//!   starts.
//! ---------------------------------------------------------------------------

use rayon::prelude::*;

use crate::{
    engine::{ColumnStyle, RayHit, draw_column},
    renderer::{Renderer, Rgba},
    world::{Pose, TextureAtlas},
};

const CLEAR: Rgba = 0x00_202020;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    /// Column-major working buffer.
    columns: Vec<Rgba>,
    /// Row-major copy handed to the presenter.
    frame: Vec<Rgba>,
    width: usize,
    height: usize,
    parallel: bool,
}

impl Software {
    /// `parallel` composites columns on the rayon pool.
    pub fn new(parallel: bool) -> Self {
        Self {
            parallel,
            ..Self::default()
        }
    }

    /// Read back one pixel of the working buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.columns.get(x * self.height + y).copied()
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.columns.resize(w * h, 0);
            self.frame.resize(w * h, 0);
        }
        self.columns.fill(CLEAR);
    }

    #[inline]
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn parallel(&self) -> bool {
        self.parallel
    }

    fn draw_columns(
        &mut self,
        hits: &[RayHit],
        pose: &Pose,
        atlas: &TextureAtlas,
        style: &ColumnStyle,
    ) {
        if self.height == 0 {
            return;
        }
        let h = self.height;
        if self.parallel {
            self.columns
                .par_chunks_mut(h)
                .zip(hits.par_iter())
                .for_each(|(col, hit)| draw_column(col, hit, pose, atlas, style));
        } else {
            for (col, hit) in self.columns.chunks_mut(h).zip(hits) {
                draw_column(col, hit, pose, atlas, style);
            }
        }
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, colour: Rgba) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.columns[x as usize * self.height + y as usize] = colour;
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let (w, h) = (self.width, self.height);
        if h > 0 {
            for (x, col) in self.columns.chunks(h).enumerate() {
                for (y, &px) in col.iter().enumerate() {
                    self.frame[y * w + x] = px;
                }
            }
        }
        submit(&self.frame, w, h);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HitKind, Side};
    use crate::world::Texture;
    use glam::DVec2;

    fn blue_atlas() -> TextureAtlas {
        let mut atlas = TextureAtlas::new(4);
        atlas
            .insert(1, Texture::from_fn(4, |_, _| 0x00_0000FF))
            .unwrap();
        atlas
    }

    fn hit(distance: f64) -> RayHit {
        RayHit {
            ray_dir: DVec2::X,
            distance,
            side: Side::X,
            tex_id: 1,
            u: 0.5,
            kind: HitKind::Wall,
        }
    }

    fn render(parallel: bool) -> Vec<Rgba> {
        let mut sw = Software::new(parallel);
        let pose = Pose::new(DVec2::new(2.0, 2.0), DVec2::X, 0.66);
        let hits: Vec<RayHit> = (0..8).map(|x| hit(1.0 + x as f64)).collect();
        sw.begin_frame(8, 6);
        sw.draw_columns(&hits, &pose, &blue_atlas(), &ColumnStyle::default());
        let mut out = Vec::new();
        sw.end_frame(|fb, w, h| {
            assert_eq!((w, h), (8, 6));
            out.extend_from_slice(fb);
        });
        out
    }

    #[test]
    fn software_renders_columns() {
        let fb = render(false);
        // column 0 is a wall at distance 1: full height
        for y in 0..6 {
            assert_eq!(fb[y * 8], 0x00_0000FF);
        }
        // column 7 is far away: ceiling at the top
        assert_eq!(fb[7], ColumnStyle::default().ceiling);
    }

    #[test]
    fn parallel_columns_match_serial() {
        assert_eq!(render(false), render(true));
    }

    #[test]
    fn frame_is_row_major_after_transpose() {
        let mut sw = Software::default();
        sw.begin_frame(3, 2);
        sw.put_pixel(2, 1, 0x00_ABCDEF);
        sw.put_pixel(-1, 0, 0x00_FFFFFF);
        sw.put_pixel(3, 0, 0x00_FFFFFF);
        assert_eq!(sw.pixel(2, 1), Some(0x00_ABCDEF));
        sw.end_frame(|fb, w, _| {
            assert_eq!(fb[w + 2], 0x00_ABCDEF);
            assert_eq!(fb.iter().filter(|&&p| p == CLEAR).count(), 5);
        });
    }

    #[test]
    fn fill_rect_and_line_clip() {
        let mut sw = Software::default();
        sw.begin_frame(4, 4);
        sw.fill_rect(-2, -2, 4, 4, 0x00_FF0000);
        assert_eq!(sw.pixel(0, 0), Some(0x00_FF0000));
        assert_eq!(sw.pixel(1, 1), Some(0x00_FF0000));
        assert_eq!(sw.pixel(2, 2), Some(CLEAR));

        sw.draw_line(0, 3, 10, 3, 0x00_00FF00);
        assert_eq!(sw.pixel(3, 3), Some(0x00_00FF00));
    }
}
