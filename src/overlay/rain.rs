//! Ambient rain: screen-space particles falling at a fixed speed each.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Renderer, Rgba};

const STREAK_LEN: i32 = 4;
const STREAK_COLOUR: Rgba = 0x00_9AA8C8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainDrop {
    /// screen pixels
    pub x: f32,
    /// screen pixels, grows downwards
    pub y: f32,
    /// pixels / second
    pub speed: f32,
}

/// Fixed-size particle set plus the RNG used to re-seed wrapped drops.
#[derive(Clone, Debug)]
pub struct Rain {
    drops: Vec<RainDrop>,
    width: f32,
    height: f32,
    rng: Pcg32,
}

impl Rain {
    /// `count` drops scattered over a `width × height` screen with speeds in
    /// `speed.0 ..= speed.1`.
    pub fn new(count: usize, width: usize, height: usize, speed: (f32, f32), seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (lo, hi) = if speed.0 <= speed.1 {
            speed
        } else {
            (speed.1, speed.0)
        };
        let (w, h) = (width as f32, height as f32);
        let drops = (0..count)
            .map(|_| RainDrop {
                x: random_coord(&mut rng, w),
                y: random_coord(&mut rng, h),
                speed: rng.random_range(lo..=hi),
            })
            .collect();
        Self {
            drops,
            width: w,
            height: h,
            rng,
        }
    }

    /// Rain made of explicit drops.
    pub fn from_drops(drops: Vec<RainDrop>, width: usize, height: usize, seed: u64) -> Self {
        Self {
            drops,
            width: width as f32,
            height: height as f32,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    /// Fall for `dt` seconds. Drops past the bottom wrap to the top with
    /// their overshoot kept (`0 ≤ y < speed * dt`) and a fresh random x.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || self.height <= 0.0 {
            return;
        }
        for drop in &mut self.drops {
            drop.y += drop.speed * dt;
            if drop.y >= self.height {
                drop.y = drop.y.rem_euclid(self.height);
                drop.x = random_coord(&mut self.rng, self.width);
            }
        }
    }
}

#[inline]
fn random_coord(rng: &mut Pcg32, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}

/// Short vertical streak ending at each drop.
pub fn draw<R: Renderer>(r: &mut R, rain: &Rain) {
    for drop in rain.drops() {
        let x = drop.x as i32;
        let y = drop.y as i32;
        r.draw_line(x, y - STREAK_LEN + 1, x, y, STREAK_COLOUR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Software;

    #[test]
    fn drop_at_bottom_wraps_to_top() {
        let h = 480;
        let mut rain = Rain::from_drops(
            vec![RainDrop {
                x: 10.0,
                y: h as f32 - 1.0,
                speed: 3.0,
            }],
            640,
            h,
            7,
        );
        rain.update(1.0);
        let d = rain.drops()[0];
        assert!((0.0..3.0).contains(&d.y), "y = {}", d.y);
        assert!((0.0..640.0).contains(&d.x));
    }

    #[test]
    fn drops_fall_by_speed() {
        let mut rain = Rain::from_drops(
            vec![RainDrop {
                x: 5.0,
                y: 10.0,
                speed: 120.0,
            }],
            100,
            480,
            1,
        );
        rain.update(0.5);
        assert_eq!(rain.drops()[0], RainDrop { x: 5.0, y: 70.0, speed: 120.0 });
        rain.update(f32::NAN);
        assert_eq!(rain.drops()[0].y, 70.0);
    }

    #[test]
    fn new_rain_is_on_screen_and_seeded() {
        let a = Rain::new(50, 320, 200, (2.0, 6.0), 42);
        let b = Rain::new(50, 320, 200, (6.0, 2.0), 42);
        assert_eq!(a.drops().len(), 50);
        for d in a.drops() {
            assert!((0.0..320.0).contains(&d.x));
            assert!((0.0..200.0).contains(&d.y));
            assert!((2.0..=6.0).contains(&d.speed));
        }
        assert_eq!(a.drops(), b.drops());
    }

    #[test]
    fn streaks_are_clipped() {
        let mut sw = Software::default();
        sw.begin_frame(4, 4);
        let rain = Rain::from_drops(
            vec![RainDrop { x: 1.0, y: 1.0, speed: 1.0 }],
            4,
            4,
            0,
        );
        draw(&mut sw, &rain);
        assert_eq!(sw.pixel(1, 0), Some(STREAK_COLOUR));
        assert_eq!(sw.pixel(1, 1), Some(STREAK_COLOUR));
        assert_ne!(sw.pixel(1, 2), Some(STREAK_COLOUR));
    }
}
