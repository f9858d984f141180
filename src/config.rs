//! Startup configuration.
//!
//! `Settings::default()` carries the classic values; the binary overlays its
//! command-line flags on top and calls [`Settings::validate`] once before
//! anything is loaded.

use thiserror::Error;

use crate::{
    engine::{ColumnStyle, Surfaces},
    renderer::Rgba,
    sim::MotionParams,
    world::TextureId,
};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("screen size {0}×{1} must be non-zero")]
    ScreenSize(usize, usize),

    #[error("texture size must be non-zero")]
    TextureSize,

    #[error("{name} = {value} is out of range ({range})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /* screen ------------------------------------------------------------*/
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,

    /* camera / motion ---------------------------------------------------*/
    /// Camera plane length relative to a unit direction (0.66 ≈ 66°).
    pub fov_ratio: f64,
    /// cells / second
    pub move_speed: f64,
    /// radians / second
    pub rot_speed: f64,
    /// Wall clearance in cells.
    pub radius: f64,

    /* walls & background ------------------------------------------------*/
    pub texture_size: usize,
    pub side_shade: f32,
    pub ceiling_colour: Rgba,
    pub floor_colour: Rgba,
    pub floor_casting: bool,
    pub floor_texture: TextureId,
    pub ceiling_texture: TextureId,

    /* overlays ----------------------------------------------------------*/
    pub minimap_scale: usize,
    pub rain_count: usize,
    /// pixels / second, `min ..= max`
    pub rain_speed: (f32, f32),
    pub seed: u64,

    /// Cast and composite columns on the rayon pool.
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            target_fps: 60,
            fov_ratio: 0.66,
            move_speed: 3.0,
            rot_speed: 2.5,
            radius: 0.2,
            texture_size: 64,
            side_shade: 0.5,
            ceiling_colour: 0x00_383838,
            floor_colour: 0x00_707070,
            floor_casting: false,
            floor_texture: 4,
            ceiling_texture: 7,
            minimap_scale: 5,
            rain_count: 100,
            rain_speed: (120.0, 360.0),
            seed: 0x5EED,
            parallel: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ScreenSize(self.width, self.height));
        }
        if self.texture_size == 0 {
            return Err(ConfigError::TextureSize);
        }
        check("fov_ratio", self.fov_ratio, "0 < v <= 10", |v| v > 0.0 && v <= 10.0)?;
        check("move_speed", self.move_speed, "0 <= v", |v| v >= 0.0)?;
        check("rot_speed", self.rot_speed, "0 <= v", |v| v >= 0.0)?;
        check("radius", self.radius, "0 <= v < 0.5", |v| (0.0..0.5).contains(&v))?;
        check("side_shade", self.side_shade as f64, "0 <= v <= 1", |v| {
            (0.0..=1.0).contains(&v)
        })?;
        let (lo, hi) = self.rain_speed;
        check("rain_speed.min", lo as f64, "0 <= min <= max", |v| {
            v >= 0.0 && v <= hi as f64
        })?;
        check("rain_speed.max", hi as f64, "0 <= max", |v| v >= 0.0)?;
        Ok(())
    }

    pub fn motion(&self) -> MotionParams {
        MotionParams {
            move_speed: self.move_speed,
            rot_speed: self.rot_speed,
            radius: self.radius,
        }
    }

    pub fn column_style(&self) -> ColumnStyle {
        ColumnStyle {
            side_shade: self.side_shade,
            ceiling: self.ceiling_colour,
            floor: self.floor_colour,
            textured: true,
            surfaces: self.floor_casting.then_some(Surfaces {
                floor: self.floor_texture,
                ceiling: self.ceiling_texture,
            }),
        }
    }

    /// Extra atlas ids the renderer needs besides the map's wall codes.
    pub fn surface_ids(&self) -> Vec<TextureId> {
        if self.floor_casting {
            vec![self.floor_texture, self.ceiling_texture]
        } else {
            Vec::new()
        }
    }
}

fn check(
    name: &'static str,
    value: f64,
    range: &'static str,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, range })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let s = Settings {
            height: 0,
            ..Settings::default()
        };
        assert_eq!(s.validate(), Err(ConfigError::ScreenSize(640, 0)));

        let s = Settings {
            fov_ratio: f64::NAN,
            ..Settings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ConfigError::OutOfRange { name: "fov_ratio", .. })
        ));

        let s = Settings {
            rain_speed: (5.0, 1.0),
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn floor_casting_adds_surfaces() {
        let s = Settings {
            floor_casting: true,
            ..Settings::default()
        };
        assert_eq!(s.surface_ids(), vec![4, 7]);
        assert_eq!(
            s.column_style().surfaces,
            Some(Surfaces {
                floor: 4,
                ceiling: 7
            })
        );
        assert_eq!(Settings::default().column_style().surfaces, None);
    }
}
