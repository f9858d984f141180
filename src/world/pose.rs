use glam::DVec2;

/// Player view-point on the grid.
///
/// * `pos` is in cell units; `(3.5, 2.5)` is the centre of cell `(3, 2)`.
/// * `dir` is the forward axis, `plane` the camera plane. `plane` is kept
///   perpendicular to `dir`; `|plane| / |dir|` sets the horizontal FoV.
/// * Map `y` grows downwards, so `dir.perp()` points to the viewer's right
///   and a positive angle turns right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub pos: DVec2,
    pub dir: DVec2,
    pub plane: DVec2,
}

impl Pose {
    /// Pose at `pos` looking along `heading` (normalised), with a camera
    /// plane of length `fov_ratio` to its right.
    pub fn new(pos: DVec2, heading: DVec2, fov_ratio: f64) -> Self {
        let dir = heading.try_normalize().unwrap_or(DVec2::X);
        Self {
            pos,
            dir,
            plane: dir.perp() * fov_ratio,
        }
    }

    /// Horizontal field of view in radians.
    pub fn fov(&self) -> f64 {
        2.0 * (self.plane.length() / self.dir.length()).atan()
    }

    /// Rotate `dir` and `plane` together (positive = turn right).
    pub fn rotate(&mut self, angle: f64) {
        let rot = DVec2::from_angle(angle);
        self.dir = rot.rotate(self.dir);
        self.plane = rot.rotate(self.plane);
    }

    /// Ray direction for camera-space offset `camera_x ∈ [-1, 1]`.
    #[inline(always)]
    pub fn ray_dir(&self, camera_x: f64) -> DVec2 {
        self.dir + self.plane * camera_x
    }

    /// Unit strafe axis (towards the viewer's right).
    #[inline]
    pub fn right(&self) -> DVec2 {
        self.plane.try_normalize().unwrap_or(self.dir.perp())
    }
}
