//! DDA grid walk: one ray per screen column.
//!
//! * `cast_ray` is a pure function of pose, map and ray direction; it
//!   allocates nothing and never fails.
//! * Leaving the map counts as hitting an implicit boundary wall, so a ray
//!   on a map without a closed border still terminates.
//! * Distances are *perpendicular* to the camera plane (fisheye-free).

use glam::{DVec2, IVec2};
use rayon::prelude::*;

use crate::world::{GridMap, NO_TEXTURE, OPEN, Pose, TextureId};

/// Stand-in for `|1 / 0|`. Finite so `0 * DELTA_FAR` stays 0 instead of NaN.
const DELTA_FAR: f64 = 1e30;

/// Distance reported for rays that hit nothing.
pub const MAX_DISTANCE: f64 = 1e6;

/// Hard cap on DDA steps, independent of map size.
const MAX_STEPS: usize = 1 << 16;

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// x-step: vertical grid line, east/west facing wall.
    #[default]
    X = 0,
    /// y-step: horizontal grid line, north/south facing wall.
    Y = 1,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitKind {
    /// A wall cell of the map.
    Wall,
    /// The implicit wall just outside the map.
    Boundary,
    /// Nothing hit; draw background only.
    #[default]
    Miss,
}

/// Result of casting one column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RayHit {
    pub ray_dir: DVec2,
    /// Perpendicular distance to the wall, `0 ..= MAX_DISTANCE`.
    pub distance: f64,
    pub side: Side,
    pub tex_id: TextureId,
    /// Horizontal texture coordinate on the wall face, `0 ≤ u < 1`.
    pub u: f64,
    pub kind: HitKind,
}

impl RayHit {
    fn miss(ray_dir: DVec2) -> Self {
        Self {
            ray_dir: if ray_dir.is_finite() { ray_dir } else { DVec2::ZERO },
            distance: MAX_DISTANCE,
            side: Side::X,
            tex_id: NO_TEXTURE,
            u: 0.0,
            kind: HitKind::Miss,
        }
    }

    fn boundary(ray_dir: DVec2) -> Self {
        Self {
            ray_dir,
            distance: 0.0,
            side: Side::X,
            tex_id: NO_TEXTURE,
            u: 0.0,
            kind: HitKind::Boundary,
        }
    }
}

/// Camera-space x for column `x` of a `width`-wide screen: −1 (left) … +1.
#[inline(always)]
pub fn camera_x(x: usize, width: usize) -> f64 {
    2.0 * x as f64 / width.max(1) as f64 - 1.0
}

/// Cast the ray for screen column `x`.
#[inline]
pub fn cast_column(pose: &Pose, map: &GridMap, x: usize, width: usize) -> RayHit {
    cast_ray(pose, map, pose.ray_dir(camera_x(x, width)))
}

/// Fill `out[x]` with the hit for column `x`; `out.len()` is the screen width.
pub fn cast_all(pose: &Pose, map: &GridMap, out: &mut [RayHit], parallel: bool) {
    let width = out.len();
    if parallel {
        out.par_iter_mut()
            .enumerate()
            .for_each(|(x, hit)| *hit = cast_column(pose, map, x, width));
    } else {
        for (x, hit) in out.iter_mut().enumerate() {
            *hit = cast_column(pose, map, x, width);
        }
    }
}

/// Walk the grid from `pose.pos` along `ray` until a wall is entered.
pub fn cast_ray(pose: &Pose, map: &GridMap, ray: DVec2) -> RayHit {
    let pos = pose.pos;
    if !pos.is_finite() || !ray.is_finite() || ray == DVec2::ZERO {
        return RayHit::miss(ray);
    }

    /* 1. starting cell and per-axis increments ----------------------------*/
    // Off the map the eye is already inside the boundary wall.
    if map.cell_at(pos).is_none() {
        return RayHit::boundary(ray);
    }
    let start = pos.floor();
    let mut cell = IVec2::new(start.x as i32, start.y as i32);

    let delta = DVec2::new(inv_abs(ray.x), inv_abs(ray.y));

    let (step_x, mut side_x) = if ray.x < 0.0 {
        (-1, (pos.x - cell.x as f64) * delta.x)
    } else {
        (1, (cell.x as f64 + 1.0 - pos.x) * delta.x)
    };
    let (step_y, mut side_y) = if ray.y < 0.0 {
        (-1, (pos.y - cell.y as f64) * delta.y)
    } else {
        (1, (cell.y as f64 + 1.0 - pos.y) * delta.y)
    };

    /* 2. step until something solid ---------------------------------------*/
    let mut side = Side::X;
    let mut found = None;
    for _ in 0..MAX_STEPS {
        // ties step along y
        if side_x < side_y {
            side_x += delta.x;
            cell.x += step_x;
            side = Side::X;
        } else {
            side_y += delta.y;
            cell.y += step_y;
            side = Side::Y;
        }

        match map.cell(cell.x, cell.y) {
            Some(OPEN) => continue,
            Some(code) => {
                found = Some((HitKind::Wall, code));
                break;
            }
            None => {
                found = Some((HitKind::Boundary, NO_TEXTURE));
                break;
            }
        }
    }
    let Some((kind, tex_id)) = found else {
        return RayHit::miss(ray);
    };

    /* 3. perpendicular distance -------------------------------------------*/
    let raw = match side {
        Side::X => (cell.x as f64 - pos.x + (1 - step_x) as f64 * 0.5) / ray.x,
        Side::Y => (cell.y as f64 - pos.y + (1 - step_y) as f64 * 0.5) / ray.y,
    };
    let distance = if raw.is_finite() {
        raw.clamp(0.0, MAX_DISTANCE)
    } else {
        MAX_DISTANCE
    };

    /* 4. where along the face the ray struck ------------------------------*/
    let wall_coord = match side {
        Side::X => pos.y + distance * ray.y,
        Side::Y => pos.x + distance * ray.x,
    };
    let mut u = unit_fract(wall_coord);
    let flip = match side {
        Side::X => ray.x > 0.0,
        Side::Y => ray.y < 0.0,
    };
    if flip {
        u = unit_fract(1.0 - u);
    }

    RayHit {
        ray_dir: ray,
        distance,
        side,
        tex_id,
        u,
        kind,
    }
}

#[inline(always)]
fn inv_abs(v: f64) -> f64 {
    if v == 0.0 { DELTA_FAR } else { (1.0 / v).abs() }
}

/// Fractional part folded into `[0, 1)`; non-finite input maps to 0.
#[inline(always)]
fn unit_fract(v: f64) -> f64 {
    let f = v - v.floor();
    if f.is_finite() && f < 1.0 { f } else { 0.0 }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn room() -> GridMap {
        GridMap::bordered(10, 10, 1).unwrap()
    }

    fn pose_at(x: f64, y: f64, heading: DVec2) -> Pose {
        Pose::new(DVec2::new(x, y), heading, 0.66)
    }

    #[test]
    fn centre_column_hits_east_wall() {
        let map = room();
        let pose = pose_at(5.0, 5.0, DVec2::X);
        let hit = cast_column(&pose, &map, 320, 640);

        assert_eq!(hit.kind, HitKind::Wall);
        assert_eq!(hit.side, Side::X);
        assert_eq!(hit.tex_id, 1);
        assert!((hit.distance - 4.0).abs() < 1e-9, "distance {}", hit.distance);
    }

    #[test]
    fn orthogonal_rays_report_axis_and_distance() {
        let map = room();
        let p = pose_at(3.0, 6.0, DVec2::X);

        // west wall occupies x = 0, its east face is x = 1
        let west = cast_ray(&p, &map, DVec2::NEG_X);
        assert_eq!(west.side, Side::X);
        assert!((west.distance - 2.0).abs() < 1e-9);

        // south wall row y = 9
        let south = cast_ray(&p, &map, DVec2::Y);
        assert_eq!(south.side, Side::Y);
        assert!((south.distance - 3.0).abs() < 1e-9);

        // north wall row y = 0, face at y = 1
        let north = cast_ray(&p, &map, DVec2::NEG_Y);
        assert_eq!(north.side, Side::Y);
        assert!((north.distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn distance_is_perpendicular_not_euclidean() {
        let map = room();
        let pose = pose_at(5.0, 5.0, DVec2::X);
        // Leftmost column: ray (1, -0.66) still reaches the x = 9 face first.
        let hit = cast_column(&pose, &map, 0, 640);
        assert_eq!(hit.side, Side::X);
        assert!((hit.distance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn texture_u_follows_hit_point() {
        let map = room();
        let pose = pose_at(5.5, 5.25, DVec2::X);
        let hit = cast_ray(&pose, &map, DVec2::X);
        // side X, ray.x > 0: flipped
        assert!((hit.u - 0.75).abs() < 1e-9);

        let hit = cast_ray(&pose, &map, DVec2::NEG_X);
        assert!((hit.u - 0.25).abs() < 1e-9);

        let hit = cast_ray(&pose, &map, DVec2::NEG_Y);
        // side Y, ray.y < 0: flipped
        assert!((hit.u - 0.5).abs() < 1e-9);
    }

    #[test]
    fn flipped_zero_stays_below_one() {
        let map = room();
        let pose = pose_at(5.5, 5.0, DVec2::X);
        let hit = cast_ray(&pose, &map, DVec2::X);
        assert_eq!(hit.u, 0.0);
    }

    #[test]
    fn open_edge_hits_boundary() {
        let map = GridMap::new(3, 1, vec![0, 0, 0]).unwrap();
        let pose = pose_at(0.5, 0.5, DVec2::X);
        let hit = cast_ray(&pose, &map, DVec2::X);
        assert_eq!(hit.kind, HitKind::Boundary);
        assert_eq!(hit.tex_id, NO_TEXTURE);
        assert!((hit.distance - 2.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_rays_miss() {
        let map = room();
        let pose = pose_at(5.0, 5.0, DVec2::X);
        for ray in [DVec2::ZERO, DVec2::new(f64::NAN, 1.0), DVec2::new(1.0, f64::INFINITY)] {
            let hit = cast_ray(&pose, &map, ray);
            assert_eq!(hit.kind, HitKind::Miss);
            assert_eq!(hit.distance, MAX_DISTANCE);
            assert!(hit.ray_dir.is_finite());
        }

        let lost = Pose {
            pos: DVec2::new(f64::NAN, 1.0),
            ..pose
        };
        assert_eq!(cast_ray(&lost, &map, DVec2::X).kind, HitKind::Miss);
    }

    #[test]
    fn eye_off_the_map_sees_boundary() {
        let map = room();
        for pos in [
            DVec2::new(i32::MAX as f64 + 0.5, 5.0),
            DVec2::new(5.0, i32::MIN as f64 - 3.0),
            DVec2::new(-0.5, 5.0),
            DVec2::new(1e300, -1e300),
        ] {
            let pose = pose_at(pos.x, pos.y, DVec2::X);
            for ray in [DVec2::X, DVec2::NEG_X, DVec2::Y, DVec2::new(-0.3, 0.9)] {
                let hit = cast_ray(&pose, &map, ray);
                assert_eq!(hit.kind, HitKind::Boundary);
                assert_eq!(hit.tex_id, NO_TEXTURE);
                assert_eq!(hit.distance, 0.0);
            }
        }
    }

    #[test]
    fn parallel_cast_matches_serial() {
        let map = room();
        let mut pose = pose_at(4.3, 6.7, DVec2::new(1.0, 0.4));
        pose.rotate(0.3);
        let mut serial = vec![RayHit::default(); 97];
        let mut par = vec![RayHit::default(); 97];
        cast_all(&pose, &map, &mut serial, false);
        cast_all(&pose, &map, &mut par, true);
        assert_eq!(serial, par);
    }

    proptest! {
        #[test]
        fn hits_are_finite_and_u_in_unit_range(
            x in 1.0f64..9.0,
            y in 1.0f64..9.0,
            heading in -3.2f64..3.2,
            col in 0usize..320,
        ) {
            let map = room();
            let pose = pose_at(x, y, DVec2::from_angle(heading));
            let hit = cast_column(&pose, &map, col, 320);
            prop_assert!(hit.distance.is_finite());
            prop_assert!(hit.distance >= 0.0);
            prop_assert!(hit.u.is_finite());
            prop_assert!((0.0..1.0).contains(&hit.u));
            prop_assert_eq!(hit.kind, HitKind::Wall);
            prop_assert_eq!(hit.tex_id, 1);
        }

        #[test]
        fn any_finite_pose_is_safe(
            x in -1e12f64..1e12,
            y in -1e12f64..1e12,
            heading in -3.2f64..3.2,
            col in 0usize..64,
        ) {
            let map = room();
            let pose = pose_at(x, y, DVec2::from_angle(heading));
            let hit = cast_column(&pose, &map, col, 64);
            prop_assert!(hit.distance.is_finite());
            prop_assert!((0.0..=MAX_DISTANCE).contains(&hit.distance));
            prop_assert!((0.0..1.0).contains(&hit.u));
        }
    }
}
