use glam::{DVec2, IVec2};

use super::texture::TextureId;

/// One map cell: 0 = open floor, n > 0 = wall drawn with texture `n`.
pub type Cell = TextureId;

pub const OPEN: Cell = 0;

/// Things that make a cell array unusable as a map.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("map has no cells")]
    Empty,

    #[error("{cells} cells do not form a {width}×{height} grid")]
    BadShape {
        width: usize,
        height: usize,
        cells: usize,
    },
}

/// Rectangular tile map, read-only for the whole session.
///
/// Cells are stored row-major: `(x, y)` lives at `y * width + x`, with `y`
/// growing downwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl GridMap {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if cells.len() != width * height {
            return Err(GridError::BadShape {
                width,
                height,
                cells: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// `width × height` map whose border cells are `wall` and interior open.
    pub fn bordered(width: usize, height: usize, wall: Cell) -> Result<Self, GridError> {
        let mut cells = vec![OPEN; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    cells[y * width + x] = wall;
                }
            }
        }
        Self::new(width, height, cells)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at integer coordinates, `None` off the map.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Cell under a world-space point (floored), `None` off the map.
    #[inline]
    pub fn cell_at(&self, p: DVec2) -> Option<Cell> {
        if !p.is_finite() {
            return None;
        }
        let c = p.floor();
        self.cell(c.x as i32, c.y as i32)
    }

    /// True if `(x, y)` is on the map and not a wall.
    #[inline]
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == Some(OPEN)
    }

    /// True if the point is on the map and over an open cell.
    #[inline]
    pub fn is_open_at(&self, p: DVec2) -> bool {
        self.cell_at(p) == Some(OPEN)
    }

    /// First open cell in row-major order, used as the default spawn.
    pub fn first_open_cell(&self) -> Option<IVec2> {
        self.cells
            .iter()
            .position(|&c| c == OPEN)
            .map(|i| IVec2::new((i % self.width) as i32, (i / self.width) as i32))
    }

    /// Distinct wall codes used by the map, ascending.
    pub fn texture_ids(&self) -> Vec<TextureId> {
        let mut ids: Vec<TextureId> = self.cells.iter().copied().filter(|&c| c != OPEN).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Row-major `(x, y, cell)` iterator over the whole map.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, &c)| {
            (
                (i % self.width) as i32,
                (i / self.width) as i32,
                c,
            )
        })
    }
}
