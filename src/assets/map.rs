//! Plain-text grid maps.
//!
//! ```text
//! # 5×4 room, wall code 1 around the edge
//! 1 1 1 1 1
//! 1 0 0 2 1
//! 1 0 0 0 1
//! 1 1 1 1 1
//! ```
//!
//! * One row per line, cells separated by whitespace.
//! * Blank lines and lines starting with `#` are skipped.
//! * Every row must be as long as the first one.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::world::{Cell, GridMap};

#[derive(Error, Debug)]
pub enum MapError {
    #[error("map file `{0}` not found")]
    NotFound(PathBuf),

    /// Underlying I/O failure other than a missing file.
    #[error("I/O error reading `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// `line` is 1-based; 0 means the file as a whole.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Read and parse the map at `path`.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<GridMap, MapError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => MapError::NotFound(path.to_owned()),
        _ => MapError::Io {
            path: path.to_owned(),
            source: e,
        },
    })?;
    let map = parse_map(&text)?;
    log::info!(
        "loaded map `{}`: {}×{} cells",
        path.display(),
        map.width(),
        map.height()
    );
    Ok(map)
}

/// Parse the textual map format.
pub fn parse_map(text: &str) -> Result<GridMap, MapError> {
    let mut width = None;
    let mut cells: Vec<Cell> = Vec::new();
    let mut rows = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;

        let before = cells.len();
        for tok in line.split_whitespace() {
            let code = tok.parse::<Cell>().map_err(|_| MapError::Parse {
                line: line_no,
                reason: format!("`{tok}` is not a cell code (0..={})", Cell::MAX),
            })?;
            cells.push(code);
        }
        let len = cells.len() - before;

        match width {
            None => width = Some(len),
            Some(w) if w != len => {
                return Err(MapError::Parse {
                    line: line_no,
                    reason: format!("row has {len} cells, expected {w}"),
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let width = width.ok_or_else(|| MapError::Parse {
        line: 0,
        reason: "map has no rows".into(),
    })?;
    GridMap::new(width, rows, cells).map_err(|e| MapError::Parse {
        line: 0,
        reason: e.to_string(),
    })
}
