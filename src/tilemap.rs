//! Tile grid terrain
//!
//! Levels are delimited text grids: one line per row, one cell per tile.
//! Numeric cells are tile ids, anything else is empty space.

use std::path::Path;

use glam::Vec2;
use thiserror::Error;

use crate::sim::geom::Rect;

/// Id of an empty cell
pub const EMPTY_TILE: i32 = -1;

#[derive(Debug, Error)]
pub enum TileMapError {
    #[error("failed to read tile map: {0}")]
    Io(#[from] std::io::Error),
    #[error("tile map `{0}` has no rows")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileGrid {
    rows: Vec<Vec<i32>>,
}

impl TileGrid {
    pub fn parse(text: &str, delimiter: char) -> Self {
        let rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(delimiter).map(parse_cell).collect())
            .collect();
        Self { rows }
    }

    pub fn load(path: impl AsRef<Path>, delimiter: char) -> Result<Self, TileMapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let grid = Self::parse(&text, delimiter);
        if grid.rows.is_empty() {
            log::warn!("Tile map {} is empty", path.display());
            return Err(TileMapError::Empty(path.display().to_string()));
        }
        log::info!(
            "Loaded {}x{} tile map from {}",
            grid.width(),
            grid.height(),
            path.display()
        );
        Ok(grid)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Tile id at `row`, `col`; out of range reads as empty
    pub fn tile(&self, row: usize, col: usize) -> i32 {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(EMPTY_TILE)
    }

    /// One `grid_size` square per non-empty tile, row by row
    pub fn obstacles(&self, grid_size: f32) -> impl Iterator<Item = Rect> + '_ {
        self.rows.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, tile)| **tile != EMPTY_TILE)
                .map(move |(col, _)| {
                    let pos = Vec2::new(col as f32, row as f32) * grid_size;
                    Rect::new(pos.x, pos.y, grid_size, grid_size)
                })
        })
    }
}

fn parse_cell(cell: &str) -> i32 {
    let cell = cell.trim();
    if !cell.is_empty() && cell.bytes().all(|b| b.is_ascii_digit()) {
        cell.parse().unwrap_or(EMPTY_TILE)
    } else {
        EMPTY_TILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
-1,-1,3
x,4,
0,1,2
";

    #[test]
    fn test_non_numeric_cells_are_empty() {
        let grid = TileGrid::parse(LEVEL, ',');
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.tile(0, 0), EMPTY_TILE);
        assert_eq!(grid.tile(0, 2), 3);
        assert_eq!(grid.tile(1, 0), EMPTY_TILE);
        assert_eq!(grid.tile(1, 1), 4);
        assert_eq!(grid.tile(1, 2), EMPTY_TILE);
        assert_eq!(grid.tile(9, 9), EMPTY_TILE);
    }

    #[test]
    fn test_obstacles_follow_grid() {
        let grid = TileGrid::parse(LEVEL, ',');
        let rects: Vec<Rect> = grid.obstacles(32.0).collect();
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0], Rect::new(64.0, 0.0, 32.0, 32.0));
        assert_eq!(rects[1], Rect::new(32.0, 32.0, 32.0, 32.0));
        assert_eq!(rects[4], Rect::new(64.0, 64.0, 32.0, 32.0));
    }

    #[test]
    fn test_other_delimiters() {
        let grid = TileGrid::parse("1;2\n;5", ';');
        assert_eq!(grid.obstacles(10.0).count(), 3);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = TileGrid::load("/definitely/not/here.csv", ',');
        assert!(matches!(result, Err(TileMapError::Io(_))));
    }
}
