//! Static tile map for a single level.
//!
//! The grid is built once per level from a validated [`crate::LevelDefinition`]
//! and replaced wholesale on reset or advance. The only in-level mutations are
//! breakable walls turning into floor and (optionally) traps being disarmed.

use crate::error::{ErrorSeverity, GameError};

use super::Position;

/// Terrain class of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    #[default]
    Empty,
    Wall,
    BreakableWall,
    Trap,
}

impl CellType {
    /// Numeric code used by level files.
    pub const fn code(self) -> u8 {
        match self {
            CellType::Empty => 0,
            CellType::Wall => 1,
            CellType::BreakableWall => 4,
            CellType::Trap => 5,
        }
    }

    /// Parses a terrain code. Spawn markers (2, 3) are not terrain and are
    /// rejected here; the level loader strips them first.
    pub fn from_code(code: i32) -> Result<Self, GridError> {
        match code {
            0 => Ok(CellType::Empty),
            1 => Ok(CellType::Wall),
            4 => Ok(CellType::BreakableWall),
            5 => Ok(CellType::Trap),
            other => Err(GridError::UnknownCellCode(other)),
        }
    }

    /// Static passability for slide purposes. Only hard walls are impassable;
    /// traps are passable but trigger an effect, and the slide logic stops in
    /// front of breakable walls on its own.
    pub const fn is_passable_static(self) -> bool {
        !matches!(self, CellType::Wall)
    }

    /// Whether a knockback into this cell counts as slamming into an obstruction.
    pub const fn is_obstruction(self) -> bool {
        matches!(self, CellType::Wall | CellType::BreakableWall)
    }

    const fn glyph(self) -> char {
        match self {
            CellType::Empty => '.',
            CellType::Wall => '#',
            CellType::BreakableWall => '%',
            CellType::Trap => '^',
        }
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(CellType::Empty),
            '#' => Some(CellType::Wall),
            '%' => Some(CellType::BreakableWall),
            '^' => Some(CellType::Trap),
            _ => None,
        }
    }
}

/// Errors raised by grid construction and access.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfRange {
        position: Position,
        width: u32,
        height: u32,
    },

    #[error("grid dimensions must be positive (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("grid expects {expected} cells but {actual} were supplied")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("unknown cell code {0}")]
    UnknownCellCode(i32),

    #[error("unknown cell glyph {0:?}")]
    UnknownGlyph(char),
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::OutOfRange { .. } => "GRID_OUT_OF_RANGE",
            GridError::InvalidDimensions { .. } => "GRID_INVALID_DIMENSIONS",
            GridError::CellCountMismatch { .. } => "GRID_CELL_COUNT_MISMATCH",
            GridError::UnknownCellCode(_) => "GRID_UNKNOWN_CELL_CODE",
            GridError::UnknownGlyph(_) => "GRID_UNKNOWN_GLYPH",
        }
    }
}

/// Rectangular tile map stored row-major, `y = 0` first.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellType>,
}

impl Grid {
    /// Builds a grid from row-major cells (`index = y * width + x`).
    pub fn new(width: u32, height: u32, cells: Vec<CellType>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid where every cell has the same terrain.
    pub fn filled(width: u32, height: u32, cell: CellType) -> Result<Self, GridError> {
        Self::new(width, height, vec![cell; width as usize * height as usize])
    }

    /// Parses an ASCII picture, top line = highest `y`.
    ///
    /// Legend: `.` empty, `#` wall, `%` breakable wall, `^` trap.
    ///
    /// ```
    /// use jelly_core::{CellType, Grid, Position};
    ///
    /// let grid = Grid::from_ascii(&[
    ///     "###",
    ///     "#^%",
    /// ]).unwrap();
    /// assert_eq!(grid.cell_at(Position::new(1, 0)).unwrap(), CellType::Trap);
    /// assert_eq!(grid.cell_at(Position::new(0, 1)).unwrap(), CellType::Wall);
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GridError> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.chars().count()) as u32;
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in rows.iter().rev() {
            let parsed = row
                .chars()
                .map(|glyph| CellType::from_glyph(glyph).ok_or(GridError::UnknownGlyph(glyph)))
                .collect::<Result<Vec<_>, _>>()?;
            if parsed.len() != width as usize {
                return Err(GridError::CellCountMismatch {
                    expected: width as usize,
                    actual: parsed.len(),
                });
            }
            cells.extend(parsed);
        }
        Self::new(width, height, cells)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Longest straight line through the grid; upper bound for any slide.
    pub fn max_extent(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Result<usize, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfRange {
                position,
                width: self.width,
                height: self.height,
            });
        }
        Ok(position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn cell_at(&self, position: Position) -> Result<CellType, GridError> {
        let index = self.index(position)?;
        Ok(self.cells[index])
    }

    /// Overwrites a cell. Used for breakable-wall destruction and trap disarming.
    pub fn set_cell(&mut self, position: Position, cell: CellType) -> Result<(), GridError> {
        let index = self.index(position)?;
        self.cells[index] = cell;
        Ok(())
    }

    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    /// Iterates `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellType)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let position = Position::new((index % width) as i32, (index / width) as i32);
            (position, *cell)
        })
    }

    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Renders the grid back into the [`Grid::from_ascii`] format.
    pub fn to_ascii(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .rev()
            .map(|row| row.iter().map(|cell| cell.glyph()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(
            Grid::filled(0, 3, CellType::Empty),
            Err(GridError::InvalidDimensions { width: 0, height: 3 })
        );
    }

    #[test]
    fn rejects_wrong_cell_count() {
        let err = Grid::new(2, 2, vec![CellType::Empty; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::CellCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let grid = Grid::filled(3, 2, CellType::Empty).unwrap();
        for position in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(3, 0),
            Position::new(0, 2),
        ] {
            let err = grid.cell_at(position).unwrap_err();
            assert_eq!(err.error_code(), "GRID_OUT_OF_RANGE");
        }
    }

    #[test]
    fn set_cell_breaks_wall() {
        let mut grid = Grid::from_ascii(&[".%."]).unwrap();
        let wall = Position::new(1, 0);
        assert_eq!(grid.cell_at(wall).unwrap(), CellType::BreakableWall);
        grid.set_cell(wall, CellType::Empty).unwrap();
        assert_eq!(grid.cell_at(wall).unwrap(), CellType::Empty);
        assert_eq!(grid.count(CellType::BreakableWall), 0);
    }

    #[test]
    fn ascii_round_trips_with_north_up() {
        let rows = ["#..", "^%#"];
        let grid = Grid::from_ascii(&rows).unwrap();
        assert_eq!(grid.cell_at(Position::new(0, 1)).unwrap(), CellType::Wall);
        assert_eq!(grid.cell_at(Position::new(0, 0)).unwrap(), CellType::Trap);
        assert_eq!(grid.to_ascii(), rows.map(String::from).to_vec());
    }

    #[test]
    fn ragged_ascii_is_rejected() {
        assert!(matches!(
            Grid::from_ascii(&["...", ".."]),
            Err(GridError::CellCountMismatch { .. })
        ));
        assert_eq!(Grid::from_ascii(&["x"]), Err(GridError::UnknownGlyph('x')));
    }

    #[test]
    fn only_hard_walls_are_statically_impassable() {
        for cell in CellType::iter() {
            assert_eq!(cell.is_passable_static(), cell != CellType::Wall);
        }
    }

    #[test]
    fn codes_round_trip() {
        for cell in CellType::iter() {
            assert_eq!(CellType::from_code(i32::from(cell.code())), Ok(cell));
        }
        assert_eq!(CellType::from_code(2), Err(GridError::UnknownCellCode(2)));
    }
}
