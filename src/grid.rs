use anyhow::Context;
use rand::Rng;
use std::fs;
use std::ops::RangeInclusive;

use crate::common::Position;
use crate::error::GridError;

/// Cell value marking an impassable cell.
pub const BLOCKED: i64 = -1;

// Up, down, left, right, up-left, up-right, down-left, down-right
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Immutable square cost grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<i64>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::InvalidGrid {
                reason: "grid has no rows".to_string(),
            });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(GridError::InvalidGrid {
                    reason: format!(
                        "row {row} has {} cells, expected {size} for a square grid",
                        values.len()
                    ),
                });
            }
            if let Some((col, value)) = values.iter().enumerate().find(|(_, &v)| v < BLOCKED) {
                return Err(GridError::InvalidGrid {
                    reason: format!("cell ({row}, {col}) holds {value}, expected {BLOCKED} or a non-negative cost"),
                });
            }
            cells.extend(values);
        }

        Ok(Grid { size, cells })
    }

    /// Parses whitespace-separated integers, one row per line. Blank lines and
    /// lines starting with `#` are skipped.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut rows = Vec::new();
        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<i64>().with_context(|| {
                        format!("line {}: invalid cell value `{token}`", line_number + 1)
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            rows.push(row);
        }
        Ok(Grid::from_rows(rows)?)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("failed to read grid file {path}"))?;
        Grid::parse(&text).with_context(|| format!("failed to parse grid file {path}"))
    }

    /// Random grid with roughly `blocked_ratio` of cells blocked and the rest
    /// drawn uniformly from `cost_range`. `blocked_ratio` must lie in `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(
        size: usize,
        blocked_ratio: f64,
        cost_range: RangeInclusive<u64>,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        if !(0.0..1.0).contains(&blocked_ratio) {
            return Err(GridError::InvalidGrid {
                reason: format!("blocked ratio {blocked_ratio} outside [0, 1)"),
            });
        }
        if cost_range.is_empty() {
            return Err(GridError::InvalidGrid {
                reason: "empty cost range".to_string(),
            });
        }

        let rows = (0..size)
            .map(|_| {
                (0..size)
                    .map(|_| {
                        if rng.gen_bool(blocked_ratio) {
                            BLOCKED
                        } else {
                            rng.gen_range(cost_range.clone()) as i64
                        }
                    })
                    .collect()
            })
            .collect();
        Grid::from_rows(rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn offset(&self, position: Position) -> usize {
        position.row * self.size + position.col
    }

    pub fn value(&self, position: Position) -> i64 {
        self.cells[self.offset(position)]
    }

    pub fn is_passable(&self, position: Position) -> bool {
        self.value(position) != BLOCKED
    }

    /// Traversal cost of entering `position`, `None` if blocked.
    pub fn cost(&self, position: Position) -> Option<u64> {
        let value = self.value(position);
        (value != BLOCKED).then_some(value as u64)
    }

    /// Checks a signed coordinate against the grid bounds.
    pub fn locate(&self, coord: (isize, isize)) -> Result<Position, GridError> {
        let (row, col) = coord;
        let in_bounds = |v: isize| v >= 0 && (v as usize) < self.size;
        if in_bounds(row) && in_bounds(col) {
            Ok(Position::new(row as usize, col as usize))
        } else {
            Err(GridError::InvalidCoordinate {
                coord,
                size: self.size,
            })
        }
    }

    /// Rejects a blocked search endpoint.
    pub fn ensure_passable(&self, position: Position) -> Result<(), GridError> {
        if self.is_passable(position) {
            Ok(())
        } else {
            Err(GridError::BlockedEndpoint {
                coord: (position.row, position.col),
            })
        }
    }

    /// In-bounds, passable cells among the eight surrounding `position`.
    pub fn get_neighbors(&self, position: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(DIRECTIONS.len());

        for &(dr, dc) in &DIRECTIONS {
            let new_row = position.row as isize + dr;
            let new_col = position.col as isize + dc;
            if new_row >= 0
                && new_col >= 0
                && new_row < self.size as isize
                && new_col < self.size as isize
            {
                let neighbor = Position::new(new_row as usize, new_col as usize);
                if self.is_passable(neighbor) {
                    neighbors.push(neighbor);
                }
            }
        }

        neighbors
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        self.cells.chunks(self.size)
    }
}
