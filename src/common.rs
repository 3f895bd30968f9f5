mod frontier;

pub(crate) use frontier::FrontierNode;

use serde::Serialize;
use std::fmt;

/// A validated `(row, col)` cell of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// True when `other` is one of the eight cells surrounding `self`.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub type Path = Vec<Position>;

/// Result of one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found { cost: u64, path: Path },
    /// The frontier emptied before the goal was popped.
    Unreachable,
    /// The search budget ran out before a terminal state was reached.
    Aborted { expanded: usize },
}

impl SearchOutcome {
    /// Total cost, `f64::INFINITY` when no path was produced.
    pub fn cost(&self) -> f64 {
        match self {
            SearchOutcome::Found { cost, .. } => *cost as f64,
            _ => f64::INFINITY,
        }
    }

    /// Ordered path from start to goal inclusive, empty when no path was produced.
    pub fn path(&self) -> &[Position] {
        match self {
            SearchOutcome::Found { path, .. } => path,
            _ => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    Succeeded,
    Exhausted,
    Aborted,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchState::Searching)
    }
}
