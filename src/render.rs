//! Human-readable output for diagnostics and the command-line demo.

use std::collections::HashSet;
use std::fmt::Write;

use crate::common::{Position, SearchOutcome};
use crate::grid::Grid;

/// Two-line summary: the total cost and the arrow-joined path.
pub fn summary(outcome: &SearchOutcome) -> String {
    let cost = match outcome {
        SearchOutcome::Found { cost, .. } => cost.to_string(),
        SearchOutcome::Unreachable => "inf".to_string(),
        SearchOutcome::Aborted { expanded } => format!("inf (aborted after {expanded} expansions)"),
    };
    let path = outcome
        .path()
        .iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join(" → ");
    format!("Optimal Cost: {cost}\nOptimal Path: {path}")
}

/// Draws the grid with `#` for blocked cells, `S`/`G` for the endpoints, `*`
/// for the rest of the path and `.` elsewhere.
pub fn overlay(grid: &Grid, outcome: &SearchOutcome) -> String {
    let path = outcome.path();
    let on_path: HashSet<&Position> = path.iter().collect();
    let mut out = String::new();

    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let position = Position::new(row, col);
            let symbol = if !grid.is_passable(position) {
                '#'
            } else if path.first() == Some(&position) {
                'S'
            } else if path.last() == Some(&position) {
                'G'
            } else if on_path.contains(&position) {
                '*'
            } else {
                '.'
            };
            out.push(symbol);
        }
        let _ = writeln!(out);
    }

    out
}
