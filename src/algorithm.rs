mod astar;

pub use astar::{find_path, AStarSearch};

use crate::common::{Path, Position};

/// Euclidean distance from `position` to `goal`.
///
/// Admissible and consistent only while every entered cell costs at least
/// `sqrt(2)`, i.e. 2 in integer costs. Cheaper cells make diagonal moves
/// overestimate and the search loses its optimality guarantee.
pub(crate) fn heuristic(position: Position, goal: Position) -> f64 {
    let dr = position.row.abs_diff(goal.row);
    let dc = position.col.abs_diff(goal.col);
    ((dr * dr + dc * dc) as f64).sqrt()
}

/// Walks the predecessor table back from `goal` to `start`.
///
/// `came_from` is indexed by row-major offset. The walk is bounded by the
/// table length so a broken chain can never loop.
pub(crate) fn construct_path(
    came_from: &[Option<Position>],
    size: usize,
    start: Position,
    goal: Position,
) -> Path {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start && path.len() <= came_from.len() {
        match came_from[current.row * size + current.col] {
            Some(previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    debug_assert_eq!(path.first(), Some(&start), "predecessor chain does not reach start");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_is_euclidean() {
        let goal = Position::new(3, 3);
        assert_eq!(heuristic(goal, goal), 0.0);
        assert_eq!(heuristic(Position::new(3, 0), goal), 3.0);
        assert_eq!(heuristic(Position::new(0, 0), goal), 18f64.sqrt());
        assert_eq!(heuristic(Position::new(0, 3), Position::new(4, 0)), 5.0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "predecessor chain does not reach start")]
    fn test_construct_path_broken_chain() {
        let size = 3;
        let mut came_from = vec![None; size * size];
        // (2, 2) <- (1, 1), but (1, 1) has no predecessor.
        came_from[8] = Some(Position::new(1, 1));
        construct_path(&came_from, size, Position::new(0, 0), Position::new(2, 2));
    }

    #[test]
    fn test_construct_path() {
        let size = 3;
        let mut came_from = vec![None; size * size];
        // (0, 0) -> (1, 1) -> (1, 2) -> (2, 2)
        came_from[4] = Some(Position::new(0, 0));
        came_from[5] = Some(Position::new(1, 1));
        came_from[8] = Some(Position::new(1, 2));

        let path = construct_path(&came_from, size, Position::new(0, 0), Position::new(2, 2));
        assert_eq!(
            path,
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 2)
            ]
        );

        let path = construct_path(&came_from, size, Position::new(1, 1), Position::new(1, 1));
        assert_eq!(path, vec![Position::new(1, 1)]);
    }
}
