use crate::algorithm::AStarSearch;
use crate::common::{SearchOutcome, SearchState};
use crate::error::GridError;
use crate::grid::Grid;
use crate::stat::Stats;

use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Optional limits on a single search. The default is unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_expansions: Option<usize>,
    pub timeout: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        SearchBudget::default()
    }

    fn exceeded(&self, expanded: usize, started: Instant) -> bool {
        self.max_expansions.is_some_and(|max| expanded >= max)
            || self.timeout.is_some_and(|timeout| started.elapsed() >= timeout)
    }
}

/// Runs budgeted A* searches over one shared grid.
///
/// The grid is only borrowed, so several pathfinders (one per thread) may
/// search the same grid at once.
pub struct GridPathfinder<'g> {
    grid: &'g Grid,
    budget: SearchBudget,
    stats: Stats,
}

impl<'g> GridPathfinder<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        GridPathfinder {
            grid,
            budget: SearchBudget::unlimited(),
            stats: Stats::default(),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[instrument(skip_all, name = "grid_pathfinder", fields(start = ?start, goal = ?goal), level = "debug")]
    pub fn search(
        &mut self,
        start: (isize, isize),
        goal: (isize, isize),
    ) -> Result<SearchOutcome, GridError> {
        let started = Instant::now();
        let mut search = AStarSearch::new(self.grid, start, goal)?;

        while search.state() == SearchState::Searching {
            if self.budget.exceeded(search.stats().expanded_nodes, started) {
                search.abort();
                break;
            }
            search.step();
        }

        let (outcome, stats) = search.finish();
        debug!("outcome: {outcome:?}");
        self.stats = stats;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::find_path;
    use crate::common::Position;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::thread;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .try_init();
    }

    fn reference_grid() -> Grid {
        Grid::from_rows(vec![
            vec![2, 3, 1, -1],
            vec![1, -1, 4, 2],
            vec![1, 2, 3, 1],
            vec![3, -1, 2, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_unlimited_budget_matches_find_path() {
        init_tracing();
        let grid = reference_grid();
        let mut pathfinder = GridPathfinder::new(&grid);
        let outcome = pathfinder.search((0, 0), (3, 3)).unwrap();
        assert_eq!(outcome, find_path(&grid, (0, 0), (3, 3)).unwrap());
        assert_eq!(outcome.cost(), 8.0);

        let stats = pathfinder.stats();
        stats.print();
        assert!(stats.expanded_nodes > 0);
        assert!(stats.pushed_nodes >= stats.expanded_nodes);
    }

    #[test]
    fn test_expansion_budget_aborts() {
        init_tracing();
        let grid = reference_grid();
        let mut pathfinder = GridPathfinder::new(&grid).with_budget(SearchBudget {
            max_expansions: Some(1),
            timeout: None,
        });
        let outcome = pathfinder.search((0, 0), (3, 3)).unwrap();
        assert_eq!(outcome, SearchOutcome::Aborted { expanded: 1 });
        assert!(outcome.cost().is_infinite());
        assert!(outcome.path().is_empty());
    }

    #[test]
    fn test_budget_not_hit_on_trivial_search() {
        let grid = reference_grid();
        // Goal is popped before any expansion.
        let mut pathfinder = GridPathfinder::new(&grid).with_budget(SearchBudget {
            max_expansions: Some(1),
            timeout: None,
        });
        let outcome = pathfinder.search((2, 2), (2, 2)).unwrap();
        assert_eq!(outcome.path(), &[Position::new(2, 2)]);
    }

    #[test]
    fn test_zero_timeout_aborts() {
        let grid = reference_grid();
        let mut pathfinder = GridPathfinder::new(&grid).with_budget(SearchBudget {
            max_expansions: None,
            timeout: Some(Duration::ZERO),
        });
        let outcome = pathfinder.search((0, 0), (3, 3)).unwrap();
        assert_eq!(outcome, SearchOutcome::Aborted { expanded: 0 });
    }

    #[test]
    fn test_precondition_errors_are_not_outcomes() {
        let grid = reference_grid();
        let mut pathfinder = GridPathfinder::new(&grid);
        assert!(matches!(
            pathfinder.search((-1, 0), (3, 3)),
            Err(GridError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            pathfinder.search((0, 0), (3, 1)),
            Err(GridError::BlockedEndpoint { .. })
        ));
    }

    #[test]
    fn test_concurrent_searches_share_grid() {
        init_tracing();
        let grid = Grid::random(24, 0.2, 2..=9, &mut StdRng::seed_from_u64(5)).unwrap();
        let queries: Vec<((isize, isize), (isize, isize))> = (0..8)
            .map(|i| ((i, 0), (23 - i, 23)))
            .collect();

        let sequential: Vec<_> = queries
            .iter()
            .map(|&(start, goal)| find_path(&grid, start, goal))
            .collect();

        let parallel: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = queries
                .iter()
                .map(|&(start, goal)| {
                    let grid = &grid;
                    scope.spawn(move || GridPathfinder::new(grid).search(start, goal))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(sequential, parallel);
    }
}
