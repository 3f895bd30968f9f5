use super::{construct_path, heuristic};
use crate::common::{FrontierNode, Position, SearchOutcome, SearchState};
use crate::error::GridError;
use crate::grid::Grid;
use crate::stat::Stats;

use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// One A* run over an 8-connected grid.
///
/// All score tables are owned by this value and sized to the grid. Each call
/// to [`AStarSearch::step`] pops exactly one frontier entry; `Succeeded`,
/// `Exhausted` and `Aborted` are terminal.
#[derive(Debug)]
pub struct AStarSearch<'g> {
    grid: &'g Grid,
    start: Position,
    goal: Position,
    g_score: Vec<u64>,
    f_score: Vec<f64>,
    came_from: Vec<Option<Position>>,
    visited: Vec<bool>,
    frontier: BinaryHeap<FrontierNode>,
    state: SearchState,
    stats: Stats,
    started: Instant,
}

impl<'g> AStarSearch<'g> {
    /// Validates both endpoints and seeds the frontier with `start`.
    pub fn new(
        grid: &'g Grid,
        start: (isize, isize),
        goal: (isize, isize),
    ) -> Result<Self, GridError> {
        let start = grid.locate(start)?;
        let goal = grid.locate(goal)?;
        grid.ensure_passable(start)?;
        grid.ensure_passable(goal)?;

        let cells = grid.size() * grid.size();
        let mut search = AStarSearch {
            grid,
            start,
            goal,
            g_score: vec![u64::MAX; cells],
            f_score: vec![f64::INFINITY; cells],
            came_from: vec![None; cells],
            visited: vec![false; cells],
            frontier: BinaryHeap::new(),
            state: SearchState::Searching,
            stats: Stats::default(),
            started: Instant::now(),
        };

        // The start cell's own cost is counted.
        let start_index = grid.offset(start);
        let start_g = grid.value(start) as u64;
        let start_f = start_g as f64 + heuristic(start, goal);
        search.g_score[start_index] = start_g;
        search.f_score[start_index] = start_f;
        search.push(start, start_f);

        Ok(search)
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn push(&mut self, position: Position, f_cost: f64) {
        self.frontier.push(FrontierNode { position, f_cost });
        self.stats.pushed_nodes += 1;
    }

    /// Pops one frontier entry and expands it unless it is the goal or stale.
    pub fn step(&mut self) -> SearchState {
        if self.state.is_terminal() {
            return self.state;
        }

        let Some(current) = self.frontier.pop() else {
            debug!("frontier exhausted");
            self.state = SearchState::Exhausted;
            return self.state;
        };
        trace!("pop node: {current:?}");

        if current.position == self.goal {
            self.state = SearchState::Succeeded;
            return self.state;
        }

        let current_index = self.grid.offset(current.position);
        if self.visited[current_index] {
            self.stats.stale_nodes += 1;
            return self.state;
        }
        self.visited[current_index] = true;
        self.stats.expanded_nodes += 1;

        let current_g = self.g_score[current_index];
        for neighbor in self.grid.get_neighbors(current.position) {
            let Some(cost) = self.grid.cost(neighbor) else {
                continue;
            };
            let neighbor_index = self.grid.offset(neighbor);

            // Entering a cell is charged that cell's cost.
            let tentative_g_cost = current_g.saturating_add(cost);
            let tentative_f_cost = tentative_g_cost as f64 + heuristic(neighbor, self.goal);

            // Compared on f, not g. Visited neighbours are not excluded.
            if tentative_f_cost < self.f_score[neighbor_index] {
                self.came_from[neighbor_index] = Some(current.position);
                self.g_score[neighbor_index] = tentative_g_cost;
                self.f_score[neighbor_index] = tentative_f_cost;
                self.push(neighbor, tentative_f_cost);
            }
        }
        trace!("frontier size {}", self.frontier.len());

        self.state
    }

    /// Stops a search that has not reached a terminal state.
    pub fn abort(&mut self) -> SearchState {
        if !self.state.is_terminal() {
            debug!("search aborted after {} expansions", self.stats.expanded_nodes);
            self.state = SearchState::Aborted;
        }
        self.state
    }

    /// Consumes the search. An unfinished search is reported as aborted.
    ///
    /// `time_us` in the returned stats covers construction to this call.
    pub fn finish(mut self) -> (SearchOutcome, Stats) {
        self.stats.time_us = self.started.elapsed().as_micros() as usize;
        let outcome = match self.state {
            SearchState::Succeeded => SearchOutcome::Found {
                cost: self.g_score[self.grid.offset(self.goal)],
                path: construct_path(&self.came_from, self.grid.size(), self.start, self.goal),
            },
            SearchState::Exhausted => SearchOutcome::Unreachable,
            SearchState::Searching | SearchState::Aborted => SearchOutcome::Aborted {
                expanded: self.stats.expanded_nodes,
            },
        };
        (outcome, self.stats)
    }
}

/// Minimum-cost path from `start` to `goal` over an 8-connected grid.
///
/// The cost of a path is the sum of the costs of every cell on it, the start
/// cell included. Frontier ties on f are broken by lexicographic `(row, col)`,
/// so results are reproducible. Optimality holds only while every passable
/// cell costs at least 2; see [`heuristic`](super::heuristic).
///
/// Precondition violations are returned as [`GridError`]; an unreachable goal
/// is [`SearchOutcome::Unreachable`].
#[instrument(skip_all, name = "a_star", fields(start = ?start, goal = ?goal), level = "debug")]
pub fn find_path(
    grid: &Grid,
    start: (isize, isize),
    goal: (isize, isize),
) -> Result<SearchOutcome, GridError> {
    let mut search = AStarSearch::new(grid, start, goal)?;
    while !search.step().is_terminal() {}
    let (outcome, stats) = search.finish();
    debug!("outcome: {outcome:?}, stats: {stats:?}");
    Ok(outcome)
}
