use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::common::SearchOutcome;
use crate::error::GridError;
use crate::grid::Grid;
use crate::solver::{GridPathfinder, SearchBudget};
use crate::stat::Stats;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Query {
    pub start: [isize; 2],
    pub goal: [isize; 2],
    #[serde(default)]
    pub expected_cost: Option<u64>,
}

/// A grid, given inline or as a path to a grid file, plus the queries to run on it.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub grid: Option<Vec<Vec<i64>>>,
    #[serde(default)]
    pub grid_path: Option<String>,
    pub queries: Vec<Query>,
}

#[derive(Debug)]
pub struct QueryReport {
    pub query: Query,
    pub result: Result<SearchOutcome, GridError>,
    pub stats: Stats,
}

impl QueryReport {
    /// False when the query carried an expected cost and the search disagreed,
    /// or when the query was rejected.
    pub fn meets_expectation(&self) -> bool {
        match (&self.result, self.query.expected_cost) {
            (Err(_), _) => false,
            (Ok(_), None) => true,
            (Ok(SearchOutcome::Found { cost, .. }), Some(expected)) => *cost == expected,
            (Ok(_), Some(_)) => false,
        }
    }
}

impl Scenario {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        if scenario.grid.is_some() == scenario.grid_path.is_some() {
            bail!("scenario must set exactly one of `grid` and `grid_path`");
        }
        Ok(scenario)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let yaml =
            fs::read_to_string(path).with_context(|| format!("failed to read scenario {path}"))?;
        let mut scenario = Scenario::from_yaml_str(&yaml)
            .with_context(|| format!("failed to parse scenario {path}"))?;

        // Grid files are resolved next to the scenario file.
        if let Some(grid_path) = scenario.grid_path.as_mut() {
            if let Some(parent) = Path::new(path).parent() {
                *grid_path = parent.join(&*grid_path).to_string_lossy().into_owned();
            }
        }
        info!("loaded scenario {path} with {} queries", scenario.queries.len());
        Ok(scenario)
    }

    pub fn load_grid(&self) -> Result<Grid> {
        match (&self.grid, &self.grid_path) {
            (Some(rows), _) => Ok(Grid::from_rows(rows.clone())?),
            (None, Some(path)) => Grid::from_file(path),
            (None, None) => Err(anyhow!("scenario has no grid")),
        }
    }

    pub fn run(&self, grid: &Grid, budget: SearchBudget) -> Vec<QueryReport> {
        let mut pathfinder = GridPathfinder::new(grid).with_budget(budget);

        self.queries
            .iter()
            .map(|query| {
                let start = (query.start[0], query.start[1]);
                let goal = (query.goal[0], query.goal[1]);
                let result = pathfinder.search(start, goal);
                let stats = match result {
                    Ok(_) => pathfinder.stats().clone(),
                    Err(_) => Stats::default(),
                };
                debug!("query {start:?} -> {goal:?}: {result:?}");
                QueryReport {
                    query: query.clone(),
                    result,
                    stats,
                }
            })
            .collect()
    }
}
