use grid_pathfinder::config::{Cli, Config, GridSource};
use grid_pathfinder::grid::Grid;
use grid_pathfinder::render;
use grid_pathfinder::scenario::Scenario;
use grid_pathfinder::solver::GridPathfinder;

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const REFERENCE_GRID: [[i64; 4]; 4] = [[2, 3, 1, -1], [1, -1, 4, 2], [1, 2, 3, 1], [3, -1, 2, 1]];

fn load_grid(config: &Config) -> anyhow::Result<Grid> {
    let grid = match config.grid_source() {
        GridSource::File(path) => Grid::from_file(&path)?,
        GridSource::Random { size, seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            Grid::random(
                size,
                config.blocked_ratio,
                config.min_cost..=config.max_cost,
                &mut rng,
            )?
        }
        GridSource::Reference => {
            Grid::from_rows(REFERENCE_GRID.iter().map(|row| row.to_vec()).collect())?
        }
        GridSource::Scenario(path) => bail!("scenario {path} carries its own grid"),
    };
    Ok(grid)
}

fn run_single(config: &Config) -> anyhow::Result<()> {
    let grid = load_grid(config)?;
    let last = grid.size() as isize - 1;
    let start = (config.start[0], config.start[1]);
    let goal = config.goal.map_or((last, last), |[row, col]| (row, col));
    info!("searching {0}x{0} grid from {start:?} to {goal:?}", grid.size());

    let mut pathfinder = GridPathfinder::new(&grid).with_budget(config.budget());
    let outcome = pathfinder
        .search(start, goal)
        .with_context(|| format!("cannot search from {start:?} to {goal:?}"))?;
    pathfinder.stats().print();

    if config.json {
        let report = json!({ "outcome": outcome, "stats": pathfinder.stats() });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::summary(&outcome));
        if config.overlay {
            print!("{}", render::overlay(&grid, &outcome));
        }
    }
    Ok(())
}

fn run_scenario(config: &Config, path: &str) -> anyhow::Result<()> {
    let scenario = Scenario::load_from_file(path)?;
    let grid = scenario.load_grid()?;
    let reports = scenario.run(&grid, config.budget());

    let mut failures = 0;
    let mut json_reports = Vec::with_capacity(reports.len());
    for report in &reports {
        if !report.meets_expectation() {
            failures += 1;
            error!(
                "query {:?} -> {:?} expected cost {:?}, got {:?}",
                report.query.start, report.query.goal, report.query.expected_cost, report.result
            );
        }

        if config.json {
            json_reports.push(json!({
                "start": report.query.start,
                "goal": report.query.goal,
                "expected_cost": report.query.expected_cost,
                "outcome": report.result.as_ref().ok(),
                "error": report.result.as_ref().err().map(ToString::to_string),
                "stats": report.stats,
            }));
            continue;
        }

        println!("{:?} -> {:?}", report.query.start, report.query.goal);
        match &report.result {
            Ok(outcome) => {
                println!("{}", render::summary(outcome));
                if config.overlay {
                    print!("{}", render::overlay(&grid, outcome));
                }
            }
            Err(err) => println!("Error: {err}"),
        }
        report.stats.print();
    }

    if config.json {
        println!("{}", serde_json::to_string_pretty(&json_reports)?);
    }
    if failures > 0 {
        bail!("{failures} of {} queries failed", reports.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    match config.grid_source() {
        GridSource::Scenario(path) => run_scenario(&config, &path),
        _ => run_single(&config),
    }
}
