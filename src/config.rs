use anyhow::{anyhow, bail, Context};
use clap::Parser;
use serde::Deserialize;
use std::time::Duration;

use crate::solver::SearchBudget;

#[derive(Parser, Debug, Default)]
#[command(
    name = "Grid Pathfinder",
    about = "A* search for minimum-cost paths on weighted 8-connected grids.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to a grid file (one row per line, -1 = blocked)")]
    pub grid_path: Option<String>,

    #[arg(long, help = "Path to a YAML scenario file")]
    pub scenario_path: Option<String>,

    #[arg(
        long,
        help = "Start cell as row,col",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub start: Option<Vec<isize>>,

    #[arg(
        long,
        help = "Goal cell as row,col [default: bottom-right cell]",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub goal: Option<Vec<isize>>,

    #[arg(long, help = "Search a random grid of this size")]
    pub random_size: Option<usize>,

    #[arg(long, help = "Seed for the random grid generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Share of blocked cells in a random grid")]
    pub blocked_ratio: Option<f64>,

    #[arg(long, help = "Lowest cell cost in a random grid")]
    pub min_cost: Option<u64>,

    #[arg(long, help = "Highest cell cost in a random grid")]
    pub max_cost: Option<u64>,

    #[arg(long, help = "Abort a search after this many expansions")]
    pub max_expansions: Option<usize>,

    #[arg(long, help = "Abort a search after this many milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, help = "Print results as JSON", default_value_t = false)]
    pub json: bool,

    #[arg(long, help = "Draw the path over the grid", default_value_t = false)]
    pub overlay: bool,

    #[arg(long, help = "Log filter used when RUST_LOG is unset")]
    pub log_level: Option<String>,
}

/// Where the grid to search comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GridSource {
    Scenario(String),
    File(String),
    Random { size: usize, seed: u64 },
    Reference,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid_path: Option<String>,
    pub scenario_path: Option<String>,
    pub start: [isize; 2],
    pub goal: Option<[isize; 2]>,
    pub random_size: Option<usize>,
    pub seed: u64,
    pub blocked_ratio: f64,
    pub min_cost: u64,
    pub max_cost: u64,
    pub max_expansions: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub json: bool,
    pub overlay: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_path: None,
            scenario_path: None,
            start: [0, 0],
            goal: None,
            random_size: None,
            seed: 0,
            blocked_ratio: 0.2,
            min_cost: 1,
            max_cost: 9,
            max_expansions: None,
            timeout_ms: None,
            json: false,
            overlay: false,
            log_level: "info".to_string(),
        }
    }
}

fn coordinate_pair(values: &[isize], name: &str) -> anyhow::Result<[isize; 2]> {
    match values {
        [row, col] => Ok([*row, *col]),
        _ => Err(anyhow!(
            "--{name} expects exactly two values as row,col, got {values:?}"
        )),
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid config")
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(grid_path) = &cli.grid_path {
            self.grid_path = Some(grid_path.clone());
        }
        if let Some(scenario_path) = &cli.scenario_path {
            self.scenario_path = Some(scenario_path.clone());
        }
        if let Some(start) = &cli.start {
            self.start = coordinate_pair(start, "start")?;
        }
        if let Some(goal) = &cli.goal {
            self.goal = Some(coordinate_pair(goal, "goal")?);
        }
        if let Some(random_size) = cli.random_size {
            self.random_size = Some(random_size);
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(blocked_ratio) = cli.blocked_ratio {
            self.blocked_ratio = blocked_ratio;
        }
        if let Some(min_cost) = cli.min_cost {
            self.min_cost = min_cost;
        }
        if let Some(max_cost) = cli.max_cost {
            self.max_cost = max_cost;
        }
        if let Some(max_expansions) = cli.max_expansions {
            self.max_expansions = Some(max_expansions);
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.timeout_ms = Some(timeout_ms);
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }
        self.json |= cli.json;
        self.overlay |= cli.overlay;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let sources = [
            self.grid_path.is_some(),
            self.scenario_path.is_some(),
            self.random_size.is_some(),
        ];
        if sources.iter().filter(|&&set| set).count() > 1 {
            bail!("grid_path, scenario_path and random_size are mutually exclusive");
        }

        if self.random_size == Some(0) {
            bail!("Random grid size must be greater than 0");
        }
        if !(0.0..1.0).contains(&self.blocked_ratio) {
            bail!(
                "Blocked ratio must be in [0, 1), got {}",
                self.blocked_ratio
            );
        }
        if self.min_cost > self.max_cost {
            bail!(
                "Min cost {} is greater than max cost {}",
                self.min_cost,
                self.max_cost
            );
        }
        if self.max_cost > i64::MAX as u64 {
            bail!("Max cost {} does not fit a grid cell", self.max_cost);
        }
        Ok(())
    }

    pub fn grid_source(&self) -> GridSource {
        if let Some(path) = &self.scenario_path {
            GridSource::Scenario(path.clone())
        } else if let Some(path) = &self.grid_path {
            GridSource::File(path.clone())
        } else if let Some(size) = self.random_size {
            GridSource::Random {
                size,
                seed: self.seed,
            }
        } else {
            GridSource::Reference
        }
    }

    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_expansions: self.max_expansions,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_source(), GridSource::Reference);
        assert_eq!(config.budget(), SearchBudget::unlimited());
    }

    #[test]
    fn test_from_yaml_str() {
        let config = Config::from_yaml_str(
            "grid_path: grid_file/test/reference.grid\nstart: [1, 0]\ngoal: [3, 3]\nmax_expansions: 50\ntimeout_ms: 20\n",
        )
        .unwrap();
        assert_eq!(config.start, [1, 0]);
        assert_eq!(config.goal, Some([3, 3]));
        assert_eq!(
            config.grid_source(),
            GridSource::File("grid_file/test/reference.grid".to_string())
        );
        assert_eq!(
            config.budget(),
            SearchBudget {
                max_expansions: Some(50),
                timeout: Some(Duration::from_millis(20)),
            }
        );
        // Unset fields keep their defaults.
        assert_eq!(config.log_level, "info");

        assert!(Config::from_yaml_str("unknown_field: 1\n").is_err());
    }

    #[test]
    fn test_example_config_file() {
        let yaml = std::fs::read_to_string("config.yaml").unwrap();
        let config = Config::from_yaml_str(&yaml).unwrap();
        assert!(config.validate().is_ok());
        assert!(matches!(config.grid_source(), GridSource::Scenario(_)));
    }

    #[test]
    fn test_override_from_command_line() {
        let cli = Cli::parse_from([
            "grid_pathfinder",
            "--random-size",
            "16",
            "--seed",
            "3",
            "--start",
            "2,-1",
            "--goal",
            "15,15",
            "--json",
        ]);
        let config = Config::default().override_from_command_line(&cli).unwrap();
        assert_eq!(config.start, [2, -1]);
        assert_eq!(config.goal, Some([15, 15]));
        assert!(config.json);
        assert_eq!(config.grid_source(), GridSource::Random { size: 16, seed: 3 });
    }

    #[test]
    fn test_override_rejects_bad_coordinate() {
        let cli = Cli {
            start: Some(vec![1, 2, 3]),
            ..Cli::default()
        };
        assert!(Config::default().override_from_command_line(&cli).is_err());
    }

    #[test]
    fn test_validate() {
        let config = Config {
            grid_path: Some("a.grid".to_string()),
            random_size: Some(4),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            random_size: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            blocked_ratio: 1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            min_cost: 5,
            max_cost: 2,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
