pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod grid;
pub mod render;
pub mod scenario;
pub mod solver;
pub mod stat;

pub use algorithm::{find_path, AStarSearch};
pub use common::{Path, Position, SearchOutcome, SearchState};
pub use error::GridError;
pub use grid::{Grid, BLOCKED};
pub use solver::{GridPathfinder, SearchBudget};
