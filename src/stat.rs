use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub expanded_nodes: usize,
    pub pushed_nodes: usize,
    pub stale_nodes: usize,
    pub time_us: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Time(microseconds) {:?} Expand nodes number: {:?} Pushed nodes number: {:?} Stale nodes number: {:?}",
            self.time_us, self.expanded_nodes, self.pushed_nodes, self.stale_nodes
        );
    }
}
