use serde::{Deserialize, Serialize};

/// State of a single cell. Zero is dead; any positive value is a living
/// organism whose magnitude may carry age or intensity for coloring.
pub type Cell = u8;

/// The empty/dead cell value.
pub const DEAD: Cell = 0;

/// Value given to a newly born organism.
pub const BASE_ALIVE: Cell = 1;

/// Edge behavior of the grid, fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Edges wrap around; every coordinate resolves to a cell.
    #[default]
    Toroidal,
    /// Edges are hard walls; coordinates outside the grid are rejected and
    /// off-grid neighbors count as dead.
    Bounded,
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topology::Toroidal => write!(f, "toroidal"),
            Topology::Bounded => write!(f, "bounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_serde_lowercase() {
        let json = serde_json::to_string(&Topology::Bounded).unwrap();
        assert_eq!(json, "\"bounded\"");
        let back: Topology = serde_json::from_str("\"toroidal\"").unwrap();
        assert_eq!(back, Topology::Toroidal);
    }
}
