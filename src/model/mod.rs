pub use petri_core::{Dish, DishState, Rule, ValuePolicy};
pub mod analysis {
    pub use petri_core::analysis::*;
    pub use petri_data::{GenerationAnalysis, RunSummary};
}
pub mod cell {
    pub use petri_data::{Cell, Topology, BASE_ALIVE, DEAD};
}
pub mod config {
    pub use petri_core::config::*;
}
pub mod dish {
    pub use petri_core::dish::*;
}
pub mod grid {
    pub use petri_core::grid::*;
}
pub mod metrics {
    pub use petri_core::metrics::*;
}
pub mod rule {
    pub use petri_core::rule::*;
}
pub mod pattern {
    pub use petri_io::pattern::*;
}
pub mod report {
    pub use petri_io::report::*;
}
pub mod frames {
    pub use petri_io::frames::*;
}
