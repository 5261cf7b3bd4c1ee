//! Plain value types shared by the Petri engine, its collaborators, and the
//! run orchestration.

pub mod data;

pub use data::analysis::{GenerationAnalysis, RunSummary};
pub use data::cell::{Cell, Topology, BASE_ALIVE, DEAD};
