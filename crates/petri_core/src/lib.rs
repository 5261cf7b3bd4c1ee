//! # Petri Core
//!
//! The automaton engine of the Petri dish simulation.
//!
//! This crate contains the deterministic stepping logic:
//! - Grid storage with toroidal or bounded edges
//! - Birth/survival rules with binary or aging cell values
//! - The dish controller with double-buffered generation steps
//! - Per-generation and run-level analysis (extinction, freeze, statistics)
//! - Configuration, metrics, and structured logging
//!
//! ## Example
//!
//! ```
//! use petri_core::{Dish, Rule};
//! use petri_data::Topology;
//!
//! let mut dish = Dish::new(64, 64, Rule::conway(), Topology::Toroidal).unwrap();
//! dish.randomize(42, 0.35);
//!
//! let analysis = dish.next_gen();
//! assert_eq!(analysis.generation, 1);
//! assert_eq!(dish.get_buffer().len(), 64 * 64);
//! ```

/// Run-level accumulation of generation analyses
pub mod analysis;
/// Configuration management for run parameters
pub mod config;
/// The dish controller and its generation step
pub mod dish;
/// Engine error types
pub mod error;
/// Cell storage with edge policy and neighbor counting
pub mod grid;
/// Run metrics collection and logging setup
pub mod metrics;
/// Birth/survival rules and their notation
pub mod rule;

pub use analysis::FinalAnalysis;
pub use config::AppConfig;
pub use dish::{Dish, DishState};
pub use error::{CoreError, Result};
pub use grid::Grid;
pub use metrics::{init_logging, Metrics};
pub use rule::{Rule, RuleParseError, ValuePolicy};
