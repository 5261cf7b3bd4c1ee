//! Error types for the automaton engine.
//!
//! Per-generation outcomes (death, freeze) are never errors; only malformed
//! input and invalid coordinates are.

use crate::rule::RuleParseError;
use petri_data::Cell;
use thiserror::Error;

/// Main error type for petri_core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Coordinates outside a bounded grid.
    #[error("coordinates ({x}, {y}) are outside the {width}x{height} grid")]
    OutOfRange {
        x: i64,
        y: i64,
        width: u16,
        height: u16,
    },

    /// Zero-sized grids cannot hold a population.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },

    /// A flat buffer does not match the grid it is meant to fill.
    #[error("buffer holds {actual} cells but a {width}x{height} grid needs {expected}")]
    BufferLength {
        width: u16,
        height: u16,
        expected: usize,
        actual: usize,
    },

    /// Cell value above the maximum allowed by the active rule.
    #[error("cell value {value} exceeds the rule maximum of {max}")]
    CellValue { value: Cell, max: Cell },

    /// Malformed rule specification.
    #[error(transparent)]
    Rule(#[from] RuleParseError),
}

/// Result type alias for petri_core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
