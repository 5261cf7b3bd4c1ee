//! Core data structures for the Petri dish simulation.

pub mod analysis;
pub mod cell;
