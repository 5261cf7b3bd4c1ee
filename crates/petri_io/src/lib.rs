//! # Petri IO
//!
//! Collaborators around the Petri dish engine.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Seed pattern loading (plaintext and RLE)
//! - Run reports in HTML, Markdown and JSON
//! - Frame archiving for rendered generations

/// Error types and result aliases for I/O operations
pub mod error;
/// Frame sinks and the gzip frame archive
pub mod frames;
/// Seed pattern parsing and placement
pub mod pattern;
/// Run report rendering and persistence
pub mod report;

pub use error::{IoError, Result};
pub use frames::{FrameArchive, FrameSink, NullSink, RecordedFrames};
pub use pattern::{Pattern, Placement};
pub use report::{Report, ReportFormat, ReportPersistence};
