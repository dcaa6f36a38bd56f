//! Common types and utilities for the scopetrace engine.
//!
//! This crate provides foundational types used across all scopetrace crates:
//! - Source spans (`TextSpan`) in byte offsets
//! - Line/column positions (`LineMap`, `Position`)
//! - Engine limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::TextSpan;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
