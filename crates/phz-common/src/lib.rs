//! Common types and utilities for the phz rewriting core.
//!
//! This crate provides foundational types used across all phz crates:
//! - Source spans (`Span`)
//! - Target language levels (`PhpVersion`, `PhpVersionFeature`)
//! - Parser and resolver limits

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Target PHP version and the syntax features it unlocks
pub mod php_version;
pub use php_version::{InvalidPhpVersion, PhpVersion, PhpVersionFeature};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/php_version_tests.rs"]
mod php_version_tests;
