//! PHP scanner/tokenizer for the phz rewriting core.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token and node kinds
//! - `ScannerState` - Tokenizer state machine

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod scanner_impl;
pub use scanner_impl::{ScannerSnapshot, ScannerState};

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
