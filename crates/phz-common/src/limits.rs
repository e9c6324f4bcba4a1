//! Centralized limits and thresholds.
//!
//! Parsing a source file is by far the most expensive step of symbol
//! resolution, so the limits here bound the work done per file.

/// Files larger than this are treated as unreadable by the resolver.
///
/// Generated sources (compiled containers, proxies) can run into tens of
/// megabytes and never contain declarations worth resolving.
pub const MAX_SOURCE_FILE_BYTES: usize = 8 * 1024 * 1024;

/// Maximum nesting depth for recursive descent in the parser.
///
/// Expressions and blocks nested deeper than this produce a diagnostic
/// instead of overflowing the stack.
pub const MAX_PARSE_DEPTH: u32 = 256;

/// Maximum length of the parent chain walked when looking up the declaring
/// class of an inherited method. Guards against cyclic `extends` in broken code.
pub const MAX_INHERITANCE_DEPTH: usize = 64;

/// Pre-allocation for node arenas, per source byte.
pub const NODES_PER_SOURCE_BYTE_DIVISOR: usize = 16;

/// Maximum chain of variable assignments followed when inferring the type of
/// an expression (`$a = $b; $b = $c; ...`).
pub const MAX_TYPE_RESOLUTION_DEPTH: u32 = 32;
