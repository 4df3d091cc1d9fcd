//! Configuration constants for search operations
//!
//! This module contains the tuning parameters for scanning and error reporting.

/// Minimum number of files before scans are dispatched to the rayon pool.
/// Below this the per-task overhead outweighs the parallel speedup.
pub const PARALLEL_SCAN_THRESHOLD: usize = 32;

/// Initial capacity of a per-file match buffer
pub(crate) const FILE_MATCH_CAPACITY: usize = 16;

/// Number of characters of an undecodable payload echoed back in a `ParseError`
pub const INPUT_PREVIEW_CHARS: usize = 100;
