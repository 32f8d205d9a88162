//! File output for study results.

/// CSV export of sample locations and weights.
pub mod export;
