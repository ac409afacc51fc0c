//! Shared scalar types.

/// Occurrence count of a token, or accumulated weight of a table entry.
pub type Count = u64;

/// Score assigned to a candidate correction.
pub type Probability = f64;
