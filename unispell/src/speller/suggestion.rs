//! Suggestion for a spelling correction.
use crate::types::Probability;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Suggestion for a spelling correction
pub struct Suggestion {
    /// the suggested word-form
    pub value: SmolStr,
    /// confidence of the source that produced it; higher is better
    pub score: Probability,
}

impl Suggestion {
    /// creates a spelling correction suggestion
    pub fn new(value: impl Into<SmolStr>, score: Probability) -> Suggestion {
        Suggestion {
            value: value.into(),
            score,
        }
    }

    /// gets the suggested word-form
    pub fn value(&self) -> &str {
        &self.value
    }

    /// gets the confidence of the suggestion
    pub fn score(&self) -> Probability {
        self.score
    }
}
