//! Per-letter confusion counts for each edit kind.
use serde::Serialize;

use super::{classify, Operation};

/// Row and column labels; `_` marks the start of a word.
pub const ALPHABET: &str = "_abcdefghijklmnopqrstuvwxyz";

const SIZE: usize = 27;

/// Square count matrix indexed by [`ALPHABET`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: [[u32; SIZE]; SIZE],
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        ConfusionMatrix {
            counts: [[0; SIZE]; SIZE],
        }
    }
}

#[inline]
fn index(c: char) -> Option<usize> {
    ALPHABET.chars().position(|a| a == c)
}

impl ConfusionMatrix {
    /// Count for the pair (`x`, `y`); zero outside the alphabet.
    pub fn get(&self, x: char, y: char) -> u32 {
        match (index(x), index(y)) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    /// Increments (`x`, `y`). Returns false, counting nothing, if either
    /// character is outside the alphabet.
    pub fn increment(&mut self, x: char, y: char) -> bool {
        match (index(x), index(y)) {
            (Some(i), Some(j)) => {
                self.counts[i][j] += 1;
                true
            }
            _ => false,
        }
    }

    /// Sum of all cells.
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    /// Rows labelled by their alphabet character.
    pub fn rows(&self) -> impl Iterator<Item = (char, &[u32; SIZE])> {
        ALPHABET.chars().zip(self.counts.iter())
    }
}

/// One [`ConfusionMatrix`] per edit kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrices {
    /// (x, y): y added after x
    pub insert: ConfusionMatrix,
    /// (x, y): y removed after x
    pub delete: ConfusionMatrix,
    /// (x, y): xy swapped to yx
    pub transpose: ConfusionMatrix,
    /// (x, y): x replaced by y
    pub replace: ConfusionMatrix,
}

impl ConfusionMatrices {
    /// Classifies every (user, system) pair and counts the edits.
    pub fn from_pairs<I, U, S>(pairs: I) -> ConfusionMatrices
    where
        I: IntoIterator<Item = (U, S)>,
        U: AsRef<str>,
        S: AsRef<str>,
    {
        let mut out = ConfusionMatrices::default();
        for (user, system) in pairs {
            out.add(user.as_ref(), system.as_ref());
        }
        out
    }

    /// Classifies one pair and counts it if it is a single edit.
    pub fn add(&mut self, user: &str, system: &str) {
        let classification = classify(user, system);
        let (x, y) = match classification.context {
            Some(context) => context,
            None => return,
        };

        let counted = match self.get_mut(classification.operation) {
            Some(matrix) => matrix.increment(x, y),
            None => return,
        };
        if !counted {
            log::trace!("Skipping {:?} -> {:?}: ({:?}, {:?}) outside alphabet", user, system, x, y);
        }
    }

    /// Matrix for an edit kind; `None` for `Table` and `NoOp`.
    pub fn get(&self, operation: Operation) -> Option<&ConfusionMatrix> {
        match operation {
            Operation::Insert => Some(&self.insert),
            Operation::Delete => Some(&self.delete),
            Operation::Transpose => Some(&self.transpose),
            Operation::Replace => Some(&self.replace),
            Operation::Table | Operation::NoOp => None,
        }
    }

    fn get_mut(&mut self, operation: Operation) -> Option<&mut ConfusionMatrix> {
        match operation {
            Operation::Insert => Some(&mut self.insert),
            Operation::Delete => Some(&mut self.delete),
            Operation::Transpose => Some(&mut self.transpose),
            Operation::Replace => Some(&mut self.replace),
            Operation::Table | Operation::NoOp => None,
        }
    }

    /// Each edit kind with its matrix.
    pub fn iter(&self) -> impl Iterator<Item = (Operation, &ConfusionMatrix)> {
        Operation::EDITS
            .into_iter()
            .filter_map(move |op| self.get(op).map(|m| (op, m)))
    }
}
