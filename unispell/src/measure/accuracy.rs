//! Accuracy buckets for (input, output, reference) triples.
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{classify, Operation};

/// Something a system output can be checked against.
pub trait Reference {
    /// Whether `output` is an acceptable correction.
    fn matches(&self, output: &str) -> bool;
}

impl Reference for str {
    fn matches(&self, output: &str) -> bool {
        self == output
    }
}

impl Reference for String {
    fn matches(&self, output: &str) -> bool {
        self == output
    }
}

impl Reference for SmolStr {
    fn matches(&self, output: &str) -> bool {
        self == output
    }
}

impl<T: Borrow<str> + Ord> Reference for BTreeSet<T> {
    fn matches(&self, output: &str) -> bool {
        self.contains(output)
    }
}

impl<T: Borrow<str> + Eq + Hash> Reference for hashbrown::HashSet<T> {
    fn matches(&self, output: &str) -> bool {
        self.contains(output)
    }
}

impl<R: Reference + ?Sized> Reference for &R {
    fn matches(&self, output: &str) -> bool {
        (**self).matches(output)
    }
}

/// Outputs split by how they were produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buckets {
    /// single insert, delete, transpose or replace
    pub edit: u32,
    /// anything else that changed the input
    pub table: u32,
    /// input returned unchanged
    pub no_op: u32,
}

impl Buckets {
    fn add(&mut self, operation: Operation) {
        match operation {
            Operation::Table => self.table += 1,
            Operation::NoOp => self.no_op += 1,
            _ => self.edit += 1,
        }
    }

    /// all outputs in the three buckets
    pub fn total(&self) -> u32 {
        self.edit + self.table + self.no_op
    }
}

/// Accuracy summary. Serializes with the keys `true`, `false` and `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyCounts {
    /// outputs matching their reference
    #[serde(rename = "true")]
    pub correct: Buckets,
    /// outputs not matching their reference
    #[serde(rename = "false")]
    pub incorrect: Buckets,
    /// inputs for which the system had no suggestion
    #[serde(rename = "null")]
    pub no_suggestion: u32,
}

impl AccuracyCounts {
    /// Buckets every (user, system, reference) triple. An empty system output
    /// means no suggestion.
    pub fn from_triples<I, U, S, R>(triples: I) -> AccuracyCounts
    where
        I: IntoIterator<Item = (U, S, R)>,
        U: AsRef<str>,
        S: AsRef<str>,
        R: Reference,
    {
        let mut out = AccuracyCounts::default();
        for (user, system, reference) in triples {
            out.add(user.as_ref(), system.as_ref(), &reference);
        }
        out
    }

    /// Buckets one triple.
    pub fn add<R: Reference + ?Sized>(&mut self, user: &str, system: &str, reference: &R) {
        if system.is_empty() {
            self.no_suggestion += 1;
            return;
        }

        let operation = classify(user, system).operation;
        if reference.matches(system) {
            self.correct.add(operation);
        } else {
            self.incorrect.add(operation);
        }
    }

    /// Number of triples counted.
    pub fn total(&self) -> u32 {
        self.correct.total() + self.incorrect.total() + self.no_suggestion
    }
}

impl fmt::Display for AccuracyCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let total = self.total();
        let percent = |v: u32| -> String {
            if total == 0 {
                return "-".to_string();
            }
            format!("{:.2}%", v as f32 / total as f32 * 100f32)
        };

        write!(
            f,
            "[correct] {} [edit] {} [table] {} [no_op] {} [wrong] {} [none] {}",
            percent(self.correct.total()),
            percent(self.correct.edit),
            percent(self.correct.table),
            percent(self.correct.no_op),
            percent(self.incorrect.total()),
            percent(self.no_suggestion)
        )
    }
}
