//! Edit classification and correction statistics.
//!
//! [`classify`] names the single edit that turns a user's input into the
//! system's output. [`ConfusionMatrices`] counts the letters involved per edit
//! kind and [`AccuracyCounts`] buckets outputs against references.
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

mod accuracy;
mod confusion;

pub use self::accuracy::{AccuracyCounts, Buckets, Reference};
pub use self::confusion::{ConfusionMatrices, ConfusionMatrix, ALPHABET};

/// Context character standing for the start of a word.
pub const START: char = '_';

/// Transformation between a user's input and the system's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// one character added
    Insert,
    /// one character removed
    Delete,
    /// two adjacent characters swapped
    Transpose,
    /// one character substituted
    Replace,
    /// not a single edit; the correction came from a table lookup
    Table,
    /// input returned unchanged
    NoOp,
}

impl Operation {
    /// The four kinds that carry letter context.
    pub const EDITS: [Operation; 4] = [
        Operation::Insert,
        Operation::Delete,
        Operation::Transpose,
        Operation::Replace,
    ];

    /// Lowercase name, as used in report file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Delete => "delete",
            Operation::Transpose => "transpose",
            Operation::Replace => "replace",
            Operation::Table => "table",
            Operation::NoOp => "no_op",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An [`Operation`] with the two characters it involves.
///
/// | operation | user → system | context |
/// |-----------|---------------|---------|
/// | replace   | x → y         | (x, y)  |
/// | transpose | xy → yx       | (x, y)  |
/// | insert    | x → xy        | (x, y)  |
/// | delete    | xy → x        | (x, y)  |
///
/// Inserts and deletes at the start of a word use [`START`] for x.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    /// kind of edit
    pub operation: Operation,
    /// the (x, y) characters; `None` for `Table` and `NoOp`
    pub context: Option<(char, char)>,
}

impl Classification {
    fn edit(operation: Operation, x: char, y: char) -> Classification {
        Classification {
            operation,
            context: Some((x, y)),
        }
    }

    fn bare(operation: Operation) -> Classification {
        Classification {
            operation,
            context: None,
        }
    }
}

/// Classifies the edit from `user` to `system`.
///
/// For equal lengths only the first mismatch is examined; anything that is
/// not a clean replace or transpose there is `Table`. Unequal lengths are
/// scanned for the first point where removing one character from the longer
/// string gives the shorter one.
pub fn classify(user: &str, system: &str) -> Classification {
    if user == system {
        return Classification::bare(Operation::NoOp);
    }

    let u: Vec<char> = user.chars().collect();
    let s: Vec<char> = system.chars().collect();

    if u.len() == s.len() {
        if let Some(i) = (0..u.len()).find(|&i| u[i] != s[i]) {
            if i + 1 == u.len() {
                return Classification::edit(Operation::Replace, u[i], s[i]);
            }
            if u[i + 1] == s[i] && u[i] == s[i + 1] {
                return Classification::edit(Operation::Transpose, u[i], s[i]);
            }
            if u[i + 1] == s[i + 1] {
                return Classification::edit(Operation::Replace, u[i], s[i]);
            }
        }
    } else if u.len() + 1 == s.len() {
        if let Some((x, y)) = single_removal(&s, &u) {
            return Classification::edit(Operation::Insert, x, y);
        }
    } else if s.len() + 1 == u.len() {
        if let Some((x, y)) = single_removal(&u, &s) {
            return Classification::edit(Operation::Delete, x, y);
        }
    }

    Classification::bare(Operation::Table)
}

/// Finds the first character of `long` whose removal yields `short`,
/// returning it with the character before it.
fn single_removal(long: &[char], short: &[char]) -> Option<(char, char)> {
    if long[1..] == *short {
        return Some((START, long[0]));
    }

    (0..short.len())
        .find(|&i| long[..=i] == short[..=i] && long[i + 2..] == short[i + 1..])
        .map(|i| (long[i], long[i + 1]))
}

/// One wrong correction, for miscorrection listings.
#[derive(Clone, Debug, Serialize)]
pub struct Miscorrection<'a> {
    /// the misspelled input
    pub input: &'a str,
    /// what the system returned
    pub correction: &'a str,
    /// what it should have returned
    pub expected: &'a str,
}

impl fmt::Display for Miscorrection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:<16} ❌ {:<16} ✔ {}", self.input, self.correction, self.expected)
    }
}

/// Pairs the lines of a misspelled word list with a line-aligned list of
/// their corrections. Stops at the first blank line in either file.
pub fn load_test_set<P, Q>(misspelled: P, correct: Q) -> Result<Vec<(String, String)>, LoadError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let read = |path: &Path| {
        std::fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))
    };
    let misspelled = read(misspelled.as_ref())?;
    let correct = read(correct.as_ref())?;

    Ok(misspelled
        .lines()
        .zip(correct.lines())
        .map(|(m, c)| (m.trim_end(), c.trim_end()))
        .take_while(|(m, c)| !m.is_empty() && !c.is_empty())
        .map(|(m, c)| (m.to_string(), c.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn op(user: &str, system: &str) -> Operation {
        classify(user, system).operation
    }

    #[test]
    fn no_op() {
        for x in ["", "a", "the", "spelling"] {
            assert_eq!(classify(x, x), Classification::bare(Operation::NoOp));
        }
    }

    #[test]
    fn transpose() {
        assert_eq!(
            classify("ab", "ba"),
            Classification::edit(Operation::Transpose, 'a', 'b')
        );
        assert_eq!(
            classify("the", "hte"),
            Classification::edit(Operation::Transpose, 't', 'h')
        );
        assert_eq!(
            classify("teh", "the"),
            Classification::edit(Operation::Transpose, 'e', 'h')
        );
    }

    #[test]
    fn replace() {
        assert_eq!(
            classify("cat", "cot"),
            Classification::edit(Operation::Replace, 'a', 'o')
        );
        assert_eq!(
            classify("cat", "cab"),
            Classification::edit(Operation::Replace, 't', 'b')
        );
        assert_eq!(
            classify("a", "b"),
            Classification::edit(Operation::Replace, 'a', 'b')
        );
    }

    #[test]
    fn insert() {
        assert_eq!(
            classify("speling", "spelling"),
            Classification::edit(Operation::Insert, 'e', 'l')
        );
        assert_eq!(
            classify("at", "cat"),
            Classification::edit(Operation::Insert, START, 'c')
        );
        assert_eq!(
            classify("ca", "cat"),
            Classification::edit(Operation::Insert, 'a', 't')
        );
    }

    #[test]
    fn delete() {
        assert_eq!(
            classify("spellling", "spelling"),
            Classification::edit(Operation::Delete, 'e', 'l')
        );
        assert_eq!(
            classify("xcat", "cat"),
            Classification::edit(Operation::Delete, START, 'x')
        );
        assert_eq!(
            classify("cats", "cat"),
            Classification::edit(Operation::Delete, 't', 's')
        );
    }

    #[test]
    fn table_fallback() {
        assert_eq!(classify("xyz", "abc"), Classification::bare(Operation::Table));
        assert_eq!(op("abc", "abcde"), Operation::Table);
        assert_eq!(op("abc", "axbyc"), Operation::Table);
        assert_eq!(op("abc", "xbcd"), Operation::Table);
        assert_eq!(op("raning", ""), Operation::Table);
    }

    #[test]
    fn only_first_mismatch_is_inspected() {
        // the second mismatch at the end is never looked at
        assert_eq!(
            classify("abcd", "xbcy"),
            Classification::edit(Operation::Replace, 'a', 'x')
        );
        // two adjacent substitutions
        assert_eq!(op("abcd", "xycd"), Operation::Table);
    }

    #[test]
    fn insert_needs_full_alignment() {
        // suffix alone lines up, prefix does not
        assert_eq!(op("xbc", "aybc"), Operation::Table);
    }

    #[test]
    fn miscorrection_display() {
        let m = Miscorrection {
            input: "teh",
            correction: "tea",
            expected: "the",
        };
        assert_eq!(
            m.to_string(),
            "teh              ❌ tea              ✔ the"
        );
    }

    #[test]
    fn test_set_stops_at_blank() {
        let mut mis = tempfile::NamedTempFile::new().unwrap();
        let mut cor = tempfile::NamedTempFile::new().unwrap();
        write!(mis, "teh\nspeling\n\nignored\n").unwrap();
        write!(cor, "the\nspelling\nextra\nignored\n").unwrap();
        let pairs = load_test_set(mis.path(), cor.path()).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("teh".to_string(), "the".to_string()),
                ("speling".to_string(), "spelling".to_string())
            ]
        );
    }
}
