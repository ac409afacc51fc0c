//! Curated misspelling table.
//!
//! Each line of the input names a correct word followed by the misspellings
//! observed for it:
//!
//! ```text
//! raining: rainning, raning*2
//! writings: writtings
//! ```
//!
//! An optional `*N` suffix weights a misspelling; the default weight is 1.
//! The table is indexed by misspelling.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use itertools::Itertools;
use rand::seq::IndexedRandom;
use rand::Rng;
use smol_str::SmolStr;

use crate::error::LoadError;
use crate::speller::suggestion::Suggestion;
use crate::types::{Count, Probability};

/// Scales table confidence onto the magnitude of corpus probabilities.
pub const ERROR_COEFFICIENT: Probability = 30.0;

const SEPARATOR: &str = ": ";

/// Misspelling to weighted corrections.
#[derive(Clone, Debug, Default)]
pub struct ErrorTable {
    table: HashMap<SmolStr, HashMap<SmolStr, Count>>,
    total_weight: Count,
}

impl ErrorTable {
    /// Reads and parses the table at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ErrorTable, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
        let table = ErrorTable::parse_from(&text, path)?;
        log::debug!(
            "Loaded error table {}: {} misspellings, {} entries",
            path.display(),
            table.len(),
            table.total_weight()
        );
        Ok(table)
    }

    /// Parses table text held in memory.
    pub fn parse(text: &str) -> Result<ErrorTable, LoadError> {
        ErrorTable::parse_from(text, Path::new("<memory>"))
    }

    fn parse_from(text: &str, path: &Path) -> Result<ErrorTable, LoadError> {
        let mut out = ErrorTable::default();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let (target, misspellings) =
                line.split_once(SEPARATOR).ok_or_else(|| LoadError::Parse {
                    path: path.to_path_buf(),
                    line: i + 1,
                    content: line.to_string(),
                })?;

            for entry in misspellings.split(", ") {
                let entry = entry.trim_end();
                let (word, weight) = match entry.split_once('*') {
                    Some((word, weight)) => {
                        let weight = weight.parse::<Count>().map_err(|source| {
                            LoadError::InvalidWeight {
                                path: PathBuf::from(path),
                                line: i + 1,
                                value: weight.to_string(),
                                source,
                            }
                        })?;
                        (word, weight)
                    }
                    None => (entry, 1),
                };
                if word.is_empty() {
                    continue;
                }

                *out.table
                    .entry(SmolStr::new(word))
                    .or_default()
                    .entry(SmolStr::new(target))
                    .or_insert(0) += weight;
                out.total_weight += 1;
            }
        }

        Ok(out)
    }

    /// Number of distinct misspellings.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of listed entries across the table. Weights are not summed.
    pub fn total_weight(&self) -> Count {
        self.total_weight
    }

    /// Corrections recorded for the misspelling `word`, with their weights.
    pub fn lookup(&self, word: &str) -> Option<&HashMap<SmolStr, Count>> {
        self.table.get(word)
    }

    /// The heaviest correction for `word`.
    ///
    /// Ties are broken uniformly at random with `rng`. The score is
    /// `weight / total_weight * coefficient`.
    pub fn best<R: Rng + ?Sized>(
        &self,
        word: &str,
        coefficient: Probability,
        rng: &mut R,
    ) -> Option<Suggestion> {
        let corrections = self.table.get(word)?;
        let max = corrections.values().copied().max()?;
        let tied = corrections
            .iter()
            .filter(|(_, w)| **w == max)
            .map(|(k, _)| k)
            .sorted()
            .collect::<Vec<_>>();
        let value = tied.choose(rng)?;

        let score = if self.total_weight == 0 {
            0.0
        } else {
            max as Probability / self.total_weight as Probability * coefficient
        };
        Some(Suggestion::new((*value).clone(), score))
    }

    /// Every distinct correct word in the table.
    pub fn targets(&self) -> BTreeSet<SmolStr> {
        self.table
            .values()
            .flat_map(|c| c.keys().cloned())
            .collect()
    }

    /// Each misspelling with the set of corrections tied at its top weight,
    /// ordered by misspelling.
    ///
    /// The table sometimes lists one misspelling under several words; any of
    /// the heaviest ones counts as an acceptable correction.
    pub fn references(&self) -> Vec<(SmolStr, BTreeSet<SmolStr>)> {
        self.table
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(mis, corrections)| {
                let max = corrections.values().copied().max().unwrap_or(0);
                let best = corrections
                    .iter()
                    .filter(|(_, w)| **w == max)
                    .map(|(k, _)| k.clone())
                    .collect();
                (mis.clone(), best)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    const TABLE: &str = "raining: rainning, raning*3\nwritings: writtings\nrunning: raning*3\n";

    #[test]
    fn indexed_by_misspelling() {
        let table = ErrorTable::parse(TABLE).unwrap();
        assert_eq!(table.len(), 3);
        let raning = table.lookup("raning").unwrap();
        assert_eq!(raning.get("raining"), Some(&3));
        assert_eq!(raning.get("running"), Some(&3));
        assert_eq!(table.lookup("rainning").unwrap().get("raining"), Some(&1));
        assert!(table.lookup("raining").is_none());
    }

    #[test]
    fn total_weight_counts_entries() {
        let table = ErrorTable::parse(TABLE).unwrap();
        assert_eq!(table.total_weight(), 4);
    }

    #[test]
    fn weights_accumulate() {
        let table = ErrorTable::parse("the: teh*2\nthe: teh\n").unwrap();
        assert_eq!(table.lookup("teh").unwrap().get("the"), Some(&3));
        assert_eq!(table.total_weight(), 2);
    }

    #[test]
    fn best_scales_by_coefficient() {
        let table = ErrorTable::parse(TABLE).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        let best = table.best("writtings", ERROR_COEFFICIENT, &mut rng).unwrap();
        assert_eq!(best.value(), "writings");
        assert_eq!(best.score(), 1.0 / 4.0 * 30.0);
    }

    #[test]
    fn best_breaks_ties_among_maxima() {
        let table = ErrorTable::parse(TABLE).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..20 {
            let best = table.best("raning", 1.0, &mut rng).unwrap();
            assert!(best.value() == "raining" || best.value() == "running");
            assert_eq!(best.score(), 3.0 / 4.0);
        }
    }

    #[test]
    fn best_is_reproducible() {
        let table = ErrorTable::parse(TABLE).unwrap();
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| table.best("raning", 1.0, &mut rng).unwrap().value)
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
    }

    #[test]
    fn best_unknown() {
        let table = ErrorTable::parse(TABLE).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        assert!(table.best("zzz", ERROR_COEFFICIENT, &mut rng).is_none());
    }

    #[test]
    fn missing_separator_is_fatal() {
        let err = ErrorTable::parse("the: teh\nbroken line\n").unwrap_err();
        match err {
            LoadError::Parse { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "broken line");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn invalid_weight_is_fatal() {
        let err = ErrorTable::parse("the: teh*x\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidWeight { line: 1, .. }));
    }

    #[test]
    fn targets_and_references() {
        let table = ErrorTable::parse(TABLE).unwrap();
        assert_eq!(
            table.targets().into_iter().collect::<Vec<_>>(),
            vec!["raining", "running", "writings"]
        );

        let refs = table.references();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].0, "rainning");
        assert_eq!(refs[1].0, "raning");
        assert_eq!(
            refs[1].1.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            vec!["raining", "running"]
        );
        assert_eq!(refs[2].0, "writtings");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", TABLE).unwrap();
        let table = ErrorTable::load(file.path()).unwrap();
        assert_eq!(table.total_weight(), 4);
    }
}
