//! Unigram word counts from a text corpus.
use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::LoadError;
use crate::tokenizer::Tokenize;
use crate::types::{Count, Probability};

/// Additive smoothing constant.
pub const ALPHA: Count = 1;

/// Selects how a [`Lexicon`] turns counts into probabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityModel {
    /// `count / N`; unknown words score zero.
    Simple,
    /// `(count + alpha) / N+`; unknown words score above zero.
    Smooth,
}

impl std::str::FromStr for ProbabilityModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(ProbabilityModel::Simple),
            "smooth" | "smoothed" => Ok(ProbabilityModel::Smooth),
            other => Err(format!("unknown probability model {:?}", other)),
        }
    }
}

impl std::fmt::Display for ProbabilityModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProbabilityModel::Simple => f.write_str("simple"),
            ProbabilityModel::Smooth => f.write_str("smooth"),
        }
    }
}

/// Occurrence counts of every token seen in a corpus.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    words: HashMap<SmolStr, Count>,
    n: Count,
    n_plus: Count,
}

impl Lexicon {
    /// Reads and counts the corpus at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Lexicon, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
        let lexicon = Lexicon::from_text(&text);
        log::debug!(
            "Loaded corpus {}: {} tokens, {} distinct",
            path.display(),
            lexicon.total(),
            lexicon.len()
        );
        Ok(lexicon)
    }

    /// Counts the lowercased tokens of `text`.
    pub fn from_text(text: &str) -> Lexicon {
        let text = text.to_lowercase();
        let mut words: HashMap<SmolStr, Count> = HashMap::new();
        for token in text.tokens() {
            *words.entry(SmolStr::new(token)).or_insert(0) += 1;
        }
        Lexicon::from_counts(words)
    }

    /// Builds a lexicon from precomputed counts.
    pub fn from_counts<I, S>(counts: I) -> Lexicon
    where
        I: IntoIterator<Item = (S, Count)>,
        S: Into<SmolStr>,
    {
        let mut lexicon = Lexicon {
            words: counts.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            n: 0,
            n_plus: 0,
        };
        lexicon.recompute();
        lexicon
    }

    fn recompute(&mut self) {
        self.n = self.words.values().sum();
        self.n_plus = self.n + ALPHA * (self.words.len() as Count + 1);
    }

    /// Adds `weight` to the count of every token in `tokens`.
    pub fn fold_in<I, S>(&mut self, tokens: I, weight: Count)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if weight == 0 {
            return;
        }
        for token in tokens {
            *self.words.entry(SmolStr::new(token.as_ref())).or_insert(0) += weight;
        }
        self.recompute();
    }

    /// Occurrences of `word`; zero if unknown.
    #[inline]
    pub fn count(&self, word: &str) -> Count {
        self.words.get(word).copied().unwrap_or(0)
    }

    /// Whether `word` occurs in the corpus.
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether no token was counted.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sum of all counts, `N`.
    pub fn total(&self) -> Count {
        self.n
    }

    /// Smoothing denominator, `N+`.
    pub fn smoothed_total(&self) -> Count {
        self.n_plus
    }

    /// The known subset of `words`, sorted and deduplicated.
    pub fn known<I, S>(&self, words: I) -> Vec<SmolStr>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known: Vec<SmolStr> = words
            .into_iter()
            .filter(|w| self.contains(w.as_ref()))
            .map(|w| SmolStr::new(w.as_ref()))
            .collect();
        known.sort();
        known.dedup();
        known
    }

    /// Relative frequency of `word`.
    pub fn probability_simple(&self, word: &str) -> Probability {
        if self.n == 0 {
            return 0.0;
        }
        self.count(word) as Probability / self.n as Probability
    }

    /// Add-alpha smoothed relative frequency of `word`.
    pub fn probability_smoothed(&self, word: &str) -> Probability {
        if self.n == 0 {
            return 0.0;
        }
        (self.count(word) + ALPHA) as Probability / self.n_plus as Probability
    }

    /// Probability of `word` under `model`.
    pub fn probability(&self, word: &str, model: ProbabilityModel) -> Probability {
        match model {
            ProbabilityModel::Simple => self.probability_simple(word),
            ProbabilityModel::Smooth => self.probability_smoothed(word),
        }
    }
}
