//! Single-word correction.
use std::path::Path;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use self::suggestion::Suggestion;
use crate::error::LoadError;
use crate::error_table::{ErrorTable, ERROR_COEFFICIENT};
use crate::lexicon::{Lexicon, ProbabilityModel};
use crate::types::{Count, Probability};

pub mod edits;
pub mod suggestion;

pub use self::edits::edits1;

/// Seed used for tie-breaking unless configured otherwise.
pub const DEFAULT_SEED: u64 = 13;

/// Construction-time settings of a [`Corrector`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// probability model used to rank corpus candidates
    pub model: ProbabilityModel,
    /// when set, every correct word of the error table is added to the
    /// corpus counts with this weight
    pub fold_weight: Option<Count>,
    /// multiplier applied to error table confidence
    pub error_coefficient: Probability,
    /// seed for random tie-breaks
    pub seed: u64,
}

impl CorrectorConfig {
    /// default configuration, usable in const context
    pub const fn default() -> CorrectorConfig {
        CorrectorConfig {
            model: ProbabilityModel::Simple,
            fold_weight: None,
            error_coefficient: ERROR_COEFFICIENT,
            seed: DEFAULT_SEED,
        }
    }
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig::default()
    }
}

/// Which source a [`Decision`] took its answer from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// the input is already a corpus word
    Exact,
    /// best corpus candidate at edit distance one
    Lexicon,
    /// error table entry
    Table,
    /// no suggestion from either source
    Nothing,
}

/// Outcome of correcting one word, with both sources' best picks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decision {
    /// best corpus word, scored by the active probability model
    pub candidate: Option<Suggestion>,
    /// best error table correction, scored by scaled table confidence
    pub table: Option<Suggestion>,
    /// which of the two was returned
    pub source: Source,
}

impl Decision {
    /// The chosen correction; empty when there is no suggestion.
    pub fn value(&self) -> &str {
        let chosen = match self.source {
            Source::Exact | Source::Lexicon => self.candidate.as_ref(),
            Source::Table => self.table.as_ref(),
            Source::Nothing => None,
        };
        chosen.map(Suggestion::value).unwrap_or("")
    }

    /// Whether both sources made a suggestion and they differ.
    pub fn sources_disagree(&self) -> bool {
        match (&self.candidate, &self.table) {
            (Some(c), Some(t)) => c.value != t.value,
            _ => false,
        }
    }
}

/// Receives every decision that compared the corpus and the error table.
pub trait Tracer: Send + Sync {
    /// called once per compared word, after the decision is made
    fn trace(&self, word: &str, decision: &Decision);
}

impl<F> Tracer for F
where
    F: Fn(&str, &Decision) + Send + Sync,
{
    fn trace(&self, word: &str, decision: &Decision) {
        self(word, decision)
    }
}

/// Corrects single words against a [`Lexicon`] and an [`ErrorTable`].
///
/// Read-only after construction. [`Corrector::correct`] draws tie-breaks from
/// an internal seeded generator; parallel callers can hand their own to
/// [`Corrector::correct_with_rng`] instead.
pub struct Corrector {
    lexicon: Lexicon,
    errors: ErrorTable,
    config: CorrectorConfig,
    rng: Mutex<StdRng>,
    tracer: Option<Box<dyn Tracer>>,
}

impl Corrector {
    /// creates a corrector, folding table words into the lexicon if configured
    pub fn new(mut lexicon: Lexicon, errors: ErrorTable, config: CorrectorConfig) -> Corrector {
        if let Some(weight) = config.fold_weight {
            let targets = errors.targets();
            log::debug!(
                "Folding {} table words into the corpus at weight {}",
                targets.len(),
                weight
            );
            lexicon.fold_in(targets.iter().map(SmolStr::as_str), weight);
        }

        Corrector {
            lexicon,
            errors,
            rng: Mutex::new(StdRng::seed_from_u64(config.seed)),
            config,
            tracer: None,
        }
    }

    /// Loads the corpus and error table, failing on the first unreadable or
    /// malformed input.
    pub fn open<P, Q>(
        corpus: P,
        spell_errors: Q,
        config: CorrectorConfig,
    ) -> Result<Corrector, LoadError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let lexicon = Lexicon::load(corpus)?;
        let errors = ErrorTable::load(spell_errors)?;
        Ok(Corrector::new(lexicon, errors, config))
    }

    /// attaches a tracer that sees every compared decision
    pub fn with_tracer<T: Tracer + 'static>(mut self, tracer: T) -> Corrector {
        self.tracer = Some(Box::new(tracer));
        self
    }

    /// the corpus lexicon, after any fold-in
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// the misspelling table
    pub fn error_table(&self) -> &ErrorTable {
        &self.errors
    }

    /// the active configuration
    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    /// Best correction for `word`, or an empty string if there is none.
    pub fn correct(&self, word: &str) -> String {
        let mut rng = self.rng.lock();
        self.correct_with_rng(word, &mut *rng)
    }

    /// like [`Corrector::correct`], drawing tie-breaks from `rng`
    pub fn correct_with_rng<R: Rng + ?Sized>(&self, word: &str, rng: &mut R) -> String {
        self.decide(word, rng).value().to_string()
    }

    /// Known words among `word` and its one-edit neighbourhood, sorted.
    pub fn candidates(&self, word: &str) -> Vec<SmolStr> {
        let known = self.lexicon.known(std::iter::once(word));
        if !known.is_empty() {
            return known;
        }
        self.lexicon.known(edits1(word))
    }

    fn best_candidate<R: Rng + ?Sized>(
        &self,
        candidates: &[SmolStr],
        rng: &mut R,
    ) -> Option<Suggestion> {
        let scored = candidates
            .iter()
            .map(|c| (c, self.lexicon.probability(c, self.config.model)))
            .collect::<Vec<_>>();
        let max = scored
            .iter()
            .map(|(_, p)| *p)
            .fold(Probability::NEG_INFINITY, Probability::max);
        let tied = scored
            .iter()
            .filter(|(_, p)| *p == max)
            .map(|(c, _)| *c)
            .collect::<Vec<_>>();

        tied.choose(rng).map(|c| Suggestion::new((*c).clone(), max))
    }

    /// Corrects `word`, keeping both sources' picks for inspection.
    pub fn decide<R: Rng + ?Sized>(&self, word: &str, rng: &mut R) -> Decision {
        if self.lexicon.contains(word) {
            let prob = self.lexicon.probability(word, self.config.model);
            return Decision {
                candidate: Some(Suggestion::new(word, prob)),
                table: None,
                source: Source::Exact,
            };
        }

        let candidates = self.candidates(word);
        let candidate = self.best_candidate(&candidates, rng);
        let table = self.errors.best(word, self.config.error_coefficient, rng);

        let prob = candidate.as_ref().map(Suggestion::score).unwrap_or(0.0);
        let table_conf = table.as_ref().map(Suggestion::score).unwrap_or(0.0);

        // Ties go to the table.
        let source = if candidate.is_some() && prob > table_conf {
            Source::Lexicon
        } else if table.is_some() {
            Source::Table
        } else {
            Source::Nothing
        };

        let decision = Decision {
            candidate,
            table,
            source,
        };

        if let Some(tracer) = self.tracer.as_ref() {
            tracer.trace(word, &decision);
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn corrector(model: ProbabilityModel, table: &str) -> Corrector {
        let lexicon =
            Lexicon::from_counts(vec![("the", 10), ("dog", 5), ("spelling", 3), ("cat", 4)]);
        let errors = ErrorTable::parse(table).unwrap();
        let mut config = CorrectorConfig::default();
        config.model = model;
        Corrector::new(lexicon, errors, config)
    }

    #[test]
    fn known_words_are_unchanged() {
        for model in [ProbabilityModel::Simple, ProbabilityModel::Smooth] {
            let c = corrector(model, "dog: the\n");
            for word in ["the", "dog", "spelling", "cat"] {
                assert_eq!(c.correct(word), word);
            }
        }
    }

    #[test]
    fn one_edit_corrections() {
        let c = corrector(ProbabilityModel::Simple, "");
        assert_eq!(c.correct("speling"), "spelling");
        assert_eq!(c.correct("teh"), "the");
        assert_eq!(c.correct("dgo"), "dog");
        assert_eq!(c.correct("cta"), "cat");
    }

    #[test]
    fn smoothed_prefers_observed_words() {
        let lexicon = Lexicon::from_counts(vec![("the", 10), ("dog", 5)]);
        let mut config = CorrectorConfig::default();
        config.model = ProbabilityModel::Smooth;
        let c = Corrector::new(lexicon, ErrorTable::default(), config);
        assert_eq!(c.correct("teh"), "the");
    }

    #[test]
    fn no_suggestion_is_empty() {
        let c = corrector(ProbabilityModel::Simple, "");
        assert_eq!(c.correct("qqqqqq"), "");
        let d = c.decide("qqqqqq", &mut StdRng::seed_from_u64(1));
        assert_eq!(d.source, Source::Nothing);
        assert_eq!(d.value(), "");
    }

    #[test]
    fn table_used_when_no_candidate() {
        let c = corrector(ProbabilityModel::Simple, "spelling: spellling, spelinnng\n");
        assert_eq!(c.correct("spelinnng"), "spelling");
    }

    #[test]
    fn table_wins_when_more_confident() {
        // P(dog) = 5/22; table confidence = 1/1 * 30.
        let c = corrector(ProbabilityModel::Simple, "cat: dot\n");
        let d = c.decide("dot", &mut StdRng::seed_from_u64(1));
        assert_eq!(d.candidate.as_ref().unwrap().value(), "dog");
        assert_eq!(d.source, Source::Table);
        assert_eq!(d.value(), "cat");
        assert!(d.sources_disagree());
    }

    #[test]
    fn lexicon_wins_when_more_confident() {
        let lexicon = Lexicon::from_counts(vec![("dog", 5)]);
        let errors = ErrorTable::parse("cat: dot\n").unwrap();
        let mut config = CorrectorConfig::default();
        config.error_coefficient = 0.5;
        let c = Corrector::new(lexicon, errors, config);
        assert_eq!(c.correct("dot"), "dog");
    }

    #[test]
    fn ties_favor_table() {
        // P(dog) = 1, table confidence = 1/1 * 1.
        let lexicon = Lexicon::from_counts(vec![("dog", 5)]);
        let errors = ErrorTable::parse("cat: dot\n").unwrap();
        let mut config = CorrectorConfig::default();
        config.error_coefficient = 1.0;
        let c = Corrector::new(lexicon, errors, config);
        assert_eq!(c.correct("dot"), "cat");
    }

    #[test]
    fn exact_match_beats_table() {
        let c = corrector(ProbabilityModel::Simple, "cat: dog\n");
        assert_eq!(c.correct("dog"), "dog");
    }

    #[test]
    fn fold_in_adds_table_words() {
        let lexicon = Lexicon::from_counts(vec![("the", 10)]);
        let errors = ErrorTable::parse("receive: recieve, receeve\n").unwrap();
        let mut config = CorrectorConfig::default();
        config.fold_weight = Some(4);
        let c = Corrector::new(lexicon, errors, config);
        assert_eq!(c.lexicon().count("receive"), 4);
        assert_eq!(c.lexicon().total(), 14);
        assert_eq!(c.correct("receive"), "receive");
    }

    #[test]
    fn random_ties_are_reproducible() {
        let lexicon = Lexicon::from_counts(vec![("bat", 1), ("cut", 1), ("hat", 1)]);
        let run = || {
            let c = Corrector::new(
                lexicon.clone(),
                ErrorTable::default(),
                CorrectorConfig::default(),
            );
            (0..10).map(|_| c.correct("cat")).collect::<Vec<_>>()
        };
        let first = run();
        assert!(first.iter().all(|w| w == "bat" || w == "cut" || w == "hat"));
        assert_eq!(first, run());
    }

    #[test]
    fn tracer_sees_decisions() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let c = corrector(ProbabilityModel::Simple, "cat: dot\n").with_tracer(
            move |_: &str, d: &Decision| {
                if d.sources_disagree() {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        );
        c.correct("dot");
        c.correct("the");
        c.correct("teh");
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn config_from_json() {
        let cfg: CorrectorConfig =
            serde_json::from_str(r#"{"model": "smooth", "fold_weight": 3}"#).unwrap();
        assert_eq!(cfg.model, ProbabilityModel::Smooth);
        assert_eq!(cfg.fold_weight, Some(3));
        assert_eq!(cfg.error_coefficient, ERROR_COEFFICIENT);
        assert_eq!(cfg.seed, DEFAULT_SEED);
    }
}
