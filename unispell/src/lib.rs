/*! Single-word spelling correction from unigram frequencies.

Corrects one token at a time by blending two knowledge sources: word
frequencies counted from a plain-text corpus ([`Lexicon`]) and a curated
misspelling table ([`ErrorTable`]). Candidates are the known words at edit
distance one; the best of them is compared against the best table entry and
the more confident source wins.

The [`measure`] module classifies the edit between an input and its
correction and accumulates confusion and accuracy statistics.

# Usage examples

```no_run
use unispell::lexicon::ProbabilityModel;
use unispell::speller::{Corrector, CorrectorConfig};

let mut config = CorrectorConfig::default();
config.model = ProbabilityModel::Smooth;

let corrector = Corrector::open("data/corpus.txt", "data/spell-errors.txt", config)?;
assert_eq!(corrector.correct("speling"), "spelling");
# Ok::<(), unispell::error::LoadError>(())
```

Further examples can be found in `unispell-bin` and `accuracy` in the same
repository.

[`Lexicon`]: crate::lexicon::Lexicon
[`ErrorTable`]: crate::error_table::ErrorTable
*/

#![warn(missing_docs)]
pub mod error;
pub mod error_table;
pub mod lexicon;
pub mod measure;
pub mod speller;
pub mod tokenizer;
pub mod types;
