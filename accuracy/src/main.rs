/*! Accuracy testing for the unigram spelling corrector

Runs the corrector over a set of misspellings and writes, per probability
model, one confusion matrix per edit kind and a summary of accuracy buckets.

# Usage examples

It's a command-line tool:
```console
$ cargo run -- all --corpus data/corpus.txt --spell-errors data/spell-errors.txt
```
measures both the misspellings listed in the error table and the line-aligned
test set, writing CSV and JSON reports to `./measurements/`.

Corrector defaults can be overridden with a JSON file following
[`CorrectorConfig`]:
```console
$ cargo run -- --config config.json testset
```
*/

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use unispell::error_table::ErrorTable;
use unispell::lexicon::{Lexicon, ProbabilityModel};
use unispell::measure::{
    load_test_set, AccuracyCounts, ConfusionMatrices, Miscorrection, Reference, ALPHABET,
};
use unispell::speller::{Corrector, CorrectorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum What {
    All,
    Testset,
    Spellerror,
}

#[derive(Parser)]
#[command(author, version, about = "Accuracy testing for the unigram spelling corrector")]
struct Cli {
    /// Measurement selection
    #[arg(value_enum, default_value_t = What::All)]
    what: What,

    #[arg(long, value_name = "CORPUS", default_value = "./data/corpus.txt")]
    corpus: PathBuf,

    #[arg(long, value_name = "SPELL_ERRORS", default_value = "./data/spell-errors.txt")]
    spell_errors: PathBuf,

    #[arg(long, value_name = "CORRECT", default_value = "./data/test-words-correct.txt")]
    test_correct: PathBuf,

    #[arg(long, value_name = "MISSPELLED", default_value = "./data/test-words-misspelled.txt")]
    test_misspelled: PathBuf,

    #[arg(long, value_name = "DIR", default_value = "./measurements/")]
    out_dir: PathBuf,

    /// Provide JSON config file to override corrector defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Corrects every word in parallel. Each word gets its own generator seeded
/// from its position, so results do not depend on scheduling.
fn correct_all(corrector: &Corrector, users: &[&str]) -> Vec<String> {
    let seed = corrector.config().seed;
    let pb = ProgressBar::new(users.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{percent}%] {wide_bar} {elapsed_precise}"),
    );

    users
        .par_iter()
        .enumerate()
        .progress_with(pb)
        .map(|(i, user)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            corrector.correct_with_rng(user, &mut rng)
        })
        .collect()
}

fn write_confusions(
    matrices: &ConfusionMatrices,
    out_dir: &Path,
    stem: &str,
) -> anyhow::Result<()> {
    for (op, matrix) in matrices.iter() {
        let path = out_dir.join(format!("{}_{}.csv", stem, op));
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;

        let header = std::iter::once(String::new()).chain(ALPHABET.chars().map(String::from));
        wtr.write_record(header)?;
        for (label, row) in matrix.rows() {
            wtr.write_record(
                std::iter::once(label.to_string()).chain(row.iter().map(|c| c.to_string())),
            )?;
        }
        wtr.flush()?;
    }
    Ok(())
}

fn write_accuracy(counts: &AccuracyCounts, out_dir: &Path, stem: &str) -> anyhow::Result<()> {
    let path = out_dir.join(format!("{}_accuracy.json", stem));
    let output = std::fs::File::create(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(output, counts)?;
    Ok(())
}

fn write_miscorrections(
    pairs: &[(String, String)],
    system: &[String],
    out_dir: &Path,
    stem: &str,
) -> anyhow::Result<()> {
    let path = out_dir.join(format!("{}_miscorrections.txt", stem));
    let mut output = std::io::BufWriter::new(
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?,
    );

    let mut wrong = 0;
    for ((input, expected), correction) in pairs.iter().zip(system) {
        if correction != expected {
            wrong += 1;
            let m = Miscorrection {
                input,
                correction,
                expected,
            };
            writeln!(output, "{}", m)?;
        }
    }

    let header = Miscorrection {
        input: "INPUT",
        correction: "MIS-CORRECTION",
        expected: "CORRECT",
    };
    writeln!(output)?;
    writeln!(output, "{}", header)?;
    writeln!(output)?;
    writeln!(output, "{} mis-corrections, {} total.", wrong, pairs.len())?;
    output.flush()?;
    Ok(())
}

/// Runs one measurement and writes its reports.
fn measure<R: Reference>(
    corrector: &Corrector,
    cases: &[(&str, R)],
    out_dir: &Path,
    stem: &str,
) -> anyhow::Result<Vec<String>> {
    let users = cases.iter().map(|(u, _)| *u).collect::<Vec<_>>();
    let system = correct_all(corrector, &users);

    let matrices = ConfusionMatrices::from_pairs(users.iter().zip(system.iter()));
    write_confusions(&matrices, out_dir, stem)?;

    let counts = AccuracyCounts::from_triples(
        cases
            .iter()
            .zip(system.iter())
            .map(|((user, reference), sys)| (*user, sys, reference)),
    );
    write_accuracy(&counts, out_dir, stem)?;
    println!("{}: {}", stem, counts);

    Ok(system)
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let cfg: CorrectorConfig = match &cli.config {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(file)?
        }
        None => CorrectorConfig::default(),
    };

    let lexicon = Lexicon::load(&cli.corpus)?;
    let errors = ErrorTable::load(&cli.spell_errors)?;

    let references = if cli.what != What::Testset {
        errors.references()
    } else {
        vec![]
    };
    let test_set = if cli.what != What::Spellerror {
        load_test_set(&cli.test_misspelled, &cli.test_correct)?
    } else {
        vec![]
    };

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    for model in [ProbabilityModel::Simple, ProbabilityModel::Smooth] {
        let mut cfg = cfg.clone();
        cfg.model = model;
        let corrector = Corrector::new(lexicon.clone(), errors.clone(), cfg);

        if cli.what != What::Testset {
            let cases = references
                .iter()
                .map(|(user, refs)| (user.as_str(), refs))
                .collect::<Vec<_>>();
            let stem = format!("spellerrors_{}", model);
            measure(&corrector, &cases, &cli.out_dir, &stem)?;
        }

        if cli.what != What::Spellerror {
            let cases = test_set
                .iter()
                .map(|(user, reference)| (user.as_str(), reference.as_str()))
                .collect::<Vec<_>>();
            let stem = format!("testset_{}", model);
            let system = measure(&corrector, &cases, &cli.out_dir, &stem)?;
            write_miscorrections(&test_set, &system, &cli.out_dir, &stem)?;
        }
    }

    println!("Done!");
    Ok(())
}
