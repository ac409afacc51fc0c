use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use unispell::lexicon::ProbabilityModel;
use unispell::speller::{Corrector, CorrectorConfig, Decision};

#[derive(Debug, Parser)]
#[command(
    name = "unispell",
    version,
    about = "Corrects one misspelled word per input line"
)]
struct Args {
    /// Probability model: simple or smooth
    model: ProbabilityModel,

    /// Files to read and correct, line by line. If empty, stdin is used
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Corpus to count word frequencies from
    #[arg(long, default_value = "./data/corpus.txt")]
    corpus: PathBuf,

    /// Misspelling table
    #[arg(long, default_value = "./data/spell-errors.txt")]
    spell_errors: PathBuf,

    /// JSON file overriding the corrector defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Add every correct word of the misspelling table to the corpus with this count
    #[arg(long)]
    fold_weight: Option<u64>,
}

fn load_config(args: &Args) -> anyhow::Result<CorrectorConfig> {
    let mut cfg: CorrectorConfig = match &args.config {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(file)?
        }
        None => CorrectorConfig::default(),
    };

    cfg.model = args.model;
    if args.fold_weight.is_some() {
        cfg.fold_weight = args.fold_weight;
    }
    Ok(cfg)
}

fn trace_disagreement(word: &str, decision: &Decision) {
    if !decision.sources_disagree() {
        return;
    }
    if let (Some(c), Some(t)) = (&decision.candidate, &decision.table) {
        log::debug!(
            "{}: corpus {} ({:.6}) vs table {} ({:.6}) -> {}",
            word,
            c.value(),
            c.score(),
            t.value(),
            t.score(),
            decision.value()
        );
    }
}

fn run(corrector: &Corrector, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line?;
        writeln!(out, "{}", corrector.correct(line.trim_end()))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();
    let cfg = load_config(&args)?;

    let corrector = Corrector::open(&args.corpus, &args.spell_errors, cfg)?
        .with_tracer(trace_disagreement);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.files.is_empty() {
        eprintln!("Reading from stdin...");
        run(&corrector, io::stdin().lock(), &mut out)?;
    } else {
        for path in &args.files {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            run(&corrector, BufReader::new(file), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
