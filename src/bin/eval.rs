use anyhow::Context;
use clap::Parser;
use glove_eval::analogy::DEFAULT_QUESTION_DIR;
use glove_eval::{PathArgs, StoreConfig, VectorStore, evaluate_suite, logging};
use std::path::PathBuf;
use tracing::info;

/// Top-1 accuracy on the semantic and syntactic analogy questions.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    /// Directory holding the 14 question files
    #[arg(long = "question_dir", default_value = DEFAULT_QUESTION_DIR)]
    question_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.paths.verbose);

    let config = StoreConfig::from(&cli.paths);
    let word_vectors = VectorStore::load(&config).context("loading word vectors")?;

    info!("evaluating questions in {}", cli.question_dir.display());
    let report = evaluate_suite(&word_vectors, &cli.question_dir)
        .with_context(|| format!("running analogy suite from {}", cli.question_dir.display()))?;

    print!("{report}");
    Ok(())
}
