use anyhow::Context;
use clap::Parser;
use glove_eval::similarity::write_neighbors;
use glove_eval::{PathArgs, StoreConfig, VectorStore, logging, prompt};
use std::io::{self, Write};

const TOP_N: usize = 100;

/// Rank the nearest words to a single word.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    /// Number of neighbours to list
    #[arg(long = "top_n", default_value_t = TOP_N)]
    top_n: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.paths.verbose);

    let config = StoreConfig::from(&cli.paths);
    let word_vectors = VectorStore::load(&config).context("loading word vectors")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let ask = "\nEnter a word or EXIT to stop: ";
    prompt::run_prompt_loop(stdin.lock(), &mut stdout, ask, |word, out| {
        match word_vectors.nearest_to_word(word, cli.top_n) {
            Ok(topn) => write_neighbors(out, &topn),
            Err(_) => writeln!(out, "Word: {word} not found in the dictionary."),
        }
    })?;

    Ok(())
}
