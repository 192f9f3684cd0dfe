use anyhow::Context;
use clap::Parser;
use glove_eval::similarity::{DEFAULT_PHRASE_TOP_N, write_neighbors};
use glove_eval::{PathArgs, QueryError, StoreConfig, VectorStore, logging, prompt};
use std::io::{self, Write};

/// Rank the nearest words to a word or a phrase (sum of its words).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    /// Number of neighbours to list
    #[arg(long = "top_n", default_value_t = DEFAULT_PHRASE_TOP_N)]
    top_n: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.paths.verbose);

    let config = StoreConfig::from(&cli.paths);
    let word_vectors = VectorStore::load(&config).context("loading word vectors")?;

    println!("Near Words Tool - Type 'EXIT' to quit\n");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt::run_prompt_loop(
        stdin.lock(),
        &mut stdout,
        "Enter a word or phrase ('EXIT' to quit): ",
        |query, out| answer(&word_vectors, query, cli.top_n, out),
    )?;
    println!("Goodbye!");

    Ok(())
}

fn answer(
    word_vectors: &VectorStore,
    query: &str,
    top_n: usize,
    out: &mut impl Write,
) -> io::Result<()> {
    match word_vectors.nearest_to_phrase(query, top_n) {
        Ok(topn) => {
            let terms: Vec<&str> = query.split_whitespace().collect();
            writeln!(out, "\nNearest words to '{}':", terms.join(" + "))?;
            write_neighbors(out, &topn)
        }
        Err(QueryError::UnknownWords(oov)) => {
            for word in &oov {
                writeln!(out, "'{word}' is out of vocabulary")?;
            }
            Ok(())
        }
        Err(e) => writeln!(out, "{e}. Try again"),
    }
}
