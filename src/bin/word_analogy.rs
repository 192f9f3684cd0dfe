use anyhow::Context;
use clap::Parser;
use glove_eval::similarity::write_neighbors;
use glove_eval::{PathArgs, QueryError, StoreConfig, VectorStore, logging, prompt};
use std::io::{self, Write};

/// Interactive word analogies: KING is to QUEEN as MAN is to ?
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    /// Number of candidate answers to list
    #[arg(long = "top_n", default_value_t = 30)]
    top_n: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.paths.verbose);

    let config = StoreConfig::from(&cli.paths);
    let word_vectors = VectorStore::load(&config).context("loading word vectors")?;

    println!("\nWord analogy - KING is to QUEEN as MAN is to ?");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt::run_prompt_loop(stdin.lock(), &mut stdout, "Enter 3 words: ", |line, out| {
        let words: Vec<&str> = line.split_whitespace().collect();
        let [a, b, c] = words[..] else {
            let n = words.len();
            return writeln!(out, "Expected exactly 3 words, but got {n}. Try again.");
        };

        match word_vectors.analogy_top_n(a, b, c, cli.top_n) {
            Ok(topn) => write_neighbors(out, &topn),
            Err(QueryError::UnknownWords(oov)) => {
                for word in &oov {
                    writeln!(out, "'{word}' is out of vocabulary")?;
                }
                Ok(())
            }
            Err(e) => writeln!(out, "{e}"),
        }
    })?;

    Ok(())
}
