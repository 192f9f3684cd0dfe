use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_VOCAB_FILE: &str = "vocab.txt";
pub const DEFAULT_VECTORS_FILE: &str = "vectors.txt";

/// Where the vocabulary and the vectors live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub vocab_path: PathBuf,
    pub vector_path: PathBuf,
}

impl StoreConfig {
    pub fn new(vocab_path: impl Into<PathBuf>, vector_path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            vocab_path: vocab_path.into(),
            vector_path: vector_path.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_VOCAB_FILE, DEFAULT_VECTORS_FILE)
    }
}

/// Command-line arguments shared by every tool. Flatten into a binary's `Cli`.
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Vocabulary file, one word per line
    #[arg(
        long = "vocab_path",
        visible_alias = "vocab_file",
        default_value = DEFAULT_VOCAB_FILE
    )]
    pub vocab_path: PathBuf,

    /// Word vectors file: word followed by its components
    #[arg(
        long = "vector_path",
        visible_alias = "vectors_file",
        default_value = DEFAULT_VECTORS_FILE
    )]
    pub vector_path: PathBuf,

    /// Verbosity: 0 warnings only, 1 info, 2 debug, 3 trace
    #[arg(short, long, default_value_t = 1)]
    pub verbose: u8,
}

impl From<&PathArgs> for StoreConfig {
    fn from(args: &PathArgs) -> Self {
        StoreConfig::new(&args.vocab_path, &args.vector_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        paths: PathArgs,
    }

    #[test]
    fn defaults_point_at_working_directory() {
        let cli = Cli::try_parse_from(["tool"]).unwrap();
        let config = StoreConfig::from(&cli.paths);
        assert_eq!(config, StoreConfig::default());
        assert_eq!(cli.paths.verbose, 1);
    }

    #[test]
    fn accepts_both_flag_spellings() {
        let args = ["tool", "--vocab_file", "v.txt", "--vectors_file", "w.txt"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(StoreConfig::from(&cli.paths), StoreConfig::new("v.txt", "w.txt"));

        let args = ["tool", "--vocab_path", "a", "--vector_path", "b", "-v", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(StoreConfig::from(&cli.paths), StoreConfig::new("a", "b"));
        assert_eq!(cli.paths.verbose, 3);
    }
}
