use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading word vectors or running the analogy suite.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {reason}", path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("vocabulary '{}' contains no words", path.display())]
    EmptyVocabulary { path: PathBuf },

    #[error("vectors file '{}' contains no vectors", path.display())]
    EmptyVectors { path: PathBuf },

    #[error("no valid vocab found for {category}")]
    NoValidQuestions { category: String },
}

impl EvalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EvalError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Per-query failures. These never abort an interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("not found in the dictionary: {}", .0.join(", "))]
    UnknownWords(Vec<String>),

    #[error("no words were input")]
    EmptyQuery,
}

pub type Result<T, E = EvalError> = std::result::Result<T, E>;
