//! Evaluate static word embeddings: nearest words to a word or phrase,
//! and top-1 accuracy on the Google word analogy questions.

pub mod analogy;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod similarity;
pub mod vector_store;

pub use analogy::{
    CATEGORIES, CategoryScore, EvalReport, Group, Tally, evaluate_questions, evaluate_suite,
};
pub use config::{PathArgs, StoreConfig};
pub use error::{EvalError, QueryError};
pub use similarity::Neighbor;
pub use vector_store::VectorStore;
