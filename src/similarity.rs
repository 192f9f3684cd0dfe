use crate::error::QueryError;
use crate::vector_store::{VectorStore, dot, normalize};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::{self, Write};
use tracing::debug;

pub const DEFAULT_PHRASE_TOP_N: usize = 100;

/// One ranked result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub index: usize,
    pub word: &'a str,
    pub score: f64,
}

impl VectorStore {
    /// Map every term to its index. Fails listing each unknown term once.
    pub fn resolve(&self, terms: &[&str]) -> Result<Vec<usize>, QueryError> {
        if terms.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let mut unknown: Vec<String> = Vec::new();
        let mut indices = Vec::with_capacity(terms.len());
        for term in terms {
            match self.index_of(term) {
                Some(idx) => indices.push(idx),
                None if !unknown.iter().any(|w| w == term) => unknown.push(term.to_string()),
                None => {}
            }
        }

        if unknown.is_empty() {
            Ok(indices)
        } else {
            Err(QueryError::UnknownWords(unknown))
        }
    }

    /// Unit-length sum of the rows in `indices` (repeats count each time).
    pub fn query_vector(&self, indices: &[usize]) -> Vec<f64> {
        let mut target = vec![0.0; self.dims()];
        for &idx in indices {
            for (t, v) in target.iter_mut().zip(self.vector(idx)) {
                *t += v;
            }
        }
        if normalize(&mut target) == 0.0 {
            debug!("query vector has zero norm, all scores will be 0");
        }
        target
    }

    /// Nearest words to the sum of `terms`, by cosine similarity.
    /// The terms themselves never appear in the result.
    pub fn nearest(&self, terms: &[&str], n: usize) -> Result<Vec<Neighbor<'_>>, QueryError> {
        let indices = self.resolve(terms)?;
        let target = self.query_vector(&indices);
        let exclude: HashSet<usize> = indices.into_iter().collect();
        Ok(self.rank(&target, &exclude, n))
    }

    /// Whitespace separated phrase, e.g. `"paris france"`.
    pub fn nearest_to_phrase(
        &self,
        query: &str,
        n: usize,
    ) -> Result<Vec<Neighbor<'_>>, QueryError> {
        let terms: Vec<&str> = query.split_whitespace().collect();
        self.nearest(&terms, n)
    }

    pub fn nearest_to_word(&self, word: &str, n: usize) -> Result<Vec<Neighbor<'_>>, QueryError> {
        self.nearest(&[word], n)
    }

    /// Score every row against `target` and keep the best `n`.
    /// Equal scores keep vocabulary order.
    pub(crate) fn rank(
        &self,
        target: &[f64],
        exclude: &HashSet<usize>,
        n: usize,
    ) -> Vec<Neighbor<'_>> {
        // collect preserves row order, the sort below is stable
        let mut scores: Vec<(usize, f64)> = self
            .rows()
            .par_chunks_exact(self.dims())
            .enumerate()
            .filter(|(i, _)| !exclude.contains(i))
            .map(|(i, row)| (i, dot(row, target)))
            .collect();

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scores.truncate(n);

        scores
            .into_iter()
            .map(|(index, score)| Neighbor {
                index,
                word: self.word(index),
                score,
            })
            .collect()
    }
}

/// Rank / score / word table used by the interactive tools.
pub fn write_neighbors<W: Write>(w: &mut W, neighbors: &[Neighbor<'_>]) -> io::Result<()> {
    writeln!(w, "{:>4} {:>10} Word", "Rank", "Score")?;
    writeln!(w, "{}", "-".repeat(30))?;
    for (i, n) in neighbors.iter().enumerate() {
        writeln!(w, "{:4}: {:10.6} {}", i + 1, n.score, n.word)?;
    }
    Ok(())
}
