use crate::config::StoreConfig;
use crate::error::{EvalError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Vocabulary plus a dense, row-normalised embedding matrix.
///
/// Rows are stored back to back in one flat `Vec` so a full scan walks
/// contiguous memory. Nothing is mutated after loading.
pub struct VectorStore {
    words: Vec<String>,               // index to word map
    word_map: HashMap<String, usize>, // word to index map
    vectors: Vec<f64>,                // V * dims values, row-major
    dims: usize,
    covered: usize, // vocabulary words that received a vector
}

/// Scale `v` to unit length. A zero vector is left as it is.
/// Returns the original norm.
pub fn normalize(v: &mut [f64]) -> f64 {
    // divide by the largest magnitude first so x * x neither overflows
    // nor underflows
    let scale = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if scale == 0.0 {
        return 0.0;
    }
    let scaled_norm = v
        .iter()
        .map(|x| (x / scale).powi(2))
        .sum::<f64>()
        .sqrt();
    v.iter_mut().for_each(|e| *e = *e / scale / scaled_norm);
    scale * scaled_norm
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl VectorStore {
    /// Load the vocabulary and vectors files named in `config`.
    pub fn load(config: &StoreConfig) -> Result<VectorStore> {
        let vocab = open(&config.vocab_path)?;
        let vectors = open(&config.vector_path)?;
        Self::build(vocab, &config.vocab_path, vectors, &config.vector_path)
    }

    /// Same as [`VectorStore::load`] over already opened readers.
    pub fn from_readers<V: BufRead, W: BufRead>(vocab: V, vectors: W) -> Result<VectorStore> {
        Self::build(vocab, Path::new("<vocab>"), vectors, Path::new("<vectors>"))
    }

    fn build<V: BufRead, W: BufRead>(
        vocab: V,
        vocab_path: &Path,
        vectors: W,
        vector_path: &Path,
    ) -> Result<VectorStore> {
        let (words, word_map) = read_vocab(vocab, vocab_path)?;
        if words.is_empty() {
            return Err(EvalError::EmptyVocabulary {
                path: vocab_path.to_path_buf(),
            });
        }

        let (mut vectors, dims, has_vector) =
            read_vectors(vectors, vector_path, &word_map, words.len())?;

        for row in vectors.chunks_exact_mut(dims) {
            normalize(row);
        }

        let covered = has_vector.iter().filter(|&&b| b).count();
        info!(
            "loaded {} words, vector size {dims}, {covered} words with vectors",
            words.len()
        );
        if covered < words.len() {
            warn!(
                "{} vocabulary words have no vector and keep a zero row",
                words.len() - covered
            );
        }

        Ok(VectorStore {
            words,
            word_map,
            vectors,
            dims,
            covered,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of vocabulary words found in the vectors file.
    pub fn coverage(&self) -> usize {
        self.covered
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.word_map.get(word).copied()
    }

    pub fn word(&self, idx: usize) -> &str {
        &self.words[idx]
    }

    pub fn vector(&self, idx: usize) -> &[f64] {
        &self.vectors[idx * self.dims..(idx + 1) * self.dims]
    }

    pub(crate) fn rows(&self) -> &[f64] {
        &self.vectors
    }
}

fn open(path: &Path) -> Result<BufReader<fs::File>> {
    fs::File::open(path)
        .map(BufReader::new)
        .map_err(|e| EvalError::io(path, e))
}

// First token of each non-blank line is the word; the rest (counts) is ignored.
fn read_vocab<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<(Vec<String>, HashMap<String, usize>)> {
    let mut words: Vec<String> = Vec::new();
    let mut word_map: HashMap<String, usize> = HashMap::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EvalError::io(path, e))?;
        let Some(word) = line.split_whitespace().next() else {
            continue;
        };
        if word_map.contains_key(word) {
            warn!(
                "{}:{}: duplicate vocabulary word '{word}' ignored",
                path.display(),
                lineno + 1
            );
            continue;
        }
        word_map.insert(word.to_string(), words.len());
        words.push(word.to_string());
    }

    Ok((words, word_map))
}

// Parse the vectors file straight into a zeroed V x D matrix. Vectors for
// words outside the vocabulary are validated and then dropped.
fn read_vectors<R: BufRead>(
    reader: R,
    path: &Path,
    word_map: &HashMap<String, usize>,
    vocab_size: usize,
) -> Result<(Vec<f64>, usize, Vec<bool>)> {
    let malformed = |line: usize, reason: String| EvalError::MalformedLine {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut dims: Option<usize> = None;
    let mut matrix: Vec<f64> = Vec::new();
    let mut has_vector = vec![false; vocab_size];
    let mut values: Vec<f64> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line.map_err(|e| EvalError::io(path, e))?;
        let mut parts = line.split_whitespace();

        let Some(word) = parts.next() else {
            return Err(malformed(lineno, "empty line".to_string()));
        };

        values.clear();
        for s in parts {
            let x: f64 = s
                .parse()
                .map_err(|e| malformed(lineno, format!("invalid number '{s}': {e}")))?;
            if !x.is_finite() {
                return Err(malformed(lineno, format!("non-finite value '{s}'")));
            }
            values.push(x);
        }

        if values.is_empty() {
            return Err(malformed(lineno, format!("no vector components for '{word}'")));
        }

        let d = match dims {
            Some(d) => d,
            None => {
                // first vector decides the dimension
                let d = values.len();
                dims = Some(d);
                matrix = vec![0.0; vocab_size * d];
                d
            }
        };
        if values.len() != d {
            return Err(malformed(
                lineno,
                format!(
                    "vector for '{word}' has dimension {} which differs from initial dimension {d}",
                    values.len()
                ),
            ));
        }

        let Some(&idx) = word_map.get(word) else {
            continue;
        };
        if has_vector[idx] {
            debug!("{}:{lineno}: '{word}' seen again, keeping the later vector", path.display());
        }
        matrix[idx * d..(idx + 1) * d].copy_from_slice(&values);
        has_vector[idx] = true;
    }

    let Some(dims) = dims else {
        return Err(EvalError::EmptyVectors {
            path: path.to_path_buf(),
        });
    };
    Ok((matrix, dims, has_vector))
}
