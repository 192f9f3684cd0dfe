//! Word analogy evaluation on the Google analogy question set.
//!
//! Efficient Estimation of Word Representations in Vector Space,
//! Tomas Mikolov et al, 2013. Each question line reads `a b c d`,
//! "a is to b as c is to d", and is answered by the word whose vector
//! has the largest dot product with `b - a + c`.

use crate::error::{EvalError, QueryError, Result};
use crate::similarity::Neighbor;
use crate::vector_store::{VectorStore, dot};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_QUESTION_DIR: &str = "./EvalProc/DataQ/";

/// The question files, in report order. The first [`SEMANTIC_COUNT`] are
/// semantic, the rest syntactic.
pub const CATEGORIES: [&str; 14] = [
    "capital-common-countries.txt",
    "capital-world.txt",
    "currency.txt",
    "city-in-state.txt",
    "family.txt",
    "gram1-adjective-to-adverb.txt",
    "gram2-opposite.txt",
    "gram3-comparative.txt",
    "gram4-superlative.txt",
    "gram5-present-participle.txt",
    "gram6-nationality-adjective.txt",
    "gram7-past-tense.txt",
    "gram8-plural.txt",
    "gram9-plural-verbs.txt",
];

pub const SEMANTIC_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Semantic,
    Syntactic,
}

impl Group {
    /// Group of the category at `position` in [`CATEGORIES`].
    pub fn of(position: usize) -> Group {
        if position < SEMANTIC_COUNT {
            Group::Semantic
        } else {
            Group::Syntactic
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub total: usize,
}

impl Tally {
    /// Top-1 accuracy in percent, `None` when nothing was evaluated.
    pub fn accuracy(&self) -> Option<f64> {
        percent(self.correct, self.total)
    }

    fn add(&mut self, other: Tally) {
        self.correct += other.correct;
        self.total += other.total;
    }
}

fn percent(num: usize, den: usize) -> Option<f64> {
    (den > 0).then(|| 100.0 * num as f64 / den as f64)
}

/// Result of one question file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub name: String,
    /// every line in the file
    pub seen: usize,
    /// lines that were not four in-vocabulary words
    pub skipped: usize,
    pub tally: Tally,
}

impl CategoryScore {
    pub fn valid(&self) -> usize {
        self.tally.total
    }

    /// A category without a single answerable question is an error.
    pub fn check(&self) -> Result<()> {
        if self.tally.total == 0 {
            return Err(EvalError::NoValidQuestions {
                category: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Split a question line into its four words.
pub fn parse_question(line: &str) -> Option<[&str; 4]> {
    let mut parts = line.split_whitespace();
    let q = [parts.next()?, parts.next()?, parts.next()?, parts.next()?];
    parts.next().is_none().then_some(q)
}

impl VectorStore {
    /// `vec(b) - vec(a) + vec(c)`, not normalised.
    pub fn analogy_vector(&self, a: usize, b: usize, c: usize) -> Vec<f64> {
        let (va, vb, vc) = (self.vector(a), self.vector(b), self.vector(c));
        (0..self.dims()).map(|i| vb[i] - va[i] + vc[i]).collect()
    }

    /// Index with the largest dot product against the analogy vector.
    /// The inputs are candidates too; on a tie the lowest index wins.
    pub fn predict(&self, a: usize, b: usize, c: usize) -> usize {
        let target = self.analogy_vector(a, b, c);

        let (_best_score, best_idx) = self
            .rows()
            .par_chunks_exact(self.dims())
            .enumerate()
            .map(|(i, row)| (dot(row, &target), i))
            .reduce(
                || (f64::NEG_INFINITY, usize::MAX), // (score, index)
                |best, current| {
                    if current.0 > best.0 || (current.0 == best.0 && current.1 < best.1) {
                        current
                    } else {
                        best
                    }
                },
            );

        best_idx
    }

    /// Top `n` answers to "a is to b as c is to ?", leaving out a, b and c.
    pub fn analogy_top_n(
        &self,
        a: &str,
        b: &str,
        c: &str,
        n: usize,
    ) -> Result<Vec<Neighbor<'_>>, QueryError> {
        let indices = self.resolve(&[a, b, c])?;
        let target = self.analogy_vector(indices[0], indices[1], indices[2]);
        let exclude: HashSet<usize> = indices.into_iter().collect();
        Ok(self.rank(&target, &exclude, n))
    }
}

/// Score one category. Every line counts as seen; only lines of four
/// in-vocabulary words are evaluated.
pub fn evaluate_questions<R: BufRead>(
    store: &VectorStore,
    name: &str,
    reader: R,
) -> Result<CategoryScore> {
    let mut seen = 0;
    let mut valid: Vec<[usize; 4]> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EvalError::io(name, e))?;
        seen += 1;

        let Some(words) = parse_question(&line) else {
            debug!("{name}:{}: not a 4 word question, skipped", lineno + 1);
            continue;
        };
        if let Ok(idx) = store.resolve(&words) {
            valid.push([idx[0], idx[1], idx[2], idx[3]]);
        }
    }

    let correct = valid
        .par_iter()
        .filter(|&&[a, b, c, d]| store.predict(a, b, c) == d)
        .count();

    Ok(CategoryScore {
        name: name.to_string(),
        seen,
        skipped: seen - valid.len(),
        tally: Tally {
            correct,
            total: valid.len(),
        },
    })
}

/// Per-category scores plus the semantic, syntactic and overall roll-ups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalReport {
    pub categories: Vec<(Group, CategoryScore)>,
    pub semantic: Tally,
    pub syntactic: Tally,
    pub overall: Tally,
    /// lines across all files, answerable or not
    pub seen: usize,
}

impl EvalReport {
    /// Categories without valid questions are listed but not aggregated.
    pub fn from_scores<I>(scores: I) -> EvalReport
    where
        I: IntoIterator<Item = (Group, CategoryScore)>,
    {
        let mut report = EvalReport::default();
        for (group, score) in scores {
            report.seen += score.seen;
            if score.check().is_ok() {
                match group {
                    Group::Semantic => report.semantic.add(score.tally),
                    Group::Syntactic => report.syntactic.add(score.tally),
                }
                report.overall.add(score.tally);
            }
            report.categories.push((group, score));
        }
        report
    }

    /// Share of all questions that could be evaluated, in percent.
    pub fn coverage(&self) -> Option<f64> {
        percent(self.overall.total, self.seen)
    }
}

/// Run every file in [`CATEGORIES`] found under `dir`.
/// A missing file aborts the run.
pub fn evaluate_suite(store: &VectorStore, dir: &Path) -> Result<EvalReport> {
    let mut scores = Vec::with_capacity(CATEGORIES.len());

    for (position, name) in CATEGORIES.iter().enumerate() {
        let path = dir.join(name);
        let file = fs::File::open(&path).map_err(|e| EvalError::io(&path, e))?;
        let score = evaluate_questions(store, name, BufReader::new(file))?;

        match score.check() {
            Ok(()) => info!(
                "{name}: {}/{} correct, {} skipped",
                score.tally.correct, score.tally.total, score.skipped
            ),
            Err(e) => warn!("{e}"),
        }
        scores.push((Group::of(position), score));
    }

    Ok(EvalReport::from_scores(scores))
}

struct Pct(Option<f64>);

impl fmt::Display for Pct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "{p:.2}%"),
            None => write!(f, "n/a"),
        }
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, score) in &self.categories {
            match score.check() {
                Ok(()) => writeln!(
                    f,
                    "{}: ACCURACY TOP1: {} ({}/{})",
                    score.name,
                    Pct(score.tally.accuracy()),
                    score.tally.correct,
                    score.tally.total
                )?,
                Err(e) => writeln!(f, "ERROR: {e}!")?,
            }
        }

        let rows = [
            ("Semantic", self.semantic),
            ("Syntactic", self.syntactic),
            ("Total", self.overall),
        ];
        writeln!(
            f,
            "Questions seen/total: {} ({}/{})",
            Pct(self.coverage()),
            self.overall.total,
            self.seen
        )?;
        for (label, tally) in rows {
            writeln!(
                f,
                "{label} accuracy: {} ({}/{})",
                Pct(tally.accuracy()),
                tally.correct,
                tally.total
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::tests::store;
    use std::io::{Cursor, Write};

    // normalised: man (1,0,0) king (.71,0,.71) woman (0,1,0) queen (0,.71,.71)
    const VOCAB: &str = "man\nking\nwoman\nqueen\nthe\n";
    const VECTORS: &str = "man 1 0 0\nking 1 0 1\nwoman 0 1 0\nqueen 0 1 1\n";

    #[test]
    fn parses_four_word_lines() {
        assert_eq!(parse_question("a b  c\td"), Some(["a", "b", "c", "d"]));
        assert_eq!(parse_question(": capital-world"), None);
        assert_eq!(parse_question("a b c"), None);
        assert_eq!(parse_question("a b c d e"), None);
        assert_eq!(parse_question(""), None);
    }

    #[test]
    fn king_minus_man_plus_woman_is_queen() {
        let s = store(VOCAB, VECTORS);
        let idx = |w| s.index_of(w).unwrap();
        assert_eq!(s.predict(idx("man"), idx("king"), idx("woman")), idx("queen"));
    }

    #[test]
    fn inputs_are_not_excluded() {
        let s = store(VOCAB, VECTORS);
        let idx = |w| s.index_of(w).unwrap();
        // king - king + woman == woman
        assert_eq!(s.predict(idx("king"), idx("king"), idx("woman")), idx("woman"));
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let s = store("a\nb\nc\n", "a 0 1\nb 0 1\nc 1 0\n");
        assert_eq!(s.predict(2, 2, 1), 0);
    }

    #[test]
    fn top_n_leaves_out_inputs() {
        let s = store(VOCAB, VECTORS);
        let ns = s.analogy_top_n("man", "king", "woman", 10).unwrap();
        let words: Vec<&str> = ns.iter().map(|n| n.word).collect();
        assert_eq!(words, ["queen", "the"]);
        assert_eq!(
            s.analogy_top_n("man", "king", "xyznotaword", 10),
            Err(QueryError::UnknownWords(vec!["xyznotaword".to_string()]))
        );
    }

    #[test]
    fn counts_seen_valid_and_skipped() {
        let s = store(VOCAB, VECTORS);
        let input = ": family\n\
                     man king woman queen\n\
                     man king woman prince\n\
                     \n\
                     woman queen man woman\n";
        let score = evaluate_questions(&s, "family.txt", Cursor::new(input)).unwrap();
        assert_eq!(score.seen, 5);
        assert_eq!(score.valid(), 2);
        assert_eq!(score.valid() + score.skipped, score.seen);
        assert_eq!(score.tally, Tally { correct: 1, total: 2 });
        assert_eq!(score.tally.accuracy(), Some(50.0));
        assert!(score.check().is_ok());
    }

    #[test]
    fn category_without_valid_rows_is_an_error() {
        let s = store(VOCAB, VECTORS);
        let input = Cursor::new("a b c d\nman king e f\n");
        let score = evaluate_questions(&s, "currency.txt", input).unwrap();
        assert_eq!(score.seen, 2);
        assert_eq!(score.skipped, 2);
        assert_eq!(score.tally.accuracy(), None);
        match score.check() {
            Err(EvalError::NoValidQuestions { category }) => assert_eq!(category, "currency.txt"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn report_skips_empty_categories_in_totals() {
        let ok = CategoryScore {
            name: "x".into(),
            seen: 4,
            skipped: 1,
            tally: Tally { correct: 2, total: 3 },
        };
        let empty = CategoryScore {
            name: "y".into(),
            seen: 6,
            skipped: 6,
            tally: Tally::default(),
        };
        let report = EvalReport::from_scores([(Group::Semantic, ok), (Group::Syntactic, empty)]);
        assert_eq!(report.seen, 10);
        assert_eq!(report.semantic, Tally { correct: 2, total: 3 });
        assert_eq!(report.syntactic, Tally::default());
        assert_eq!(report.overall, Tally { correct: 2, total: 3 });
        assert_eq!(report.coverage(), Some(30.0));

        let text = report.to_string();
        assert!(text.contains("x: ACCURACY TOP1: 66.67% (2/3)"));
        assert!(text.contains("ERROR: no valid vocab found for y!"));
        assert!(text.contains("Syntactic accuracy: n/a (0/0)"));
    }

    #[test]
    fn groups_follow_fixed_positions() {
        assert_eq!(Group::of(0), Group::Semantic);
        assert_eq!(Group::of(4), Group::Semantic);
        assert_eq!(Group::of(5), Group::Syntactic);
        assert_eq!(Group::of(13), Group::Syntactic);
        assert_eq!(CATEGORIES[SEMANTIC_COUNT - 1], "family.txt");
    }

    #[test]
    fn runs_the_full_suite() {
        let s = store(VOCAB, VECTORS);
        let dir = tempfile::tempdir().unwrap();
        for name in CATEGORIES {
            let body = match name {
                "capital-common-countries.txt" => "man king woman queen\nman king woman xyz\n",
                "family.txt" => "king queen man woman\nwoman queen man woman\n",
                "gram1-adjective-to-adverb.txt" => "man king woman queen\n",
                "gram2-opposite.txt" => "foo bar baz qux\n",
                _ => ": header\nwoman queen man woman\n",
            };
            write!(fs::File::create(dir.path().join(name)).unwrap(), "{body}").unwrap();
        }

        let report = evaluate_suite(&s, dir.path()).unwrap();
        assert_eq!(report.categories.len(), 14);
        for (_, score) in &report.categories {
            assert_eq!(score.valid() + score.skipped, score.seen);
        }
        assert_eq!(report.seen, 26);
        assert_eq!(report.semantic, Tally { correct: 2, total: 6 });
        assert_eq!(report.syntactic, Tally { correct: 1, total: 8 });
        assert_eq!(report.overall, Tally { correct: 3, total: 14 });
        assert!(report.categories[6].1.check().is_err());
    }

    #[test]
    fn missing_category_file_is_fatal() {
        let s = store(VOCAB, VECTORS);
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            evaluate_suite(&s, dir.path()),
            Err(EvalError::Io { .. })
        ));
    }
}
