use std::collections::{BTreeMap, HashSet};

use log::debug;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::error::TrainingError;

/// Default cap on the number of vocabulary terms.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// Shortest token that enters the vocabulary.
const MIN_TOKEN_LEN: usize = 2;

fn tokenize(document: &str) -> impl Iterator<Item = &str> {
    document
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
}

/// TF-IDF vectorizer over whitespace-separated, already cleaned text.
///
/// The vocabulary keeps at most `max_features` terms, chosen by their total
/// count across the fitted corpus. Columns are ordered alphabetically. IDF is
/// smoothed as `ln((1 + n) / (1 + df)) + 1` and every row is L2-normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: BTreeMap<String, usize>,
    terms: Vec<String>,
    idf: Array1<f64>,
    fitted: bool,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: BTreeMap::new(),
            terms: Vec::new(),
            idf: Array1::zeros(0),
            fitted: false,
        }
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Number of columns produced by [`transform`](Self::transform).
    pub fn n_features(&self) -> usize {
        self.terms.len()
    }

    /// Mapping from term to column index.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Vocabulary terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Learns the vocabulary and IDF weights from a corpus.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<(), TrainingError> {
        if documents.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        if self.max_features == 0 {
            return Err(TrainingError::ValidationError(
                "max_features must be at least 1".to_string(),
            ));
        }

        // BTreeMap keeps candidate terms in alphabetical order for tie-breaking
        let mut term_counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for document in documents {
            let mut seen = HashSet::new();
            for token in tokenize(document.as_ref()) {
                let entry = term_counts.entry(token).or_insert((0, 0));
                entry.0 += 1;
                if seen.insert(token) {
                    entry.1 += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, usize, usize)> = term_counts
            .into_iter()
            .map(|(term, (count, df))| (term, count, df))
            .collect();
        if ranked.len() > self.max_features {
            // Stable sort: equal counts keep alphabetical order
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            ranked.truncate(self.max_features);
            ranked.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let n_docs = documents.len() as f64;
        self.terms = ranked.iter().map(|(term, _, _)| term.to_string()).collect();
        self.vocabulary = self
            .terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        self.idf = ranked
            .iter()
            .map(|(_, _, df)| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        self.fitted = true;

        debug!(
            "Fitted TF-IDF vocabulary with {} terms over {} documents",
            self.terms.len(),
            documents.len()
        );
        Ok(())
    }

    /// Projects documents onto the fitted vocabulary, one row per document.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Array2<f64>, TrainingError> {
        if !self.fitted {
            return Err(TrainingError::NotFitted("TF-IDF vectorizer"));
        }

        let mut matrix = Array2::zeros((documents.len(), self.terms.len()));
        for (row_idx, document) in documents.iter().enumerate() {
            let mut row = matrix.row_mut(row_idx);
            for token in tokenize(document.as_ref()) {
                if let Some(&col) = self.vocabulary.get(token) {
                    row[col] += 1.0;
                }
            }
            row *= &self.idf;
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }
        Ok(matrix)
    }

    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<Array2<f64>, TrainingError> {
        self.fit(documents)?;
        self.transform(documents)
    }
}
