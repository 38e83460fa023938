use std::collections::BTreeSet;

use log::debug;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::error::TrainingError;

/// Additive (Laplace) smoothing applied when none is configured.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Multinomial Naive Bayes over non-negative feature weights such as TF-IDF.
///
/// Classes are kept in sorted order; on a tie in joint log likelihood the
/// first class in that order wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    classes: Vec<String>,
    class_count: Array1<f64>,
    class_log_prior: Array1<f64>,
    feature_count: Array2<f64>,
    feature_log_prob: Array2<f64>,
}

impl Default for MultinomialNaiveBayes {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl MultinomialNaiveBayes {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            classes: Vec::new(),
            class_count: Array1::zeros(0),
            class_log_prior: Array1::zeros(0),
            feature_count: Array2::zeros((0, 0)),
            feature_log_prob: Array2::zeros((0, 0)),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Class labels in the order used by [`predict_proba`](Self::predict_proba) columns.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_log_prior(&self) -> &Array1<f64> {
        &self.class_log_prior
    }

    pub fn feature_log_prob(&self) -> &Array2<f64> {
        &self.feature_log_prob
    }

    pub fn n_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Fits class priors and per-class feature likelihoods.
    ///
    /// # Arguments
    /// * `features` - One row per sample, all weights non-negative
    /// * `labels` - The class label of each row
    pub fn fit(&mut self, features: &Array2<f64>, labels: &[String]) -> Result<(), TrainingError> {
        if !(self.alpha > 0.0) {
            return Err(TrainingError::ValidationError(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if features.nrows() != labels.len() {
            return Err(TrainingError::ShapeMismatch(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(TrainingError::NoCategories);
        }
        if features.iter().any(|&v| v < 0.0 || v.is_nan()) {
            return Err(TrainingError::ValidationError(
                "feature weights must be non-negative".to_string(),
            ));
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let n_features = features.ncols();

        let mut class_count = Array1::<f64>::zeros(classes.len());
        let mut feature_count = Array2::<f64>::zeros((classes.len(), n_features));
        for (row, label) in features.rows().into_iter().zip(labels) {
            // classes was built from labels, so the search always hits
            let class_idx = classes.binary_search(label).unwrap_or_default();
            class_count[class_idx] += 1.0;
            let mut counts = feature_count.row_mut(class_idx);
            counts += &row;
        }

        let total = labels.len() as f64;
        let class_log_prior = class_count.mapv(|count| (count / total).ln());

        let smoothed = &feature_count + self.alpha;
        let row_totals = smoothed.sum_axis(Axis(1)).mapv(f64::ln);
        let mut feature_log_prob = smoothed.mapv(f64::ln);
        for (mut row, row_total) in feature_log_prob.rows_mut().into_iter().zip(row_totals.iter()) {
            row -= *row_total;
        }

        debug!(
            "Fitted naive Bayes on {} rows, {} classes, {} features",
            labels.len(),
            classes.len(),
            n_features
        );

        self.classes = classes;
        self.class_count = class_count;
        self.class_log_prior = class_log_prior;
        self.feature_count = feature_count;
        self.feature_log_prob = feature_log_prob;
        Ok(())
    }

    /// Unnormalized joint log likelihood, one column per class.
    fn joint_log_likelihood(&self, features: &Array2<f64>) -> Result<Array2<f64>, TrainingError> {
        if !self.is_fitted() {
            return Err(TrainingError::NotFitted("Naive Bayes classifier"));
        }
        if features.ncols() != self.n_features() {
            return Err(TrainingError::ShapeMismatch(format!(
                "expected {} features, got {}",
                self.n_features(),
                features.ncols()
            )));
        }
        Ok(features.dot(&self.feature_log_prob.t()) + &self.class_log_prior)
    }

    /// Predicts the most likely class of every row.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<String>, TrainingError> {
        let jll = self.joint_log_likelihood(features)?;
        Ok(jll
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (idx, &score) in row.iter().enumerate() {
                    if score > row[best] {
                        best = idx;
                    }
                }
                self.classes[best].clone()
            })
            .collect())
    }

    /// Posterior class probabilities of every row; columns follow [`classes`](Self::classes).
    pub fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>, TrainingError> {
        let mut jll = self.joint_log_likelihood(features)?;
        for mut row in jll.rows_mut() {
            let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
            row.mapv_inplace(|v| (v - max).exp());
            let sum = row.sum();
            row /= sum;
        }
        Ok(jll)
    }
}
