use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::TrainingError;

fn check_lengths(truth: &[String], predicted: &[String]) -> Result<(), TrainingError> {
    if truth.len() != predicted.len() {
        return Err(TrainingError::ShapeMismatch(format!(
            "{} true labels but {} predictions",
            truth.len(),
            predicted.len()
        )));
    }
    if truth.is_empty() {
        return Err(TrainingError::ValidationError(
            "cannot score an empty prediction set".to_string(),
        ));
    }
    Ok(())
}

/// Fraction of predictions equal to the true label, in `[0.0, 1.0]`.
pub fn accuracy_score(truth: &[String], predicted: &[String]) -> Result<f64, TrainingError> {
    check_lengths(truth, predicted)?;
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Precision, recall and F1 for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics plus macro and support-weighted averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    // Undefined ratios score 0, matching the usual zero_division convention
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Builds a report over the union of labels seen in `truth` and `predicted`.
pub fn classification_report(
    truth: &[String],
    predicted: &[String],
) -> Result<ClassificationReport, TrainingError> {
    let accuracy = accuracy_score(truth, predicted)?;
    let labels: BTreeSet<&String> = truth.iter().chain(predicted).collect();

    let classes: Vec<ClassMetrics> = labels
        .into_iter()
        .map(|label| {
            let true_positive = truth
                .iter()
                .zip(predicted)
                .filter(|(t, p)| *t == label && *p == label)
                .count();
            let support = truth.iter().filter(|t| *t == label).count();
            let predicted_count = predicted.iter().filter(|p| *p == label).count();
            let precision = ratio(true_positive, predicted_count);
            let recall = ratio(true_positive, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let n_classes = classes.len() as f64;
    let total_support: usize = classes.iter().map(|c| c.support).sum();
    let macro_avg = ClassMetrics {
        label: "macro avg".to_string(),
        precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
        recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
        f1: classes.iter().map(|c| c.f1).sum::<f64>() / n_classes,
        support: total_support,
    };
    let weight = |c: &ClassMetrics| c.support as f64 / total_support as f64;
    let weighted_avg = ClassMetrics {
        label: "weighted avg".to_string(),
        precision: classes.iter().map(|c| c.precision * weight(c)).sum(),
        recall: classes.iter().map(|c| c.recall * weight(c)).sum(),
        f1: classes.iter().map(|c| c.f1 * weight(c)).sum(),
        support: total_support,
    };

    Ok(ClassificationReport {
        classes,
        accuracy,
        macro_avg,
        weighted_avg,
    })
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or(0);
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9}  {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        let row = |f: &mut fmt::Formatter<'_>, m: &ClassMetrics| {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
                m.label, m.precision, m.recall, m.f1, m.support
            )
        };
        for class in &self.classes {
            row(f, class)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        row(f, &self.macro_avg)?;
        row(f, &self.weighted_avg)
    }
}
