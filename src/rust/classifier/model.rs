use std::collections::HashMap;

use super::cleaner::clean_resume;
use super::error::TrainingError;
use super::naive_bayes::MultinomialNaiveBayes;
use super::vectorizer::TfidfVectorizer;

/// A fitted TF-IDF vectorizer paired with the Naive Bayes model trained on its output.
///
/// This is what a scoring service loads from the persisted artifacts:
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use resume_screener::ArtifactStore;
///
/// let classifier = ArtifactStore::new(".").load()?;
/// let (category, scores) = classifier.predict("Java developer with Spring Boot experience")?;
/// println!("Predicted category: {}", category);
/// for (label, score) in scores {
///     println!("{}: {:.2}", label, score);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ResumeClassifier {
    pub vectorizer: TfidfVectorizer,
    pub model: MultinomialNaiveBayes,
}

impl ResumeClassifier {
    pub fn new(vectorizer: TfidfVectorizer, model: MultinomialNaiveBayes) -> Result<Self, TrainingError> {
        if vectorizer.n_features() != model.n_features() {
            return Err(TrainingError::ShapeMismatch(format!(
                "vectorizer produces {} features but the classifier expects {}",
                vectorizer.n_features(),
                model.n_features()
            )));
        }
        Ok(Self { vectorizer, model })
    }

    pub fn categories(&self) -> &[String] {
        self.model.classes()
    }

    /// Predicts the category of a raw resume and returns the posterior of every category.
    pub fn predict(&self, resume: &str) -> Result<(String, HashMap<String, f64>), TrainingError> {
        let features = self.vectorizer.transform(&[clean_resume(resume)])?;
        let proba = self.model.predict_proba(&features)?;
        let label = self
            .model
            .predict(&features)?
            .pop()
            .ok_or(TrainingError::NotFitted("Naive Bayes classifier"))?;
        let scores = self
            .model
            .classes()
            .iter()
            .cloned()
            .zip(proba.row(0).iter().copied())
            .collect();
        Ok((label, scores))
    }

    /// Predicts the category of many raw resumes.
    pub fn predict_batch<S: AsRef<str>>(&self, resumes: &[S]) -> Result<Vec<String>, TrainingError> {
        let cleaned: Vec<String> = resumes.iter().map(|r| clean_resume(r.as_ref())).collect();
        let features = self.vectorizer.transform(&cleaned)?;
        self.model.predict(&features)
    }
}
