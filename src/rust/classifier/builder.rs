use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::Axis;

use super::cleaner::clean_resume;
use super::dataset::{DatasetSource, ResumeDataset, DEFAULT_DATASET_PATH};
use super::error::TrainingError;
use super::metrics::{accuracy_score, classification_report, ClassificationReport};
use super::model::ResumeClassifier;
use super::naive_bayes::{MultinomialNaiveBayes, DEFAULT_ALPHA};
use super::split::{train_test_split, DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE};
use super::vectorizer::{TfidfVectorizer, DEFAULT_MAX_FEATURES};
use crate::artifacts::{ArtifactError, ArtifactStore, SavedArtifact};

/// A builder for configuring a training run with a fluent interface.
///
/// # Example
/// ```no_run
/// use resume_screener::TrainerBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = TrainerBuilder::new()
///     .with_dataset_path("UpdatedResumeDataSet.csv")
///     .with_output_dir("models")
///     .with_max_features(500)?
///     .build()?
///     .run()?;
/// println!("Model Accuracy: {:.2}", report.accuracy);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TrainerBuilder {
    dataset_path: PathBuf,
    output_dir: PathBuf,
    max_features: usize,
    test_size: f64,
    random_state: u64,
    alpha: f64,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerBuilder {
    /// Creates a builder with the stock configuration: `UpdatedResumeDataSet.csv`,
    /// artifacts in the working directory, 1000 features, 20% test rows, seed 42.
    pub fn new() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            output_dir: PathBuf::from("."),
            max_features: DEFAULT_MAX_FEATURES,
            test_size: DEFAULT_TEST_SIZE,
            random_state: DEFAULT_RANDOM_STATE,
            alpha: DEFAULT_ALPHA,
        }
    }

    pub fn with_dataset_path(mut self, path: impl AsRef<Path>) -> Self {
        self.dataset_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Result<Self, TrainingError> {
        if max_features == 0 {
            return Err(TrainingError::ValidationError(
                "max_features must be at least 1".to_string(),
            ));
        }
        self.max_features = max_features;
        Ok(self)
    }

    /// Fraction of rows held out for evaluation, strictly between 0 and 1.
    pub fn with_test_size(mut self, test_size: f64) -> Result<Self, TrainingError> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(TrainingError::ValidationError(format!(
                "test_size must be in (0, 1), got {}",
                test_size
            )));
        }
        self.test_size = test_size;
        Ok(self)
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Laplace smoothing for the Naive Bayes likelihoods.
    pub fn with_alpha(mut self, alpha: f64) -> Result<Self, TrainingError> {
        if !(alpha > 0.0) {
            return Err(TrainingError::ValidationError(format!(
                "alpha must be positive, got {}",
                alpha
            )));
        }
        self.alpha = alpha;
        Ok(self)
    }

    pub fn build(self) -> Result<Trainer, TrainingError> {
        if self.dataset_path.as_os_str().is_empty() {
            return Err(TrainingError::ValidationError(
                "dataset path cannot be empty".to_string(),
            ));
        }
        Ok(Trainer {
            dataset_path: self.dataset_path,
            store: ArtifactStore::new(self.output_dir),
            max_features: self.max_features,
            test_size: self.test_size,
            random_state: self.random_state,
            alpha: self.alpha,
        })
    }
}

/// Errors that abort a training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub source: DatasetSource,
    pub rows: usize,
    pub categories: usize,
    pub n_features: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub accuracy: f64,
    pub classification_report: ClassificationReport,
    pub classifier_artifact: SavedArtifact,
    pub vectorizer_artifact: SavedArtifact,
}

/// Runs the load, clean, vectorize, split, fit, evaluate and persist pipeline.
#[derive(Debug, Clone)]
pub struct Trainer {
    dataset_path: PathBuf,
    store: ArtifactStore,
    max_features: usize,
    test_size: f64,
    random_state: u64,
    alpha: f64,
}

impl Trainer {
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Loads the configured dataset, falling back to the built-in sample when the file is missing.
    pub fn load_dataset(&self) -> Result<ResumeDataset, TrainingError> {
        println!("Attempting to load {}...", self.dataset_path.display());
        let dataset = ResumeDataset::load_or_sample(&self.dataset_path)?;
        match dataset.source {
            DatasetSource::File => println!("Dataset loaded successfully!"),
            DatasetSource::Sample => println!("Dataset not found. Using sample data..."),
        }
        Ok(dataset)
    }

    /// Trains on an already loaded dataset and persists the artifacts.
    pub fn train(&self, dataset: &ResumeDataset) -> Result<(ResumeClassifier, TrainingReport), TrainerError> {
        if dataset.is_empty() {
            return Err(TrainingError::EmptyDataset.into());
        }
        let categories = dataset.categories().len();
        info!(
            "Training on {} rows from {} across {} categories",
            dataset.len(),
            dataset.source,
            categories
        );

        println!("Cleaning resume text...");
        let cleaned: Vec<String> = dataset
            .records
            .iter()
            .map(|record| clean_resume(&record.resume))
            .collect();
        let labels: Vec<String> = dataset.records.iter().map(|r| r.category.clone()).collect();

        println!("Creating TF-IDF vectorizer...");
        let mut vectorizer = TfidfVectorizer::new(self.max_features);
        let features = vectorizer.fit_transform(&cleaned)?;
        debug!("Feature matrix shape: {:?}", features.dim());

        println!("Splitting data...");
        let split = train_test_split(dataset.len(), self.test_size, self.random_state)?;
        let x_train = features.select(Axis(0), &split.train);
        let x_test = features.select(Axis(0), &split.test);
        let y_train: Vec<String> = split.train.iter().map(|&i| labels[i].clone()).collect();
        let y_test: Vec<String> = split.test.iter().map(|&i| labels[i].clone()).collect();

        println!("Training model...");
        let mut model = MultinomialNaiveBayes::new(self.alpha);
        model.fit(&x_train, &y_train)?;

        let predictions = model.predict(&x_test)?;
        let accuracy = accuracy_score(&y_test, &predictions)?;
        let report = classification_report(&y_test, &predictions)?;
        println!("Model Accuracy: {:.2}", accuracy);
        println!("{}", report);

        let classifier = ResumeClassifier::new(vectorizer, model)?;

        println!("Saving model and vectorizer...");
        let (classifier_artifact, vectorizer_artifact) = self.store.save(&classifier)?;
        info!(
            "{} sha256={}",
            classifier_artifact.path.display(),
            classifier_artifact.sha256
        );
        info!(
            "{} sha256={}",
            vectorizer_artifact.path.display(),
            vectorizer_artifact.sha256
        );

        let report = TrainingReport {
            source: dataset.source,
            rows: dataset.len(),
            categories,
            n_features: classifier.vectorizer.n_features(),
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            accuracy,
            classification_report: report,
            classifier_artifact,
            vectorizer_artifact,
        };
        Ok((classifier, report))
    }

    /// Executes the whole pipeline end to end.
    pub fn run(&self) -> Result<TrainingReport, TrainerError> {
        let dataset = self.load_dataset()?;
        let (_, report) = self.train(&dataset)?;

        println!("Model and vectorizer saved successfully!");
        println!("Files created:");
        println!("- {}", report.classifier_artifact.path.display());
        println!("- {}", report.vectorizer_artifact.path.display());
        Ok(report)
    }
}
