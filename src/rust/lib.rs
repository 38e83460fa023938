//! Resume category classification and ATS scoring API smoke testing.
//!
//! The crate has two independent halves:
//!
//! * a trainer that cleans resume text, fits a TF-IDF vectorizer and a
//!   multinomial Naive Bayes classifier, reports held-out accuracy and
//!   writes both fitted models to disk;
//! * a smoke-test client that checks a running ATS scoring service.
//!
//! # Training
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use resume_screener::Trainer;
//!
//! // Falls back to the built-in sample data when the CSV is missing
//! let report = Trainer::builder()
//!     .with_dataset_path("UpdatedResumeDataSet.csv")
//!     .build()?
//!     .run()?;
//! println!("Model Accuracy: {:.2}", report.accuracy);
//! # Ok(())
//! # }
//! ```
//!
//! # Classifying with saved artifacts
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use resume_screener::ArtifactStore;
//!
//! let classifier = ArtifactStore::new_default().load()?;
//! let (category, _scores) = classifier.predict("DevOps engineer with Kubernetes and Terraform")?;
//! println!("Predicted category: {}", category);
//! # Ok(())
//! # }
//! ```
//!
//! # Smoke testing the scoring service
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use resume_screener::SmokeClient;
//!
//! let client = SmokeClient::new("http://localhost:5000")?;
//! if client.health_check().await {
//!     client.calculate_ats_only().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod artifacts;
pub mod smoke;

pub use classifier::{
    accuracy_score, classification_report, clean_resume, train_test_split, ClassMetrics,
    ClassificationReport, DatasetSource, MultinomialNaiveBayes, ResumeClassifier, ResumeDataset,
    ResumeRecord, SplitIndices, TfidfVectorizer, Trainer, TrainerBuilder, TrainerError,
    TrainingError, TrainingReport, DEFAULT_ALPHA, DEFAULT_DATASET_PATH, DEFAULT_MAX_FEATURES,
    DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE,
};
pub use artifacts::{ArtifactError, ArtifactStore, SavedArtifact, CLASSIFIER_FILE, VECTORIZER_FILE};
pub use smoke::{AtsRequest, EndpointResponse, ResponseBody, SmokeClient, SmokeError, SmokeReport};

/// Initializes `env_logger` with an `info` default filter; `RUST_LOG` overrides it.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
