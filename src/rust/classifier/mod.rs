mod error;
mod cleaner;
mod vectorizer;
mod naive_bayes;
mod dataset;
mod split;
mod metrics;
mod model;
mod builder;

pub use error::TrainingError;
pub use cleaner::clean_resume;
pub use vectorizer::{TfidfVectorizer, DEFAULT_MAX_FEATURES};
pub use naive_bayes::{MultinomialNaiveBayes, DEFAULT_ALPHA};
pub use dataset::{DatasetSource, ResumeDataset, ResumeRecord, DEFAULT_DATASET_PATH};
pub use split::{train_test_split, SplitIndices, DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE};
pub use metrics::{accuracy_score, classification_report, ClassMetrics, ClassificationReport};
pub use model::ResumeClassifier;
pub use builder::{Trainer, TrainerBuilder, TrainerError, TrainingReport};
