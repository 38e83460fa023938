use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;
use resume_screener::{
    init_logger, ArtifactStore, Trainer, DEFAULT_DATASET_PATH, DEFAULT_MAX_FEATURES,
    DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE,
};

#[derive(Parser)]
#[command(author, version, about = "Train the resume category classifier", long_about = None)]
struct Args {
    /// CSV file with `Resume` and `Category` columns
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Directory for resume_classifier.pkl and tfidf_vectorizer.pkl
    /// [default: $RESUME_SCREENER_ARTIFACT_DIR or the working directory]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Vocabulary size cap
    #[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
    max_features: usize,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    test_size: f64,

    /// Seed for the train/test shuffle
    #[arg(long, default_value_t = DEFAULT_RANDOM_STATE)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();

    let output_dir = args
        .output_dir
        .unwrap_or_else(ArtifactStore::get_default_dir);

    let start_time = Instant::now();
    let report = Trainer::builder()
        .with_dataset_path(&args.dataset)
        .with_output_dir(&output_dir)
        .with_max_features(args.max_features)?
        .with_test_size(args.test_size)?
        .with_random_state(args.seed)
        .build()?
        .run()?;

    info!(
        "Trained on {} rows ({} train / {} test, {} features) in {:.2?}",
        report.rows,
        report.train_rows,
        report.test_rows,
        report.n_features,
        start_time.elapsed()
    );
    Ok(())
}
