use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::error::TrainingError;

/// File the trainer looks for in the working directory.
pub const DEFAULT_DATASET_PATH: &str = "UpdatedResumeDataSet.csv";

/// A labelled resume, one CSV row with `Resume` and `Category` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(rename = "Resume")]
    pub resume: String,
    #[serde(rename = "Category")]
    pub category: String,
}

impl ResumeRecord {
    pub fn new(resume: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            resume: resume.into(),
            category: category.into(),
        }
    }
}

/// Where the training rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSource {
    File,
    Sample,
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "dataset file"),
            Self::Sample => write!(f, "built-in sample data"),
        }
    }
}

/// An in-memory collection of resume records.
#[derive(Debug, Clone)]
pub struct ResumeDataset {
    pub records: Vec<ResumeRecord>,
    pub source: DatasetSource,
}

const SAMPLE_ROWS: [(&str, &str); 10] = [
    (
        "Python developer with 3 years experience in Django and Flask. Worked on web applications and REST APIs. Skills include Python, JavaScript, SQL, Git.",
        "Python Developer",
    ),
    (
        "React developer with expertise in JavaScript, HTML, CSS. Built multiple web applications using React, Node.js, and MongoDB. Experience with Redux.",
        "Web Developer",
    ),
    (
        "Data scientist with experience in machine learning, Python, R, SQL. Worked on predictive models using scikit-learn, pandas, numpy.",
        "Data Science",
    ),
    (
        "Java developer with Spring Boot experience. Built enterprise applications using Java, Spring, MySQL, AWS. Knowledge of microservices architecture.",
        "Java Developer",
    ),
    (
        "Frontend developer specializing in React and Vue.js. Experience with TypeScript, webpack, and modern JavaScript frameworks.",
        "Web Developer",
    ),
    (
        "Full stack developer with Python and React experience. Built web applications using Django, PostgreSQL, and React. DevOps experience with Docker.",
        "Python Developer",
    ),
    (
        "Mobile developer with React Native and Flutter experience. Published apps on iOS and Android. Experience with Firebase and REST APIs.",
        "Web Developer",
    ),
    (
        "Backend developer with Node.js and Express experience. Built scalable APIs using MongoDB and Redis. Experience with microservices.",
        "Web Developer",
    ),
    (
        "DevOps engineer with AWS and Docker experience. Automated CI/CD pipelines using Jenkins and GitHub Actions. Experience with Kubernetes.",
        "DevOps Engineer",
    ),
    (
        "UI/UX designer with Figma and Adobe Creative Suite experience. Designed web and mobile applications. Experience with user research.",
        "Designer",
    ),
];

impl ResumeDataset {
    /// The embedded fallback table: 10 resumes across 6 categories.
    pub fn sample() -> Self {
        Self {
            records: SAMPLE_ROWS
                .iter()
                .map(|(resume, category)| ResumeRecord::new(*resume, *category))
                .collect(),
            source: DatasetSource::Sample,
        }
    }

    /// Parses CSV with a header row containing `Resume` and `Category`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TrainingError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let records = csv_reader
            .deserialize::<ResumeRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            records,
            source: DatasetSource::File,
        })
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, TrainingError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Loads the dataset at `path`, substituting [`sample`](Self::sample) when the file does not exist.
    ///
    /// Every other read or parse failure is returned unchanged.
    pub fn load_or_sample<P: AsRef<Path>>(path: P) -> Result<Self, TrainingError> {
        let path = path.as_ref();
        debug!("Reading dataset from {}", path.display());
        match Self::from_csv(path) {
            Ok(dataset) => {
                info!("Dataset loaded successfully ({} rows)", dataset.len());
                Ok(dataset)
            }
            Err(TrainingError::DatasetIo(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!("{} not found, using sample data", path.display());
                Ok(Self::sample())
            }
            Err(e) => Err(e),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct category labels, sorted.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.category.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        let dataset = ResumeDataset::sample();
        assert_eq!(dataset.len(), 10);
        assert_eq!(dataset.categories().len(), 6);
        assert_eq!(dataset.source, DatasetSource::Sample);
    }

    #[test]
    fn test_from_reader_ignores_extra_columns() {
        let csv = "Category,Resume,Extra\nData Science,\"Pandas, numpy\",x\nHR,Recruiting,y\n";
        let dataset = ResumeDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            dataset.records,
            vec![
                ResumeRecord::new("Pandas, numpy", "Data Science"),
                ResumeRecord::new("Recruiting", "HR"),
            ]
        );
        assert_eq!(dataset.source, DatasetSource::File);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "Category,Text\nHR,Recruiting\n";
        assert!(matches!(
            ResumeDataset::from_reader(csv.as_bytes()),
            Err(TrainingError::MalformedDataset(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_sample() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = ResumeDataset::load_or_sample(dir.path().join("absent.csv")).unwrap();
        assert_eq!(dataset.source, DatasetSource::Sample);
        assert_eq!(dataset.len(), 10);
    }

    #[test]
    fn test_unreadable_path_is_not_masked() {
        // A directory exists but cannot be parsed as CSV
        let dir = tempfile::tempdir().unwrap();
        assert!(ResumeDataset::load_or_sample(dir.path()).is_err());
    }
}
