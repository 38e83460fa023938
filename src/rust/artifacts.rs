use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::classifier::{MultinomialNaiveBayes, ResumeClassifier, TfidfVectorizer, TrainingError};

/// File name of the serialized classifier.
pub const CLASSIFIER_FILE: &str = "resume_classifier.pkl";
/// File name of the serialized vectorizer.
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.pkl";
/// Overrides the default artifact directory.
pub const ARTIFACT_DIR_ENV: &str = "RESUME_SCREENER_ARTIFACT_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Loaded artifacts are inconsistent: {0}")]
    Inconsistent(#[from] TrainingError),
}

/// A written artifact and its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub bytes: usize,
    pub sha256: String,
}

/// Reads and writes the classifier and vectorizer artifacts in one directory.
///
/// Writes go straight to the final path and overwrite whatever is there.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Uses `RESUME_SCREENER_ARTIFACT_DIR` when set, the working directory otherwise.
    pub fn new_default() -> Self {
        Self::new(Self::get_default_dir())
    }

    pub fn get_default_dir() -> PathBuf {
        dir_or_default(env::var(ARTIFACT_DIR_ENV).ok())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(CLASSIFIER_FILE)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.dir.join(VECTORIZER_FILE)
    }

    pub fn exists(&self) -> bool {
        self.classifier_path().exists() && self.vectorizer_path().exists()
    }

    fn write_artifact<T: Serialize>(&self, path: &Path, value: &T) -> Result<SavedArtifact, ArtifactError> {
        let bytes = serde_json::to_vec(value)?;
        log::info!("Writing {} bytes to {:?}", bytes.len(), path);
        fs::write(path, &bytes)?;
        Ok(SavedArtifact {
            path: path.to_path_buf(),
            bytes: bytes.len(),
            sha256: sha256_hex(&bytes),
        })
    }

    fn read_artifact<T: DeserializeOwned>(&self, path: &Path) -> Result<T, ArtifactError> {
        log::info!("Reading artifact {:?}", path);
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ArtifactError::NotFound(path.to_path_buf()),
            _ => ArtifactError::IoError(e),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Writes the classifier first, then the vectorizer.
    pub fn save(
        &self,
        classifier: &ResumeClassifier,
    ) -> Result<(SavedArtifact, SavedArtifact), ArtifactError> {
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir)?;
        }
        let model = self.write_artifact(&self.classifier_path(), &classifier.model)?;
        let vectorizer = self.write_artifact(&self.vectorizer_path(), &classifier.vectorizer)?;
        Ok((model, vectorizer))
    }

    pub fn load(&self) -> Result<ResumeClassifier, ArtifactError> {
        let model: MultinomialNaiveBayes = self.read_artifact(&self.classifier_path())?;
        let vectorizer: TfidfVectorizer = self.read_artifact(&self.vectorizer_path())?;
        Ok(ResumeClassifier::new(vectorizer, model)?)
    }

    /// SHA-256 of an artifact file as lowercase hex.
    pub fn digest(path: &Path) -> Result<String, ArtifactError> {
        let bytes = fs::read(path)?;
        Ok(sha256_hex(&bytes))
    }

    pub fn remove(&self) -> Result<(), ArtifactError> {
        for path in [self.classifier_path(), self.vectorizer_path()] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

fn dir_or_default(configured: Option<String>) -> PathBuf {
    match configured {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from("."),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean_resume;

    fn small_classifier() -> ResumeClassifier {
        let docs: Vec<String> = ["rust cargo crates", "golang goroutines channels"]
            .iter()
            .map(|d| clean_resume(d))
            .collect();
        let labels = vec!["Rust".to_string(), "Go".to_string()];
        let mut vectorizer = TfidfVectorizer::default();
        let features = vectorizer.fit_transform(&docs).unwrap();
        let mut model = MultinomialNaiveBayes::default();
        model.fit(&features, &labels).unwrap();
        ResumeClassifier::new(vectorizer, model).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(!store.exists());

        let (model, vectorizer) = store.save(&small_classifier()).unwrap();
        assert!(store.exists());
        assert!(model.bytes > 0 && vectorizer.bytes > 0);
        assert_eq!(ArtifactStore::digest(&model.path).unwrap(), model.sha256);

        let loaded = store.load().unwrap();
        let (label, _) = loaded.predict("cargo and crates").unwrap();
        assert_eq!(label, "Rust");
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        fs::write(store.classifier_path(), vec![0u8; 1 << 16]).unwrap();
        let (model, _) = store.save(&small_classifier()).unwrap();
        assert_eq!(fs::metadata(&model.path).unwrap().len() as usize, model.bytes);
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested"));
        assert!(matches!(store.load(), Err(ArtifactError::NotFound(_))));

        store.save(&small_classifier()).unwrap();
        fs::write(store.vectorizer_path(), "corrupted data").unwrap();
        assert!(matches!(store.load(), Err(ArtifactError::SerializationError(_))));

        store.remove().unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn test_default_dir() {
        assert_eq!(
            dir_or_default(Some("/tmp/resume-screener-artifacts".to_string())),
            PathBuf::from("/tmp/resume-screener-artifacts")
        );
        assert_eq!(dir_or_default(Some(String::new())), PathBuf::from("."));
        assert_eq!(dir_or_default(None), PathBuf::from("."));
    }
}
