use crate::document::Document;
use crate::loader::DocumentLoader;
use crate::types::EngineError;

use log::error;
use std::sync::RwLock;

// Embedded sample machines
const SAMPLE_TEXTS: [&str; 4] = [
    include_str!("../demos/ends-with-ab.json"),
    include_str!("../demos/decimal-number.json"),
    include_str!("../demos/binary-increment.json"),
    include_str!("../demos/endless-walk.json"),
];

lazy_static::lazy_static! {
    pub static ref SAMPLES: RwLock<Vec<Document>> = RwLock::new(Vec::new());
}

pub struct SampleRegistry;

impl SampleRegistry {
    /// Parses the embedded samples and stores them in [`SAMPLES`].
    pub fn load() -> Result<(), EngineError> {
        let mut samples = Vec::new();

        for text in SAMPLE_TEXTS {
            match DocumentLoader::load_document_from_string(text) {
                Ok(document) => samples.push(document),
                Err(e) => error!("Failed to load sample: {}", e),
            }
        }

        let mut guard = SAMPLES
            .write()
            .map_err(|_| EngineError::FileError("Failed to acquire write lock".to_string()))?;
        *guard = samples;

        Ok(())
    }

    /// Loads the samples on first use.
    fn ensure_loaded() {
        let loaded = SAMPLES.read().map(|samples| !samples.is_empty()).unwrap_or(false);
        if !loaded {
            let _ = Self::load();
        }
    }

    /// Get the number of available samples
    pub fn count() -> usize {
        Self::ensure_loaded();

        SAMPLES.read().map(|samples| samples.len()).unwrap_or(0)
    }

    /// Get a sample by its index
    pub fn get_by_index(index: usize) -> Result<Document, EngineError> {
        Self::ensure_loaded();

        SAMPLES
            .read()
            .map_err(|_| EngineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                EngineError::ValidationError(format!("Sample index {} out of range", index))
            })
    }

    /// Get a sample by its name, ignoring case
    pub fn get_by_name(name: &str) -> Result<Document, EngineError> {
        Self::ensure_loaded();

        SAMPLES
            .read()
            .map_err(|_| EngineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|sample| sample.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| EngineError::ValidationError(format!("Sample '{}' not found", name)))
    }

    /// List all sample names
    pub fn list_names() -> Vec<String> {
        Self::ensure_loaded();

        SAMPLES
            .read()
            .map(|samples| samples.iter().map(|sample| sample.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Search for samples by name
    pub fn search(query: &str) -> Vec<usize> {
        Self::ensure_loaded();
        let query = query.to_lowercase();

        SAMPLES
            .read()
            .map(|samples| {
                samples
                    .iter()
                    .enumerate()
                    .filter(|(_, sample)| sample.name.to_lowercase().contains(&query))
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the original JSON text of a sample by its index
    pub fn get_text_by_index(index: usize) -> Result<&'static str, EngineError> {
        SAMPLE_TEXTS.get(index).copied().ok_or_else(|| {
            EngineError::ValidationError(format!("Sample text index {} out of range", index))
        })
    }
}
