//! This module provides the `DocumentLoader` struct, responsible for loading machine documents
//! from JSON files, strings and directories.

use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::analyze;
use crate::document::Document;
use crate::types::EngineError;

/// `DocumentLoader` is a utility struct for loading machine documents.
///
/// Every loaded document is analyzed. Malformed graphs (duplicate state ids, edges to undefined
/// states, invalid labels) fail to load; other findings, such as a missing start state, are
/// logged and left for the engine to report as a rejected run.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Loads a single machine document from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` if the file is successfully read, parsed and analyzed.
    /// * `Err(EngineError::FileError)` if the file cannot be read.
    /// * `Err(EngineError::ParseError)` if the file content is not a valid document.
    /// * `Err(EngineError::ValidationError)` if the graph is malformed.
    pub fn load_document(path: &Path) -> Result<Document, EngineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_document_from_string(&content)
    }

    /// Loads a single machine document from JSON text.
    pub fn load_document_from_string(content: &str) -> Result<Document, EngineError> {
        let document: Document =
            serde_json::from_str(content).map_err(|e| EngineError::ParseError(e.to_string()))?;

        let (fatal, warnings): (Vec<_>, Vec<_>) = analyze(&document.graph(), document.mode)
            .into_iter()
            .partition(|error| error.is_fatal());

        if let Some(error) = fatal.into_iter().next() {
            return Err(error.into());
        }
        for warning in warnings {
            warn!("{}: {}", document.name, warning);
        }

        Ok(document)
    }

    /// Loads every `.json` document in a directory.
    ///
    /// Subdirectories and files with other extensions are skipped. Each element of the result
    /// is either the path and document that loaded, or the error for a file that did not.
    pub fn load_documents(directory: &Path) -> Vec<Result<(PathBuf, Document), EngineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(EngineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(EngineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                Some(Self::load_document(&path).map(|document| (path, document)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = r#"{
        "name": "Accept a",
        "states": [
            {"id": 0, "label": "q0", "isStart": true},
            {"id": 1, "label": "q1", "isEnd": true}
        ],
        "transitions": [{"from": 0, "to": 1, "labels": ["a"]}],
        "input": "a"
    }"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_document() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "accept.json", VALID);

        let document = DocumentLoader::load_document(&path).unwrap();
        assert_eq!(document.name, "Accept a");
        assert_eq!(document.mode, Mode::Automaton);
        assert_eq!(document.states.len(), 2);
        assert_eq!(document.input, "a");
    }

    #[test]
    fn test_load_missing_file() {
        let result = DocumentLoader::load_document(Path::new("/nonexistent/machine.json"));
        assert!(matches!(result, Err(EngineError::FileError(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let result = DocumentLoader::load_document_from_string("This is not a document");
        assert!(matches!(result, Err(EngineError::ParseError(_))));
    }

    #[test]
    fn test_malformed_graph_is_rejected() {
        let content = r#"{
            "name": "Bad label",
            "mode": "turing",
            "states": [{"id": 0, "label": "q0", "isStart": true, "isEnd": true}],
            "transitions": [{"from": 0, "to": 0, "labels": ["1,1"]}]
        }"#;

        match DocumentLoader::load_document_from_string(content) {
            Err(EngineError::ValidationError(msg)) => assert!(msg.contains("Invalid label")),
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_start_state_still_loads() {
        let content = r#"{
            "name": "No start",
            "states": [{"id": 0, "label": "q0", "isEnd": true}]
        }"#;

        let document = DocumentLoader::load_document_from_string(content).unwrap();
        assert_eq!(document.run().outcome(), crate::types::Status::Rejected);
    }

    #[test]
    fn test_load_documents_from_directory() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "valid.json", VALID);
        write_file(dir.path(), "invalid.json", "{}");
        write_file(dir.path(), "ignored.txt", "This file should be ignored");

        let results = DocumentLoader::load_documents(dir.path());

        // We should have 2 results: 1 success and 1 error
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_load_documents_from_missing_directory() {
        let results = DocumentLoader::load_documents(Path::new("/nonexistent/machines"));

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(EngineError::FileError(_))));
    }
}
