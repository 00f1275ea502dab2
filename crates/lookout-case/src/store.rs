//! Case directory storage.

use crate::error::{CaseError, Result};
use crate::types::{CaseFile, CaseMetadata, CaseScope, CaseStatus, EvidenceEntry, EvidenceInput};
use lookout_core::{AppConfig, CaseId, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Initial status label of a new case.
const OPEN_STATUS: &str = "OPEN";

/// Stores cases as JSON files below a base directory.
#[derive(Debug, Clone)]
pub struct CaseStore {
    base_dir: PathBuf,
}

impl CaseStore {
    /// Create a store rooted at `base_dir`. Nothing is created until the
    /// first case is.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Create a store at the configured cases directory.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let dir = config.cases_dir().map_err(lookout_core::LookoutError::from)?;
        Ok(Self::new(dir))
    }

    /// Base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding `case_id`'s files.
    #[must_use]
    pub fn case_dir(&self, case_id: &CaseId) -> PathBuf {
        self.base_dir.join(format!("case_{case_id}"))
    }

    fn file_path(&self, case_id: &CaseId, file: CaseFile) -> PathBuf {
        self.case_dir(case_id).join(file.file_name())
    }

    fn existing_case_dir(&self, case_id: &CaseId) -> Result<PathBuf> {
        let dir = self.case_dir(case_id);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(CaseError::NotFound {
                case_id: case_id.to_string(),
            })
        }
    }

    /// Create a case directory with fresh metadata and empty data files.
    pub fn create_case(
        &self,
        case_name: &str,
        analyst: &str,
        scope: CaseScope,
    ) -> Result<CaseMetadata> {
        let case_id = CaseId::generate();
        let dir = self.case_dir(&case_id);
        fs::create_dir_all(&dir).map_err(|source| CaseError::Io {
            path: dir.clone(),
            source,
        })?;

        let now = Timestamp::now();
        let metadata = CaseMetadata {
            case_id: case_id.clone(),
            case_name: case_name.to_string(),
            analyst: analyst.to_string(),
            scope,
            status: OPEN_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };

        write_json(&self.file_path(&case_id, CaseFile::Metadata), &metadata)?;
        for file in CaseFile::DATA_FILES {
            write_json(&self.file_path(&case_id, file), &Value::Array(Vec::new()))?;
        }

        info!(case_id = %case_id, case_name = %case_name, "created case");
        Ok(metadata)
    }

    /// Overwrite one of a case's files with `value`.
    pub fn update_case<T: Serialize>(
        &self,
        case_id: &CaseId,
        file: CaseFile,
        value: &T,
    ) -> Result<()> {
        self.existing_case_dir(case_id)?;
        write_json(&self.file_path(case_id, file), value)?;
        debug!(case_id = %case_id, file = file.file_name(), "updated case file");
        Ok(())
    }

    /// Replace the analyst notes, stamping `updated_at`.
    pub fn save_analyst_notes(
        &self,
        case_id: &CaseId,
        mut notes: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        notes.insert(
            "updated_at".to_string(),
            Value::String(Timestamp::now().to_rfc3339()),
        );
        self.update_case(case_id, CaseFile::AnalystNotes, &notes)?;
        Ok(notes)
    }

    /// Append to the evidence log. An unreadable log is started over.
    pub fn add_evidence(&self, case_id: &CaseId, evidence: EvidenceInput) -> Result<EvidenceEntry> {
        self.existing_case_dir(case_id)?;
        let path = self.file_path(case_id, CaseFile::Evidence);

        let mut log: Vec<Value> = match read_json(&path) {
            Ok(log) => log,
            Err(CaseError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Vec::new()
            }
            Err(e) => {
                warn!(case_id = %case_id, error = %e, "evidence log unreadable, starting a new one");
                Vec::new()
            }
        };

        let entry = EvidenceEntry {
            evidence_id: uuid::Uuid::new_v4().to_string(),
            input: evidence,
            collected_at: Timestamp::now(),
        };

        log.push(serde_json::to_value(&entry).map_err(|source| CaseError::Json {
            path: path.clone(),
            source,
        })?);
        write_json(&path, &log)?;

        debug!(case_id = %case_id, evidence_id = %entry.evidence_id, "logged evidence");
        Ok(entry)
    }

    /// `Completed` once a non-empty investigation has been stored.
    pub fn case_status(&self, case_id: &CaseId) -> Result<CaseStatus> {
        self.existing_case_dir(case_id)?;
        let path = self.file_path(case_id, CaseFile::Investigation);

        let stored = match read_json::<Value>(&path) {
            Ok(value) => value,
            Err(e) => {
                debug!(case_id = %case_id, error = %e, "no readable investigation");
                return Ok(CaseStatus::Processing);
            }
        };

        let empty = match &stored {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            _ => false,
        };

        Ok(if empty {
            CaseStatus::Processing
        } else {
            CaseStatus::Completed
        })
    }

    /// Read `metadata.json`.
    pub fn load_metadata(&self, case_id: &CaseId) -> Result<CaseMetadata> {
        self.existing_case_dir(case_id)?;
        read_json(&self.file_path(case_id, CaseFile::Metadata))
    }

    /// Read any case file as raw JSON.
    pub fn load_file(&self, case_id: &CaseId, file: CaseFile) -> Result<Value> {
        self.existing_case_dir(case_id)?;
        read_json(&self.file_path(case_id, file))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).map_err(|source| CaseError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents).map_err(|source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CaseError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, CaseStore) {
        let dir = TempDir::new().expect("create temp dir");
        let store = CaseStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_create_case_layout() {
        let (_dir, store) = store();
        let metadata = store
            .create_case("Op Nightjar", "kim", CaseScope::default())
            .expect("create case");

        let case_dir = store.case_dir(&metadata.case_id);
        for file in ["metadata.json", "investigation.json", "analyst_notes.json", "evidence.json"] {
            assert!(case_dir.join(file).is_file(), "missing {file}");
        }
        assert!(case_dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("case_")));

        let loaded = store.load_metadata(&metadata.case_id).expect("load metadata");
        assert_eq!(loaded, metadata);
        assert_eq!(loaded.status, "OPEN");
    }

    #[test]
    fn test_status_transitions() {
        let (_dir, store) = store();
        let id = store
            .create_case("c", "a", CaseScope::default())
            .expect("create case")
            .case_id;

        assert_eq!(store.case_status(&id).expect("status"), CaseStatus::Processing);

        store
            .update_case(&id, CaseFile::Investigation, &serde_json::json!({"identifier": "bob"}))
            .expect("update");
        assert_eq!(store.case_status(&id).expect("status"), CaseStatus::Completed);
    }

    #[test]
    fn test_unknown_case() {
        let (_dir, store) = store();
        let id = CaseId::generate();
        assert!(matches!(store.case_status(&id), Err(CaseError::NotFound { .. })));
        assert!(matches!(
            store.update_case(&id, CaseFile::Investigation, &1),
            Err(CaseError::NotFound { .. })
        ));
    }

    #[test]
    fn test_notes_are_stamped() {
        let (_dir, store) = store();
        let id = store
            .create_case("c", "a", CaseScope::default())
            .expect("create case")
            .case_id;

        let mut notes = Map::new();
        notes.insert("summary".to_string(), Value::String("likely same person".to_string()));
        store.save_analyst_notes(&id, notes).expect("save notes");

        let stored = store.load_file(&id, CaseFile::AnalystNotes).expect("load notes");
        assert_eq!(stored["summary"], "likely same person");
        assert!(stored["updated_at"].is_string());
    }

    #[test]
    fn test_evidence_appends_and_recovers() {
        let (_dir, store) = store();
        let id = store
            .create_case("c", "a", CaseScope::default())
            .expect("create case")
            .case_id;

        let first = store
            .add_evidence(
                &id,
                EvidenceInput {
                    platform: Some("GitHub".to_string()),
                    ..EvidenceInput::default()
                },
            )
            .expect("add evidence");
        store.add_evidence(&id, EvidenceInput::default()).expect("add evidence");

        let log = store.load_file(&id, CaseFile::Evidence).expect("load log");
        assert_eq!(log.as_array().map(Vec::len), Some(2));
        assert_eq!(log[0]["evidence_id"], first.evidence_id.as_str());
        assert_eq!(log[0]["type"], "profile");

        fs::write(store.case_dir(&id).join("evidence.json"), "{ not json").expect("corrupt log");
        store.add_evidence(&id, EvidenceInput::default()).expect("add evidence");
        let log = store.load_file(&id, CaseFile::Evidence).expect("load log");
        assert_eq!(log.as_array().map(Vec::len), Some(1));
    }
}
