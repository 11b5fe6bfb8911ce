//! Read-only scenario stores.
//!
//! Persistence belongs to the host application. The orchestrator only needs
//! [`ScenarioStore::list_all`], which must return an owned copy so that
//! later mutation of the store cannot reach an in-flight match.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::record::{ScenarioId, ScenarioRecord};

/// Source of scenario snapshots.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Return every scenario, in store order, as an owned snapshot.
    async fn list_all(&self) -> Result<Vec<ScenarioRecord>>;
}

/// Scenarios held in memory. Mutations never affect snapshots already taken.
#[derive(Debug, Default)]
pub struct InMemoryScenarioStore {
    records: RwLock<Vec<ScenarioRecord>>,
}

impl InMemoryScenarioStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `records`.
    pub fn with_records(records: Vec<ScenarioRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Append a scenario.
    pub async fn insert(&self, record: ScenarioRecord) {
        debug!("Added scenario: {}", record.label);
        self.records.write().await.push(record);
    }

    /// Remove a scenario by ID.
    pub async fn remove(&self, id: ScenarioId) -> Option<ScenarioRecord> {
        let mut records = self.records.write().await;
        let position = records.iter().position(|r| r.id == id)?;
        Some(records.remove(position))
    }

    /// Replace the whole scenario set.
    pub async fn replace_all(&self, records: Vec<ScenarioRecord>) {
        let count = records.len();
        *self.records.write().await = records;
        info!("Replaced scenario set with {count} scenarios");
    }

    /// Number of stored scenarios.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ScenarioStore for InMemoryScenarioStore {
    async fn list_all(&self) -> Result<Vec<ScenarioRecord>> {
        Ok(self.records.read().await.clone())
    }
}

/// Scenarios stored as a JSON array in a file, re-read on every snapshot so
/// edits made by other tools show up on the next pass.
#[derive(Debug, Clone)]
pub struct FileScenarioStore {
    path: PathBuf,
}

impl FileScenarioStore {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `records` to `path`, creating parent directories.
    pub async fn write_all(path: impl AsRef<Path>, records: &[ScenarioRecord]) -> Result<()> {
        let path = path.as_ref();
        validate_dimensions(records)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(records)?;
        fs::write(path, content).await?;
        info!("Saved {} scenarios to {}", records.len(), path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Vec<ScenarioRecord>> {
        let content = fs::read_to_string(&self.path).await?;
        let records: Vec<ScenarioRecord> = serde_json::from_str(&content)?;
        validate_dimensions(&records)?;
        debug!(
            "Loaded {} scenarios from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

#[async_trait]
impl ScenarioStore for FileScenarioStore {
    async fn list_all(&self) -> Result<Vec<ScenarioRecord>> {
        self.load().await.map_err(|e| match e {
            StoreError::DimensionMismatch { .. } => e,
            other => StoreError::Unavailable(format!("{}: {other}", self.path.display())),
        })
    }
}

/// All records must share the first record's dimension.
fn validate_dimensions(records: &[ScenarioRecord]) -> Result<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    let expected = first.dimension();

    match records.iter().find(|r| r.dimension() != expected) {
        Some(bad) => Err(StoreError::DimensionMismatch {
            label: bad.label.clone(),
            expected,
            actual: bad.dimension(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_snapshot_is_isolated_from_later_mutation() {
        let store = InMemoryScenarioStore::with_records(vec![ScenarioRecord::new(
            "Greeting",
            "Hello!",
            vec![1.0, 0.0],
        )]);

        let snapshot = store.list_all().await.unwrap();
        store
            .insert(ScenarioRecord::new("Medical", "I am deaf.", vec![0.0, 1.0]))
            .await;
        store.replace_all(Vec::new()).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].label, "Greeting");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let record = ScenarioRecord::new("Emergency", "Call an ambulance.", vec![1.0]);
        let id = record.id;
        let store = InMemoryScenarioStore::new();
        store.insert(record).await;

        assert_eq!(store.remove(id).await.map(|r| r.label), Some("Emergency".to_string()));
        assert!(store.remove(id).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_file_store_reads_written_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/scenarios.json");
        let records = vec![
            ScenarioRecord::new("Coffee Shop", "A latte, please.", vec![1.0, 0.0]),
            ScenarioRecord::new("Greeting", "Hello!", vec![0.0, 1.0]),
        ];

        FileScenarioStore::write_all(&path, &records).await.unwrap();
        let store = FileScenarioStore::new(&path);

        assert_eq!(store.list_all().await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileScenarioStore::new(temp_dir.path().join("missing.json"));

        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scenarios.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileScenarioStore::new(&path).list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_mixed_dimensions_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scenarios.json");
        let records = vec![
            ScenarioRecord::new("A", "", vec![1.0, 0.0]),
            ScenarioRecord::new("B", "", vec![1.0, 0.0, 0.0]),
        ];

        let err = FileScenarioStore::write_all(&path, &records).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch {
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }
}
