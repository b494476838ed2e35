use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::domain::dataset::Dataset;
use crate::domain::errors::DomainError;
use crate::domain::ports::RentalRepository;

/// Single-blob store: the whole dataset lives in memory and every commit
/// rewrites one JSON file synchronously. A missing file starts empty; a
/// corrupt one is an error rather than a silent reset.
pub struct JsonStore {
    path: Option<PathBuf>,
    data: RwLock<Dataset>,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                DomainError::Internal(format!("corrupt data file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Dataset::default(),
            Err(e) => {
                return Err(DomainError::Internal(format!(
                    "cannot read data file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(JsonStore {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Store with no file behind it; commits stay in memory. Used by tests.
    pub fn in_memory() -> Self {
        Self::in_memory_with(Dataset::default())
    }

    pub fn in_memory_with(data: Dataset) -> Self {
        JsonStore {
            path: None,
            data: RwLock::new(data),
        }
    }
}

impl RentalRepository for JsonStore {
    fn load(&self) -> Result<Dataset, DomainError> {
        Ok(self.data.read().clone())
    }

    fn save(&self, data: &Dataset) -> Result<(), DomainError> {
        let mut guard = self.data.write();
        if let Some(path) = &self.path {
            let text = serde_json::to_string_pretty(data)
                .map_err(|e| DomainError::Internal(format!("cannot serialize dataset: {}", e)))?;
            fs::write(path, text).map_err(|e| {
                DomainError::Internal(format!(
                    "cannot write data file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }
        *guard = data.clone();
        Ok(())
    }
}
