//! Per-user local copy of the last fetched expense list.
//!
//! The cache is advisory: it seeds the list before the first fetch and is
//! overwritten by every successful one. It is never merged with server data.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use api_types::expense::Expense;
use serde::{Deserialize, Serialize};

use crate::CacheError;

/// Key under which a user's list is stored.
pub fn cache_key(user_id: &str) -> String {
    format!("expenses_{user_id}")
}

pub trait ExpenseCache {
    /// Returns the cached list for `user_id`, if one was stored.
    fn load(&self, user_id: &str) -> Result<Option<Vec<Expense>>, CacheError>;

    /// Replaces the cached list for `user_id`.
    fn store(&mut self, user_id: &str, expenses: &[Expense]) -> Result<(), CacheError>;
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Vec<Expense>>,
}

impl ExpenseCache for MemoryCache {
    fn load(&self, user_id: &str) -> Result<Option<Vec<Expense>>, CacheError> {
        Ok(self.entries.get(&cache_key(user_id)).cloned())
    }

    fn store(&mut self, user_id: &str, expenses: &[Expense]) -> Result<(), CacheError> {
        self.entries.insert(cache_key(user_id), expenses.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    entries: BTreeMap<String, Vec<Expense>>,
}

/// JSON file holding every user's entry, created on first write.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<CacheFile, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CacheFile::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }
}

impl ExpenseCache for FileCache {
    fn load(&self, user_id: &str) -> Result<Option<Vec<Expense>>, CacheError> {
        Ok(self.read()?.entries.remove(&cache_key(user_id)))
    }

    fn store(&mut self, user_id: &str, expenses: &[Expense]) -> Result<(), CacheError> {
        let mut file = match self.read() {
            Ok(file) => file,
            Err(CacheError::Json(err)) => {
                tracing::warn!(
                    "replacing corrupt expense cache {}: {err}",
                    self.path.display()
                );
                CacheFile::default()
            }
            Err(err) => return Err(err),
        };
        file.entries.insert(cache_key(user_id), expenses.to_vec());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}
