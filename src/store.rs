// Persisted key-value entries backing the session. The file store keeps
// a small JSON object on disk; the memory store is used by tests and by
// anything that should not outlive the process.

use crate::error::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Entries the client persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Phone,
    Code,
    Token,
}

impl Key {
    pub fn as_str(self) -> &'static str {
        match self {
            Key::Phone => "phone",
            Key::Code => "code",
            Key::Token => "token",
        }
    }
}

/// Synchronous key-value storage for session entries.
pub trait SessionStore {
    fn get(&self, key: Key) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: Key, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: Key) -> Result<(), StoreError>;
    /// Drop every entry and store exactly `entries`, in one write.
    fn replace(&mut self, entries: &[(Key, &str)]) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<Key, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: Key) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set(&mut self, key: Key, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: Key) -> Result<(), StoreError> {
        self.entries.remove(&key);
        Ok(())
    }

    fn replace(&mut self, entries: &[(Key, &str)]) -> Result<(), StoreError> {
        self.entries = entries.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Ok(())
    }
}

/// Session entries stored as a JSON object in a single file. The file is
/// read on every access so it stays the source of truth across runs.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// `~/.referral_session.json`, or the current directory when no home
    /// directory is known.
    pub fn default_path() -> PathBuf {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.join(".referral_session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let data = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&tmp).map_err(io_err)?;
            file.write_all(&data).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: Key) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key.as_str()))
    }

    fn set(&mut self, key: Key, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: Key) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        if entries.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }

    fn replace(&mut self, entries: &[(Key, &str)]) -> Result<(), StoreError> {
        let map: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_string()))
            .collect();
        self.save(&map)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}
