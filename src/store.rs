//! Keyed persistence for artifact records.
//!
//! The codec only needs `put` and `get`; where the bytes live is up to the
//! backend. A key that was never stored is `NotFound`, which callers can
//! tell apart from a record that exists but fails to parse.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::metadata::ArtifactRecord;

/// Longest key whose temp file name (`.<key>.nen.tmp`) fits a 255-byte file name.
pub const MAX_KEY_LEN: usize = 240;
const RECORD_EXTENSION: &str = "nen";

pub trait ArtifactStore {
    /// Stores `record` under `key`, replacing any previous record.
    fn put(&mut self, key: &str, record: &ArtifactRecord) -> Result<()>;

    /// Fetches the record under `key`, or `NotFound`.
    fn get(&self, key: &str) -> Result<ArtifactRecord>;

    fn contains(&self, key: &str) -> Result<bool>;

    /// Removes the record under `key`, or `NotFound`.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Stored keys in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Rejects keys that are empty, too long, start with a dot, or could
/// escape a directory. Dot-prefixed names are reserved for temp files.
pub fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.len() > MAX_KEY_LEN
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0']);
    if bad {
        return Err(HuffmanError::InvalidKey { key: key.to_string() });
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, ArtifactRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ArtifactStore for MemoryStore {
    fn put(&mut self, key: &str, record: &ArtifactRecord) -> Result<()> {
        validate_key(key)?;
        self.records.insert(key.to_string(), record.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<ArtifactRecord> {
        validate_key(key)?;
        self.records.get(key)
            .cloned()
            .ok_or_else(|| HuffmanError::not_found(key))
    }

    fn contains(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.records.contains_key(key))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.records.remove(key)
            .map(|_| ())
            .ok_or_else(|| HuffmanError::not_found(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.records.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// One file per key: `<root>/<key>.nen`.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Opens `root`, creating it if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(DirStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, RECORD_EXTENSION))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{}.{}.tmp", key, RECORD_EXTENSION))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f = fs::File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

impl ArtifactStore for DirStore {
    fn put(&mut self, key: &str, record: &ArtifactRecord) -> Result<()> {
        validate_key(key)?;
        let path = self.record_path(key);
        let tmp = self.temp_path(key);

        let bytes = record.to_bytes()?;
        let written = write_synced(&tmp, &bytes).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            // best effort; the original error is what matters
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(key, path = %path.display(), bytes = bytes.len(), "stored artifact record");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<ArtifactRecord> {
        validate_key(key)?;
        let bytes = match fs::read(self.record_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(HuffmanError::not_found(key));
            }
            Err(e) => return Err(e.into()),
        };
        ArtifactRecord::from_bytes(&bytes)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.record_path(key).is_file())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(HuffmanError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let suffix = format!(".{}", RECORD_EXTENSION);
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(key) = name.strip_suffix(&suffix) {
                if validate_key(key).is_ok() {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
