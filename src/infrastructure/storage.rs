//! On-disk cache buckets.
//!
//! Each bucket is a directory under the storage root holding an
//! `index.json` that maps request paths to body files in the same directory.

use super::errors::{CacheError, CacheResult};
use super::network::CachedResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    file: String,
    status: u16,
    content_type: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BucketIndex {
    entries: BTreeMap<String, IndexEntry>,
}

/// A directory of named cache buckets.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all existing buckets, sorted.
    pub fn keys(&self) -> CacheResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn has(&self, name: &str) -> bool {
        Self::validate_name(name).is_ok() && self.root.join(name).is_dir()
    }

    /// Opens the bucket called `name`, creating it if it does not exist yet.
    pub fn open(&self, name: &str) -> CacheResult<CacheBucket> {
        Self::validate_name(name)?;
        let dir = self.root.join(name);
        fs::create_dir_all(&dir)?;

        let index_path = dir.join(INDEX_FILE);
        let index = if index_path.exists() {
            serde_json::from_str(&fs::read_to_string(&index_path)?)?
        } else {
            BucketIndex::default()
        };

        Ok(CacheBucket {
            name: name.to_string(),
            dir,
            index,
        })
    }

    /// Removes the bucket and everything in it. Returns whether it existed.
    pub fn delete(&self, name: &str) -> CacheResult<bool> {
        Self::validate_name(name)?;
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(dir)?;
        Ok(true)
    }

    fn validate_name(name: &str) -> CacheResult<()> {
        let ok = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if ok {
            Ok(())
        } else {
            Err(CacheError::InvalidBucketName(name.to_string()))
        }
    }
}

/// One open bucket. Writes go straight to disk.
#[derive(Debug)]
pub struct CacheBucket {
    name: String,
    dir: PathBuf,
    index: BucketIndex,
}

impl CacheBucket {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.index.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.entries.contains_key(path)
    }

    /// Stores `response` under `path`, replacing any previous entry.
    pub fn put(&mut self, path: &str, response: &CachedResponse) -> CacheResult<()> {
        let file = match self.index.entries.get(path) {
            Some(existing) => existing.file.clone(),
            None => format!("{:04}.body", self.index.entries.len()),
        };

        fs::write(self.dir.join(&file), &response.body)?;
        self.index.entries.insert(
            path.to_string(),
            IndexEntry {
                file,
                status: response.status,
                content_type: response.content_type.clone(),
            },
        );
        self.save_index()
    }

    /// Looks up a stored response by exact request path.
    pub fn match_path(&self, path: &str) -> CacheResult<Option<CachedResponse>> {
        let Some(entry) = self.index.entries.get(path) else {
            return Ok(None);
        };

        let body = fs::read(self.dir.join(&entry.file)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CacheError::MissingEntry {
                    bucket: self.name.clone(),
                    path: path.to_string(),
                }
            } else {
                CacheError::Storage(e)
            }
        })?;

        Ok(Some(CachedResponse {
            status: entry.status,
            content_type: entry.content_type.clone(),
            body,
        }))
    }

    fn save_index(&self) -> CacheResult<()> {
        let json = serde_json::to_string_pretty(&self.index)?;
        fs::write(self.dir.join(INDEX_FILE), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_on_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().join("nothing-here"));
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_open_creates_and_lists_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path());

        storage.open("app-v2").unwrap();
        storage.open("app-v1").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["app-v1", "app-v2"]);
        assert!(storage.has("app-v1"));
        assert!(!storage.has("app-v3"));
    }

    #[test]
    fn test_put_and_match_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path());

        let mut bucket = storage.open("app-v1").unwrap();
        bucket
            .put("/index.html", &CachedResponse::ok("text/html", "<h1>hi</h1>"))
            .unwrap();
        bucket
            .put("/manifest.json", &CachedResponse::ok("application/json", "{}"))
            .unwrap();
        assert_eq!(bucket.len(), 2);

        let reopened = storage.open("app-v1").unwrap();
        let hit = reopened.match_path("/index.html").unwrap().unwrap();
        assert_eq!(hit.body, b"<h1>hi</h1>");
        assert_eq!(hit.content_type.as_deref(), Some("text/html"));
        assert!(reopened.match_path("/missing").unwrap().is_none());
        assert_eq!(
            reopened.paths().collect::<Vec<_>>(),
            vec!["/index.html", "/manifest.json"]
        );
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path());
        let mut bucket = storage.open("b").unwrap();

        bucket.put("/", &CachedResponse::ok("text/html", "old")).unwrap();
        bucket.put("/", &CachedResponse::ok("text/html", "new")).unwrap();

        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.match_path("/").unwrap().unwrap().body, b"new");
    }

    #[test]
    fn test_delete_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path());
        storage.open("old").unwrap();

        assert!(storage.delete("old").unwrap());
        assert!(!storage.delete("old").unwrap());
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path());

        for name in ["", ".", "..", "a/b", "..\\x"] {
            assert!(matches!(
                storage.open(name),
                Err(CacheError::InvalidBucketName(_))
            ));
        }
    }
}
