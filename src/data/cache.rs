use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::LoadError;
use super::loader::load_file;
use super::model::SongTable;

/// Memoized dataset loader keyed by file identity (canonical path).
///
/// A table is read once and then handed out as the same `Arc` for as long
/// as the cache lives.  Failed loads are not remembered.
#[derive(Debug, Default)]
pub struct DatasetCache {
    tables: HashMap<PathBuf, Arc<SongTable>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<SongTable>, LoadError> {
        let key = Self::key(path);
        if let Some(table) = self.tables.get(&key) {
            log::debug!("Dataset cache hit for {}", key.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(path)?);
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Forget a cached table so the next `get_or_load` re-reads the file.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.tables.remove(&Self::key(path)).is_some()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const CSV: &str = "artist(s)_name,released_year,released_month,streams,danceability_%,\
energy_%,bpm,in_spotify_playlists,in_apple_playlists,in_deezer_playlists\n\
A,2020,1,100,50,60,120,1,1,1\n";

    #[test]
    fn same_path_yields_same_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("songs.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();
        // A non-canonical spelling of the same file shares the entry.
        let dotted = dir.path().join(".").join("songs.csv");
        let second = cache.get_or_load(&dotted).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("songs.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();
        assert!(cache.invalidate(&path));
        let second = cache.get_or_load(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.tracks, second.tracks);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.csv");

        let mut cache = DatasetCache::new();
        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_empty());

        std::fs::write(&path, CSV).unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);
    }
}
