//! Load-once catalog memoization keyed by path.

use crate::catalog::loader::{self, LoadOptions};
use crate::catalog::models::Catalog;
use crate::error::CatalogError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

struct Entry {
    catalog: Arc<Catalog>,
    modified: Option<SystemTime>,
}

/// Owns loaded catalogs for the lifetime of the application.
///
/// A second `get` for the same path hands back the same `Arc` without
/// re-reading the file. Catalogs are only re-read after `invalidate` or
/// when `refresh` sees a newer modification time.
pub struct CatalogStore {
    options: LoadOptions,
    entries: HashMap<PathBuf, Entry>,
}

impl CatalogStore {
    /// Creates an empty store that loads with the given options.
    pub fn new(options: LoadOptions) -> Self {
        Self { options, entries: HashMap::new() }
    }

    /// Returns the cached catalog for `path`, loading it on first use.
    pub fn get(&mut self, path: &Path) -> Result<Arc<Catalog>, CatalogError> {
        let key = cache_key(path);
        if let Some(entry) = self.entries.get(&key) {
            debug!("Catalog cache hit: {}", key.display());
            return Ok(Arc::clone(&entry.catalog));
        }

        let catalog = Arc::new(loader::load(path, &self.options)?);
        self.entries.insert(
            key,
            Entry { catalog: Arc::clone(&catalog), modified: modified_time(path) },
        );
        Ok(catalog)
    }

    /// Drops the cached catalog for `path`. Returns true if one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&cache_key(path)).is_some()
    }

    /// Reloads `path` if the file changed since it was cached.
    ///
    /// On a failed reload the previous catalog stays cached.
    pub fn refresh(&mut self, path: &Path) -> Result<Arc<Catalog>, CatalogError> {
        let key = cache_key(path);
        let changed = match self.entries.get(&key) {
            Some(entry) => {
                let current = modified_time(path);
                current.is_none() || entry.modified.is_none() || current > entry.modified
            }
            None => true,
        };

        if !changed {
            return self.get(path);
        }

        let catalog = Arc::new(loader::load(path, &self.options)?);
        info!("Reloaded catalog {}", path.display());
        self.entries.insert(
            key,
            Entry { catalog: Arc::clone(&catalog), modified: modified_time(path) },
        );
        Ok(catalog)
    }

    /// Returns true if `path` is cached.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&cache_key(path))
    }

    /// Load options used for every catalog in this store.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
