use async_trait::async_trait;
use nf_core::{CacheStore, Error, KeyValueStore, PreferenceKey, Result, Section, WriteBatch};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod backends;

pub use backends::*;

pub const SECTIONS_LOADED_KEY: &str = "sections_loaded";
pub const SECTIONS_JSON_KEY: &str = "sections_json";

pub const DEFAULT_CACHE_PATH: &str = "newsfeed_cache.json";
pub const DEFAULT_SQLITE_PATH: &str = "newsfeed_cache.db";

/// [`CacheStore`] layered over any string key-value medium.
///
/// Sections are kept as one JSON array under [`SECTIONS_JSON_KEY`]; the loaded
/// flag lives under [`SECTIONS_LOADED_KEY`] and is written in the same batch.
pub struct PreferenceCache<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: KeyValueStore> CacheStore for PreferenceCache<S> {
    async fn has_sections_loaded(&self) -> Result<bool> {
        Ok(self
            .store
            .get(SECTIONS_LOADED_KEY)
            .await?
            .map(|flag| flag == "true")
            .unwrap_or(false))
    }

    async fn save_sections(&self, sections: &[Section]) -> Result<()> {
        if sections.is_empty() {
            tracing::debug!("Not caching an empty section list");
            return Ok(());
        }

        let json = serde_json::to_string(sections)?;
        let batch = WriteBatch::new()
            .put(SECTIONS_JSON_KEY, json)
            .put(SECTIONS_LOADED_KEY, "true");
        self.store.apply(batch).await?;
        tracing::debug!("Cached {} sections", sections.len());
        Ok(())
    }

    async fn get_saved_sections(&self) -> Result<Vec<Section>> {
        match self.store.get(SECTIONS_JSON_KEY).await? {
            None => Ok(Vec::new()),
            Some(json) if json.trim().is_empty() => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| Error::Storage(format!("Cached sections are unreadable: {}", e))),
        }
    }

    async fn get_value_for_key(&self, key: PreferenceKey) -> Result<String> {
        Ok(self
            .store
            .get(key.as_str())
            .await?
            .unwrap_or_else(|| key.default_value().to_string()))
    }

    async fn set_value_for_key(&self, key: PreferenceKey, value: &str) -> Result<()> {
        self.store
            .apply(WriteBatch::new().put(key.as_str(), value))
            .await
    }
}

/// Open a cache on the named backend: `memory`, `file`, or `sqlite`
/// (the latter needs the `sqlite` feature).
pub async fn create_cache(backend: &str, path: Option<&Path>) -> Result<Arc<dyn CacheStore>> {
    match backend {
        "memory" => Ok(Arc::new(PreferenceCache::new(InMemoryStore::new()))),
        "file" => {
            let path = path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH));
            Ok(Arc::new(PreferenceCache::new(JsonFileStore::new(path))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH));
            let store = SqliteStore::new_with_path(&path).await?;
            Ok(Arc::new(PreferenceCache::new(store)))
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err(Error::Config(
            "SQLite cache support not compiled in. Rebuild with --features sqlite".to_string(),
        )),
        other => Err(Error::Config(format!(
            "Unknown cache backend '{}'. Available: memory, file, sqlite",
            other
        ))),
    }
}
