use async_trait::async_trait;

use crate::preferences::PreferenceKey;
use crate::types::Section;
use crate::Result;

/// A set of writes that a [`KeyValueStore`] commits all together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    entries: Vec<(String, String)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write. A later `put` for the same key wins.
    pub fn put(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl IntoIterator for WriteBatch {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// String keyed local storage medium.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Commit every entry of the batch atomically.
    async fn apply(&self, batch: WriteBatch) -> Result<()>;
}

/// Local snapshot of the section list plus scalar preferences.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether a non-empty section list has ever been saved.
    async fn has_sections_loaded(&self) -> Result<bool>;

    /// Replace the cached sections and mark them as loaded.
    async fn save_sections(&self, sections: &[Section]) -> Result<()>;

    /// Cached sections in saved order; empty when nothing was saved.
    async fn get_saved_sections(&self) -> Result<Vec<Section>>;

    /// Stored preference, or the key's own default.
    async fn get_value_for_key(&self, key: PreferenceKey) -> Result<String>;

    async fn set_value_for_key(&self, key: PreferenceKey, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_batch_last_put_wins() {
        let batch = WriteBatch::new()
            .put("a", "1")
            .put("b", "2")
            .put("a", "3");
        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.entries(),
            &[
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "3".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_batch() {
        assert!(WriteBatch::new().is_empty());
    }
}
