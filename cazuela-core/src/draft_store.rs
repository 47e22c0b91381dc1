//! Durable storage for not-yet-submitted drafts, keyed per user alias.
//!
//! The store holds whole collections: callers read the full list, mutate,
//! and write the full list back. To avoid lost updates across async gaps,
//! always re-read immediately before mutating rather than reusing an
//! in-memory copy.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::DraftStoreError;
use crate::types::StoredDraft;

/// Key-value storage of draft collections, one list per user alias.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Get all stored drafts for a user. A user with no drafts yields an
    /// empty list, not an error.
    async fn get(&self, user: &str) -> Result<Vec<StoredDraft>, DraftStoreError>;

    /// Replace the stored draft list for a user.
    async fn set(&self, user: &str, drafts: Vec<StoredDraft>) -> Result<(), DraftStoreError>;
}

/// In-memory store, used in tests and as the ephemeral fallback.
#[derive(Default)]
pub struct MemoryDraftStore {
    collections: Mutex<HashMap<String, Vec<StoredDraft>>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn get(&self, user: &str) -> Result<Vec<StoredDraft>, DraftStoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, user: &str, drafts: Vec<StoredDraft>) -> Result<(), DraftStoreError> {
        self.collections
            .lock()
            .unwrap()
            .insert(user.to_string(), drafts);
        Ok(())
    }
}

/// File-backed store: one JSON document per user under a base directory.
pub struct FileDraftStore {
    base_dir: PathBuf,
}

impl FileDraftStore {
    /// Create a store rooted at the given directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the default store directory: ~/.cazuela/drafts
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".cazuela").join("drafts"))
            .unwrap_or_else(|| PathBuf::from("data/drafts"))
    }

    fn user_path(&self, user: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", slugify_user(user)))
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn get(&self, user: &str) -> Result<Vec<StoredDraft>, DraftStoreError> {
        let path = self.user_path(user);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)?;
        let drafts: Vec<StoredDraft> = serde_json::from_str(&contents)
            .map_err(|e| DraftStoreError::Malformed(format!("{}: {}", path.display(), e)))?;
        Ok(drafts)
    }

    async fn set(&self, user: &str, drafts: Vec<StoredDraft>) -> Result<(), DraftStoreError> {
        fs::create_dir_all(&self.base_dir)?;
        let path = self.user_path(user);

        let json = serde_json::to_string_pretty(&drafts)
            .map_err(|e| DraftStoreError::Malformed(e.to_string()))?;
        fs::write(&path, json)?;
        tracing::debug!(user, count = drafts.len(), path = %path.display(), "draft collection written");
        Ok(())
    }
}

/// Convert a user alias to a filesystem-safe file stem.
fn slugify_user(user: &str) -> String {
    user.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(100)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecipeDraft, StoredDraft};

    fn draft(title: &str) -> StoredDraft {
        StoredDraft::new(RecipeDraft {
            title: title.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn memory_store_is_empty_for_unknown_user() {
        let store = MemoryDraftStore::new();
        assert!(store.get("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_store_keys_by_user() {
        let store = MemoryDraftStore::new();
        store.set("ana", vec![draft("Flan")]).await.unwrap();
        store.set("ben", vec![draft("Stew")]).await.unwrap();

        assert_eq!(store.get("ana").await.unwrap()[0].draft.title, "Flan");
        assert_eq!(store.get("ben").await.unwrap()[0].draft.title, "Stew");
    }

    #[tokio::test]
    async fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        let stored = draft("Pizza Carbonara");
        store.set("chefpao", vec![stored.clone()]).await.unwrap();

        let loaded = store.get("chefpao").await.unwrap();
        assert_eq!(loaded, vec![stored]);
    }

    #[tokio::test]
    async fn file_store_rejects_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("chefpao.json"), "not json").unwrap();

        assert!(matches!(
            store.get("chefpao").await,
            Err(DraftStoreError::Malformed(_))
        ));
    }

    #[test]
    fn slugify_keeps_aliases_apart_on_disk() {
        assert_eq!(slugify_user("chefpao"), "chefpao");
        assert_eq!(slugify_user("chef/pao"), "chef_pao");
    }
}
