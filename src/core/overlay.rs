//! Client-local "saved" and "seen" bookkeeping.
//!
//! Both sets live in the visitor's own key/value storage and are never sent
//! to the server. They only change what the listing shows.

use crate::models::Profile;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub const SAVED_PROFILES_KEY: &str = "savedProfiles";
pub const SEEN_PROFILES_KEY: &str = "seenProfiles";

/// Errors that can occur when persisting an overlay
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// String key/value storage, in the shape of the browser's `localStorage`
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String) -> Result<(), OverlayError>;
}

impl<T: LocalStorage + ?Sized> LocalStorage for &T {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), OverlayError> {
        (**self).set_item(key, value)
    }
}

impl<T: LocalStorage + ?Sized> LocalStorage for Arc<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), OverlayError> {
        (**self).set_item(key, value)
    }
}

/// In-process storage, optionally capped like a browser's storage quota
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes once keys and values exceed `max_bytes`
    pub fn with_quota(max_bytes: usize) -> Self {
        Self {
            items: Mutex::default(),
            quota: Some(max_bytes),
        }
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), OverlayError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(quota) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                return Err(OverlayError::Storage(format!(
                    "quota of {} bytes exceeded writing {}",
                    quota, key
                )));
            }
        }

        items.insert(key.to_string(), value);
        Ok(())
    }
}

/// Read a JSON array from storage; missing or corrupt entries load as empty
fn load_array<T, S>(storage: &S, key: &str) -> Vec<T>
where
    T: for<'de> serde::Deserialize<'de>,
    S: LocalStorage,
{
    let Some(stored) = storage.get_item(key) else {
        return Vec::new();
    };

    match serde_json::from_str(&stored) {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Error parsing {} from local storage: {}", key, e);
            Vec::new()
        }
    }
}

/// Bookmarked profiles, kept as full snapshots so they render offline
pub struct SavedProfiles<S: LocalStorage> {
    storage: S,
    profiles: Vec<Profile>,
}

impl<S: LocalStorage> SavedProfiles<S> {
    pub fn load(storage: S) -> Self {
        let profiles = load_array(&storage, SAVED_PROFILES_KEY);
        Self { storage, profiles }
    }

    /// Add a snapshot unless a profile with the same id is already saved
    pub fn save(&mut self, profile: Profile) -> Result<bool, OverlayError> {
        if self.is_saved(profile.id) {
            return Ok(false);
        }
        self.profiles.push(profile);
        if let Err(e) = self.persist() {
            self.profiles.pop();
            return Err(e);
        }
        Ok(true)
    }

    pub fn remove(&mut self, profile_id: i64) -> Result<(), OverlayError> {
        self.profiles.retain(|p| p.id != profile_id);
        self.persist()
    }

    pub fn is_saved(&self, profile_id: i64) -> bool {
        self.profiles.iter().any(|p| p.id == profile_id)
    }

    /// Saved profiles in the order they were saved
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn persist(&self) -> Result<(), OverlayError> {
        let json = serde_json::to_string(&self.profiles)?;
        self.storage.set_item(SAVED_PROFILES_KEY, json)
    }
}

/// Ids of profiles the visitor has already opened
pub struct SeenProfiles<S: LocalStorage> {
    storage: S,
    ids: Vec<String>,
}

impl<S: LocalStorage> SeenProfiles<S> {
    pub fn load(storage: S) -> Self {
        let ids = load_array(&storage, SEEN_PROFILES_KEY);
        Self { storage, ids }
    }

    /// Returns false if the id was already marked
    pub fn mark_seen(&mut self, profile_id: &str) -> Result<bool, OverlayError> {
        if self.has(profile_id) {
            return Ok(false);
        }
        self.ids.push(profile_id.to_string());
        if let Err(e) = self.persist() {
            self.ids.pop();
            return Err(e);
        }
        Ok(true)
    }

    pub fn mark_unseen(&mut self, profile_id: &str) -> Result<(), OverlayError> {
        self.ids.retain(|id| id != profile_id);
        self.persist()
    }

    pub fn has(&self, profile_id: &str) -> bool {
        self.ids.iter().any(|id| id == profile_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) -> Result<(), OverlayError> {
        let json = serde_json::to_string(&self.ids)?;
        self.storage.set_item(SEEN_PROFILES_KEY, json)
    }
}

/// Listing view selected by the `seen` URL parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeenFilter {
    #[default]
    All,
    Seen,
    Unseen,
}

impl SeenFilter {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("seen") => SeenFilter::Seen,
            Some("unseen") => SeenFilter::Unseen,
            _ => SeenFilter::All,
        }
    }
}

/// Narrow a listing by seen state; ids are compared in their decimal form
pub fn apply_seen_filter<S: LocalStorage>(
    profiles: Vec<Profile>,
    seen: &SeenProfiles<S>,
    filter: SeenFilter,
) -> Vec<Profile> {
    match filter {
        SeenFilter::All => profiles,
        SeenFilter::Seen => profiles
            .into_iter()
            .filter(|p| seen.has(&p.id.to_string()))
            .collect(),
        SeenFilter::Unseen => profiles
            .into_iter()
            .filter(|p| !seen.has(&p.id.to_string()))
            .collect(),
    }
}
