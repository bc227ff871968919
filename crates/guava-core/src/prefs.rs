//! Local preference store.
//!
//! The whole [`Preferences`] document lives under one storage key and is
//! rewritten on every change. There is no versioning; the last writer wins.

use crate::models::{NotificationSettings, Preferences};
use crate::storage::{KeyValueStore, StorageResult, PREFERENCES_KEY};

#[derive(Debug, Clone)]
pub struct PreferenceStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load preferences, treating a missing or unreadable blob as defaults.
    pub fn load(&self) -> StorageResult<Preferences> {
        let Some(raw) = self.store.get(PREFERENCES_KEY)? else {
            return Ok(Preferences::default());
        };
        match serde_json::from_str(&raw) {
            Ok(prefs) => Ok(prefs),
            Err(error) => {
                tracing::warn!("Ignoring unreadable preferences blob: {}", error);
                Ok(Preferences::default())
            }
        }
    }

    pub fn save(&self, prefs: &Preferences) -> StorageResult<()> {
        self.store.set_json(PREFERENCES_KEY, prefs)
    }

    /// Read-modify-write helper.
    pub fn update<T>(&self, apply: impl FnOnce(&mut Preferences) -> T) -> StorageResult<T> {
        let mut prefs = self.load()?;
        let result = apply(&mut prefs);
        self.save(&prefs)?;
        Ok(result)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(PREFERENCES_KEY)
    }

    pub fn favorites(&self) -> StorageResult<Vec<String>> {
        Ok(self.load()?.favorites)
    }

    /// Returns `true` when the id was not already a favorite.
    pub fn add_favorite(&self, service_id: &str) -> StorageResult<bool> {
        let service_id = service_id.trim();
        self.update(|prefs| {
            if prefs.is_favorite(service_id) {
                false
            } else {
                prefs.favorites.push(service_id.to_string());
                true
            }
        })
    }

    /// Returns `true` when the id was a favorite.
    pub fn remove_favorite(&self, service_id: &str) -> StorageResult<bool> {
        let service_id = service_id.trim();
        self.update(|prefs| {
            let before = prefs.favorites.len();
            prefs.favorites.retain(|id| id != service_id);
            prefs.favorites.len() != before
        })
    }

    /// Flip favorite state; returns the new state.
    pub fn toggle_favorite(&self, service_id: &str) -> StorageResult<bool> {
        if self.remove_favorite(service_id)? {
            Ok(false)
        } else {
            self.add_favorite(service_id)
        }
    }

    pub fn note(&self, service_id: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.notes.remove(service_id.trim()))
    }

    /// Store a note verbatim; empty text removes it.
    pub fn set_note(&self, service_id: &str, text: &str) -> StorageResult<()> {
        let service_id = service_id.trim().to_string();
        self.update(|prefs| {
            if text.is_empty() {
                prefs.notes.remove(&service_id);
            } else {
                prefs.notes.insert(service_id, text.to_string());
            }
        })
    }

    pub fn set_notifications(&self, notifications: NotificationSettings) -> StorageResult<()> {
        self.update(|prefs| prefs.notifications = notifications)
    }

    pub fn set_telecom(&self, telecom_id: Option<&str>) -> StorageResult<()> {
        let telecom_id = telecom_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        self.update(|prefs| prefs.telecom_id = telecom_id)
    }

    /// Replace the card selection, dropping blanks and duplicates.
    pub fn set_cards(&self, card_ids: &[String]) -> StorageResult<()> {
        let mut unique: Vec<String> = Vec::with_capacity(card_ids.len());
        for id in card_ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            if !unique.iter().any(|existing| existing == id) {
                unique.push(id.to_string());
            }
        }
        self.update(|prefs| prefs.card_ids = unique)
    }
}
