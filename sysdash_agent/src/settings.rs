//! Injected key-value settings store with change notifications.
//! In-memory only; nothing survives a restart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;

pub const PROFILE_KEY: &str = "profile";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Admin User".into(),
            email: "admin@example.com".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingChange {
    pub key: String,
    pub value: Value,
}

pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    /// Store `value` and notify subscribers.
    fn set(&self, key: &str, value: Value);
    fn subscribe(&self) -> broadcast::Receiver<SettingChange>;
}

pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, Value>>,
    changes: broadcast::Sender<SettingChange>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            values: RwLock::new(HashMap::new()),
            changes,
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        {
            let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
            values.insert(key.to_string(), value.clone());
        }
        // No subscribers is fine.
        let _ = self.changes.send(SettingChange {
            key: key.to_string(),
            value,
        });
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingChange> {
        self.changes.subscribe()
    }
}

/// Stored profile, or the default when unset or unreadable.
pub fn load_profile(store: &dyn SettingsStore) -> Profile {
    store
        .get(PROFILE_KEY)
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

pub fn save_profile(store: &dyn SettingsStore, profile: &Profile) {
    if let Ok(v) = serde_json::to_value(profile) {
        store.set(PROFILE_KEY, v);
    }
}
