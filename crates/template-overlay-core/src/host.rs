//! Host abstraction.
//!
//! The editor host is an external collaborator. The overlay only needs three
//! capabilities from it, each behind its own trait so tests can fake them:
//!
//! - [`SettingsStore`]: key-value settings (`list`, `autoActivate`)
//! - [`Prompter`]: quick picks, confirmations and error notifications
//! - [`Decorator`]: painting and clearing the template decoration
//!
//! Every method that talks to the user or to storage is async: those are the
//! points where the overlay may be suspended while other events run.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::SettingsError;
use crate::types::DecorationUpdate;

/// Key-value settings persisted by the host.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting; `None` when unset.
    fn get(&self, key: &str) -> Option<Value>;

    /// Persist a setting. Resolves once the host has accepted the write.
    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// User interaction provided by the host.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Let the user pick one of `options`; `None` when dismissed.
    async fn pick(&self, options: Vec<String>, placeholder: &str) -> Option<String>;

    /// Ask a question answered by one of `options`; `None` when dismissed.
    async fn confirm(&self, message: &str, options: &[&str]) -> Option<String>;

    /// Show an error notification.
    async fn notify_error(&self, message: &str);
}

/// Visual decoration provided by the host.
#[async_trait]
pub trait Decorator: Send + Sync {
    /// Apply decoration updates, in order.
    async fn apply_decorations(&self, updates: Vec<DecorationUpdate>);
}

/// Everything the overlay service needs from its host.
pub trait Host: SettingsStore + Prompter + Decorator {}

impl<T: SettingsStore + Prompter + Decorator> Host for T {}

/// In-memory settings, used as the host-side cache of the language server
/// and as the settings store in tests.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<Map<String, Value>>,
}

impl MemorySettings {
    /// Create an empty settings store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every setting with the entries of `section`.
    ///
    /// Anything other than a JSON object clears the settings.
    pub fn replace_all(&self, section: Value) {
        let values = match section {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = values;
    }

    /// Store a setting without going through the async write path.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
    }

    /// Snapshot of every setting.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        )
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.insert(key, value);
        Ok(())
    }
}
