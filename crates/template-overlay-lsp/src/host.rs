//! The overlay host backed by an LSP client connection.
//!
//! Settings are cached from `initializationOptions` and
//! `workspace/didChangeConfiguration`; writes go back to the client as
//! `templateOverlay/updateSetting` requests. Pickers and confirmations use
//! `window/showMessageRequest`, and decorations are pushed as
//! `templateOverlay/decorations` notifications.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tower_lsp::Client;
use tower_lsp::lsp_types::{MessageActionItem, MessageType};
use tracing::{debug, warn};

use template_overlay_core::store::{AUTO_ACTIVATE_KEY, LIST_KEY, SETTINGS_SECTION};
use template_overlay_core::{
    Decorator, DecorationUpdate, MemorySettings, Prompter, SettingsError, SettingsStore,
};

use crate::convert;
use crate::protocol::{Decorations, UpdateSetting, UpdateSettingParams};

pub struct LspHost {
    client: Client,
    settings: MemorySettings,
}

impl LspHost {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            settings: MemorySettings::new(),
        }
    }

    /// Replace the cached settings with a client-provided configuration.
    ///
    /// Accepts an object containing the `templateOverlay` section, or the
    /// section itself when it carries `list` or `autoActivate`. Anything else
    /// leaves the cache untouched.
    pub fn update_settings(&self, config: Value) {
        match settings_section(config) {
            Some(section) => {
                debug!("Settings replaced by client configuration");
                self.settings.replace_all(section);
            }
            None => debug!("Ignoring configuration without template overlay settings"),
        }
    }

    /// Mirror a message to the client's log via `window/logMessage`.
    pub async fn log_message(&self, kind: MessageType, message: &str) {
        self.client.log_message(kind, message.to_string()).await;
    }

    async fn show_choice(&self, message: &str, options: Vec<String>) -> Option<String> {
        let result = self
            .client
            .show_message_request(MessageType::INFO, message, Some(action_items(options)))
            .await;
        match result {
            Ok(choice) => choice.map(|item| item.title),
            Err(err) => {
                warn!(error = %err, "Message request failed");
                None
            }
        }
    }
}

/// Extract the overlay settings from a client configuration payload.
///
/// A bare object only counts as the section when it carries one of the
/// overlay keys, so other extensions' settings do not wipe the cache.
fn settings_section(config: Value) -> Option<Value> {
    let Value::Object(mut map) = config else {
        return None;
    };
    if let Some(section) = map.remove(SETTINGS_SECTION) {
        return section.is_object().then_some(section);
    }
    if map.contains_key(LIST_KEY) || map.contains_key(AUTO_ACTIVATE_KEY) {
        return Some(Value::Object(map));
    }
    None
}

fn action_items(options: Vec<String>) -> Vec<MessageActionItem> {
    options
        .into_iter()
        .map(|title| MessageActionItem {
            title,
            properties: HashMap::new(),
        })
        .collect()
}

#[async_trait]
impl SettingsStore for LspHost {
    fn get(&self, key: &str) -> Option<Value> {
        self.settings.get(key)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let params = UpdateSettingParams {
            section: SETTINGS_SECTION.to_string(),
            key: key.to_string(),
            value: value.clone(),
        };
        self.client
            .send_request::<UpdateSetting>(params)
            .await
            .map_err(|err| SettingsError::Rejected(err.message.to_string()))?;
        self.settings.insert(key, value);
        Ok(())
    }
}

#[async_trait]
impl Prompter for LspHost {
    async fn pick(&self, options: Vec<String>, placeholder: &str) -> Option<String> {
        self.show_choice(placeholder, options).await
    }

    async fn confirm(&self, message: &str, options: &[&str]) -> Option<String> {
        let options = options.iter().map(|option| option.to_string()).collect();
        self.show_choice(message, options).await
    }

    async fn notify_error(&self, message: &str) {
        self.client
            .show_message(MessageType::ERROR, message.to_string())
            .await;
    }
}

#[async_trait]
impl Decorator for LspHost {
    async fn apply_decorations(&self, updates: Vec<DecorationUpdate>) {
        for update in &updates {
            self.client
                .send_notification::<Decorations>(convert::decoration_to_params(update))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_is_taken_from_wrapper_or_bare_object() {
        let section = json!({"list": [], "autoActivate": {"a.md": "a"}});
        assert_eq!(
            settings_section(json!({"templateOverlay": section.clone(), "editor": {}})),
            Some(section.clone())
        );
        assert_eq!(settings_section(section.clone()), Some(section));
    }

    #[test]
    fn unrelated_configuration_is_ignored() {
        assert_eq!(settings_section(json!({})), None);
        assert_eq!(settings_section(json!({"otherExtension": {"list": []}})), None);
        assert_eq!(settings_section(json!({"templateOverlay": null})), None);
        assert_eq!(settings_section(Value::Null), None);
    }

    #[test]
    fn action_items_keep_order_and_titles() {
        let items = action_items(vec!["Yes".to_string(), "No".to_string()]);
        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Yes", "No"]);
        assert!(items.iter().all(|item| item.properties.is_empty()));
    }
}
