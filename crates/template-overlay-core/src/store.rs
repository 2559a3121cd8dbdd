//! Template storage on top of the host settings.
//!
//! Two settings back the store:
//!
//! - `list`: ordered `[{ name, content }]`
//! - `autoActivate`: `{ uriSuffix: templateName }`, in insertion order
//!
//! A [`TemplateStore`] is a snapshot of both. It is loaded fresh whenever an
//! operation needs templates, so edits made by the user in the host's
//! settings UI are picked up without any invalidation.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SettingsError;
use crate::host::SettingsStore;
use crate::types::Template;

/// Settings section the keys below live in.
pub const SETTINGS_SECTION: &str = "templateOverlay";
/// Settings key of the template list.
pub const LIST_KEY: &str = "list";
/// Settings key of the auto-activation mapping.
pub const AUTO_ACTIVATE_KEY: &str = "autoActivate";

/// An effective auto-activation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoActivationRule {
    /// Suffix the document URI must end with.
    pub pattern: String,
    /// The template to enable.
    pub template: Template,
}

impl AutoActivationRule {
    /// Check if the rule applies to `uri`.
    pub fn matches(&self, uri: &str) -> bool {
        uri.ends_with(&self.pattern)
    }
}

/// Snapshot of the stored templates and auto-activation mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateStore {
    templates: IndexMap<String, Template>,
    auto_activate: IndexMap<String, String>,
}

impl TemplateStore {
    /// Build a store from a template list and a raw pattern mapping.
    ///
    /// Later templates with a duplicate name replace earlier ones but keep the
    /// earlier position.
    pub fn from_parts(
        templates: impl IntoIterator<Item = Template>,
        auto_activate: IndexMap<String, String>,
    ) -> Self {
        let mut store = Self {
            templates: IndexMap::new(),
            auto_activate,
        };
        for template in templates {
            store.insert(template);
        }
        store
    }

    /// Load the store from the host settings.
    ///
    /// Malformed values are logged and treated as unset.
    pub fn load<S: SettingsStore + ?Sized>(settings: &S) -> Self {
        let list: Vec<Template> = read_setting(settings, LIST_KEY);
        let auto_activate: IndexMap<String, String> = read_setting(settings, AUTO_ACTIVATE_KEY);
        Self::from_parts(list, auto_activate)
    }

    /// Get a template by name.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Check if a template with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names in stored order.
    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    /// Check if there are no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Insert or replace a template. Returns the replaced template.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.name.clone(), template)
    }

    /// The effective auto-activation rules, in mapping order.
    ///
    /// Patterns naming a template that does not exist are dropped.
    pub fn auto_activation_rules(&self) -> Vec<AutoActivationRule> {
        self.auto_activate
            .iter()
            .filter_map(|(pattern, name)| {
                let template = self.templates.get(name);
                if template.is_none() {
                    debug!(%pattern, template = %name, "Dropping auto-activation rule for unknown template");
                }
                template.map(|template| AutoActivationRule {
                    pattern: pattern.clone(),
                    template: template.clone(),
                })
            })
            .collect()
    }

    /// Persist the template list. Resolves once the host accepted the write.
    pub async fn save<S: SettingsStore + ?Sized>(&self, settings: &S) -> Result<(), SettingsError> {
        let list: Vec<&Template> = self.templates.values().collect();
        let value = serde_json::to_value(list).map_err(|source| SettingsError::Serialize {
            key: LIST_KEY.to_string(),
            source,
        })?;
        settings.set(LIST_KEY, value).await
    }
}

fn read_setting<T, S>(settings: &S, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
    S: SettingsStore + ?Sized,
{
    match settings.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            warn!(key, error = %err, "Ignoring malformed setting");
            T::default()
        }),
    }
}
