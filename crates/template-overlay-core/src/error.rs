//! Error types for template-overlay-core

/// Errors surfaced to the user by the overlay commands.
///
/// Dismissed prompts are not errors; the commands return `Ok(())` for them.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("No active editor found.")]
    NoActiveEditor,

    #[error("No templates found in settings.")]
    NoTemplates,

    #[error("Failed to save template {name}: {source}")]
    SaveTemplate {
        name: String,
        #[source]
        source: SettingsError,
    },
}

/// Errors from the host settings store.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings write rejected: {0}")]
    Rejected(String),

    #[error("failed to serialize setting `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, OverlayError>;
