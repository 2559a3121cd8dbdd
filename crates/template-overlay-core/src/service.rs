//! The overlay service: a [`Workspace`] wired to a [`Host`].
//!
//! [`TemplateOverlay`] is what a host integration talks to. Document and
//! editor events go in, decoration updates go out through the host's
//! [`Decorator`](crate::Decorator), and the user commands run their prompt
//! flows against the host's [`Prompter`](crate::Prompter).
//!
//! ## Suspension and re-validation
//!
//! The workspace sits behind a mutex that is only held inside synchronous
//! sections, never across an `.await`. While a command waits for a prompt or
//! a settings write, other events (including a close of the very document
//! the command targets) run to completion. Commands therefore capture a
//! [`DocumentId`] up front and let [`Workspace::enable`] re-check it after
//! resuming: a document closed in the meantime makes the enable a no-op.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::command::Command;
use crate::error::{OverlayError, Result};
use crate::host::Host;
use crate::store::{AutoActivationRule, TemplateStore};
use crate::types::{DecorationStyle, DecorationUpdate, DocumentId, Template, VisibleEditor};
use crate::workspace::Workspace;

const SELECT_PLACEHOLDER: &str = "Select template to apply...";
const YES: &str = "Yes";
const NO: &str = "No";

pub struct TemplateOverlay<H> {
    host: H,
    workspace: Mutex<Workspace>,
}

impl<H: Host> TemplateOverlay<H> {
    pub fn new(host: H) -> Self {
        Self::with_style(host, DecorationStyle::default())
    }

    pub fn with_style(host: H, style: DecorationStyle) -> Self {
        Self {
            host,
            workspace: Mutex::new(Workspace::with_style(style)),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Run `f` against the workspace. The lock is released when `f` returns.
    pub fn with_workspace<R>(&self, f: impl FnOnce(&mut Workspace) -> R) -> R {
        let mut workspace = self.workspace.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut workspace)
    }

    fn store(&self) -> TemplateStore {
        TemplateStore::load(&self.host)
    }

    fn rules(&self) -> Vec<AutoActivationRule> {
        self.store().auto_activation_rules()
    }

    async fn push(&self, updates: Vec<DecorationUpdate>) {
        if !updates.is_empty() {
            self.host.apply_decorations(updates).await;
        }
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    pub async fn did_open(&self, uri: &str, text: String, version: Option<i32>) -> DocumentId {
        let rules = self.rules();
        let (id, updates) = self.with_workspace(|ws| ws.open(uri, text, version, &rules));
        self.push(updates).await;
        id
    }

    pub async fn did_change(&self, uri: &str, text: String, version: Option<i32>) {
        let updates = self.with_workspace(|ws| ws.change(uri, text, version));
        self.push(updates).await;
    }

    pub fn did_close(&self, uri: &str) {
        self.with_workspace(|ws| ws.close(uri));
    }

    pub async fn did_change_visible_editors(&self, editors: Vec<VisibleEditor>) {
        let rules = self.rules();
        let updates = self.with_workspace(|ws| ws.set_visible_editors(editors, &rules));
        self.push(updates).await;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The template active for the open document at `uri`.
    pub fn active_template(&self, uri: &str) -> Option<Template> {
        self.with_workspace(|ws| {
            let id = ws.document_by_uri(uri)?.id();
            ws.active_template(id).cloned()
        })
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Run `command` for the document at `active_uri`, reporting failures to
    /// the user.
    pub async fn execute(&self, command: Command, active_uri: Option<&str>) {
        if let Err(err) = self.run(command, active_uri).await {
            info!(%command, error = %err, "Command failed");
            self.host.notify_error(&err.to_string()).await;
        }
    }

    /// Run `command` for the document at `active_uri`.
    ///
    /// Dismissed prompts resolve to `Ok(())` without any state change.
    pub async fn run(&self, command: Command, active_uri: Option<&str>) -> Result<()> {
        let document = if command.needs_document() {
            Some(self.require_document(active_uri)?)
        } else {
            None
        };

        match (command, document) {
            (Command::Enable, Some(document)) => self.enable_template(document).await,
            (Command::Disable, Some(document)) => {
                let updates = self.with_workspace(|ws| ws.disable(document));
                self.push(updates).await;
                Ok(())
            }
            (Command::Create, Some(document)) => self.create_template(document).await,
            (Command::DisableAutoActivation, Some(document)) => {
                self.with_workspace(|ws| ws.suppress_auto_activation(document));
                Ok(())
            }
            (Command::ClearDisabledAutoActivations, _) => {
                let rules = self.rules();
                let updates = self.with_workspace(|ws| ws.clear_suppressed(&rules));
                self.push(updates).await;
                Ok(())
            }
            (_, None) => Err(OverlayError::NoActiveEditor),
        }
    }

    fn require_document(&self, active_uri: Option<&str>) -> Result<DocumentId> {
        let uri = active_uri.ok_or(OverlayError::NoActiveEditor)?;
        self.with_workspace(|ws| ws.document_by_uri(uri).map(|doc| doc.id()))
            .ok_or(OverlayError::NoActiveEditor)
    }

    /// Ask the user for a template and enable it for `document`.
    async fn enable_template(&self, document: DocumentId) -> Result<()> {
        let store = self.store();
        if store.is_empty() {
            return Err(OverlayError::NoTemplates);
        }

        let Some(name) = self.host.pick(store.names(), SELECT_PLACEHOLDER).await else {
            debug!(%document, "Template selection dismissed");
            return Ok(());
        };

        // Settings may have changed while the picker was open.
        let Some(template) = self.store().get(&name).cloned() else {
            debug!(template = %name, "Selected template no longer exists");
            return Ok(());
        };

        let updates = self.with_workspace(|ws| ws.enable(document, template));
        self.push(updates).await;
        Ok(())
    }

    /// Store `document`'s text as a template named after its file and enable it.
    async fn create_template(&self, document: DocumentId) -> Result<()> {
        let Some((name, content)) = self.with_workspace(|ws| {
            ws.document(document)
                .map(|doc| (doc.filename().to_string(), doc.content().to_string()))
        }) else {
            return Err(OverlayError::NoActiveEditor);
        };

        if self.store().contains(&name) {
            let message =
                format!("A template with the name {name} already exists, do you want to overwrite?");
            let answer = self.host.confirm(&message, &[YES, NO]).await;
            if answer.as_deref() != Some(YES) {
                debug!(template = %name, "Template overwrite declined");
                return Ok(());
            }
        }

        let template = Template::new(name.clone(), content);
        let mut store = self.store();
        store.insert(template.clone());
        if let Err(source) = store.save(&self.host).await {
            warn!(template = %name, error = %source, "Failed to persist template");
            return Err(OverlayError::SaveTemplate { name, source });
        }
        info!(template = %name, "Template saved");

        let updates = self.with_workspace(|ws| ws.enable(document, template));
        self.push(updates).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::SettingsError;
    use crate::host::{Decorator, MemorySettings, Prompter, SettingsStore};

    const URI: &str = "file:///home/me/notes.md";

    /// Scripted host: answers prompts from a queue and records everything.
    #[derive(Default)]
    struct FakeHost {
        settings: MemorySettings,
        answers: Mutex<VecDeque<Option<String>>>,
        prompts: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
        decorations: Mutex<Vec<DecorationUpdate>>,
        reject_writes: bool,
        /// Runs while a prompt is pending, to simulate interleaved events.
        during_prompt: Mutex<Option<Box<dyn FnOnce() + Send>>>,
    }

    impl FakeHost {
        fn with_settings(value: Value) -> Self {
            let host = Self::default();
            host.settings.replace_all(value);
            host
        }

        fn answer(self, answer: Option<&str>) -> Self {
            self.answers
                .lock()
                .unwrap()
                .push_back(answer.map(str::to_string));
            self
        }

        fn next_answer(&self) -> Option<String> {
            if let Some(hook) = self.during_prompt.lock().unwrap().take() {
                hook();
            }
            self.answers.lock().unwrap().pop_front().flatten()
        }

        fn errors(&self) -> Vec<String> {
            self.errors.lock().unwrap().clone()
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        fn decorations(&self) -> Vec<DecorationUpdate> {
            self.decorations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SettingsStore for FakeHost {
        fn get(&self, key: &str) -> Option<Value> {
            self.settings.get(key)
        }

        async fn set(&self, key: &str, value: Value) -> std::result::Result<(), SettingsError> {
            if self.reject_writes {
                return Err(SettingsError::Rejected("read-only settings".to_string()));
            }
            self.settings.set(key, value).await
        }
    }

    #[async_trait]
    impl Prompter for FakeHost {
        async fn pick(&self, options: Vec<String>, placeholder: &str) -> Option<String> {
            self.prompts
                .lock()
                .unwrap()
                .push(format!("pick {placeholder} {options:?}"));
            self.next_answer()
        }

        async fn confirm(&self, message: &str, options: &[&str]) -> Option<String> {
            self.prompts
                .lock()
                .unwrap()
                .push(format!("confirm {message} {options:?}"));
            self.next_answer()
        }

        async fn notify_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    #[async_trait]
    impl Decorator for FakeHost {
        async fn apply_decorations(&self, updates: Vec<DecorationUpdate>) {
            self.decorations.lock().unwrap().extend(updates);
        }
    }

    fn templates() -> Value {
        json!({
            "list": [
                {"name": "notes.md", "content": "# Notes\n\n## Todo\n"},
                {"name": "journal.md", "content": "# Journal\n"}
            ],
            "autoActivate": {}
        })
    }

    fn open(overlay: &TemplateOverlay<FakeHost>, text: &str) -> DocumentId {
        pollster::block_on(async {
            let id = overlay.did_open(URI, text.to_string(), Some(1)).await;
            overlay
                .did_change_visible_editors(vec![VisibleEditor::new("e1", URI)])
                .await;
            id
        })
    }

    #[test]
    fn enable_picks_a_template() {
        let overlay = TemplateOverlay::new(
            FakeHost::with_settings(templates()).answer(Some("journal.md")),
        );
        open(&overlay, "# Journal\ntoday\n");

        pollster::block_on(overlay.execute(Command::Enable, Some(URI)));

        assert_eq!(overlay.active_template(URI).unwrap().name, "journal.md");
        assert_eq!(
            overlay.host().prompts(),
            vec![r#"pick Select template to apply... ["notes.md", "journal.md"]"#]
        );
        let last = overlay.host().decorations().pop().unwrap();
        assert_eq!(last.ranges().len(), 1);
    }

    #[test]
    fn enable_dismissed_is_silent() {
        let overlay = TemplateOverlay::new(FakeHost::with_settings(templates()).answer(None));
        open(&overlay, "text\n");

        pollster::block_on(overlay.execute(Command::Enable, Some(URI)));

        assert!(overlay.active_template(URI).is_none());
        assert!(overlay.host().errors().is_empty());
    }

    #[test]
    fn enable_without_templates_reports_error() {
        let overlay = TemplateOverlay::new(FakeHost::default());
        open(&overlay, "text\n");

        pollster::block_on(overlay.execute(Command::Enable, Some(URI)));

        assert_eq!(overlay.host().errors(), vec!["No templates found in settings."]);
        assert!(overlay.host().prompts().is_empty());
    }

    #[test]
    fn commands_without_active_editor_report_error() {
        let overlay = TemplateOverlay::new(FakeHost::with_settings(templates()));

        for command in [
            Command::Enable,
            Command::Disable,
            Command::Create,
            Command::DisableAutoActivation,
        ] {
            pollster::block_on(overlay.execute(command, None));
        }
        // A URI that is not open counts as no active editor too.
        pollster::block_on(overlay.execute(Command::Disable, Some("file:///closed.md")));

        assert_eq!(overlay.host().errors().len(), 5);
        assert!(
            overlay
                .host()
                .errors()
                .iter()
                .all(|e| e == "No active editor found.")
        );
    }

    #[test]
    fn disable_clears_decoration() {
        let overlay = TemplateOverlay::new(
            FakeHost::with_settings(templates()).answer(Some("notes.md")),
        );
        open(&overlay, "# Notes\n");
        pollster::block_on(overlay.execute(Command::Enable, Some(URI)));

        pollster::block_on(overlay.execute(Command::Disable, Some(URI)));

        assert!(overlay.active_template(URI).is_none());
        let last = overlay.host().decorations().pop().unwrap();
        assert!(matches!(last, DecorationUpdate::Clear { .. }));
    }

    #[test]
    fn create_stores_and_enables_new_template() {
        let overlay = TemplateOverlay::new(FakeHost::default());
        open(&overlay, "# Fresh\nbody\n");

        pollster::block_on(overlay.execute(Command::Create, Some(URI)));

        assert!(overlay.host().prompts().is_empty());
        assert_eq!(
            overlay.host().get("list"),
            Some(json!([{"name": "notes.md", "content": "# Fresh\nbody\n"}]))
        );
        let active = overlay.active_template(URI).unwrap();
        assert_eq!(active.content, "# Fresh\nbody\n");
    }

    #[test]
    fn create_overwrite_declined_changes_nothing() {
        let overlay = TemplateOverlay::new(FakeHost::with_settings(templates()).answer(Some(NO)));
        open(&overlay, "something else\n");

        pollster::block_on(overlay.execute(Command::Create, Some(URI)));

        assert_eq!(
            overlay.host().prompts(),
            vec![
                r#"confirm A template with the name notes.md already exists, do you want to overwrite? ["Yes", "No"]"#
            ]
        );
        assert_eq!(overlay.host().get("list"), templates().get("list").cloned());
        assert!(overlay.active_template(URI).is_none());
        assert!(overlay.host().errors().is_empty());
    }

    #[test]
    fn create_overwrite_dismissed_changes_nothing() {
        let overlay = TemplateOverlay::new(FakeHost::with_settings(templates()).answer(None));
        open(&overlay, "something else\n");

        pollster::block_on(overlay.execute(Command::Create, Some(URI)));

        assert_eq!(overlay.host().get("list"), templates().get("list").cloned());
        assert!(overlay.active_template(URI).is_none());
    }

    #[test]
    fn create_overwrite_confirmed_replaces_in_place() {
        let overlay = TemplateOverlay::new(FakeHost::with_settings(templates()).answer(Some(YES)));
        open(&overlay, "# New notes\n");

        pollster::block_on(overlay.execute(Command::Create, Some(URI)));

        assert_eq!(
            overlay.host().get("list"),
            Some(json!([
                {"name": "notes.md", "content": "# New notes\n"},
                {"name": "journal.md", "content": "# Journal\n"}
            ]))
        );
        assert_eq!(overlay.active_template(URI).unwrap().content, "# New notes\n");
    }

    #[test]
    fn create_with_rejected_write_reports_and_skips_enable() {
        let host = FakeHost {
            reject_writes: true,
            ..FakeHost::default()
        };
        let overlay = TemplateOverlay::new(host);
        open(&overlay, "# Draft\n");

        pollster::block_on(overlay.execute(Command::Create, Some(URI)));

        assert_eq!(
            overlay.host().errors(),
            vec!["Failed to save template notes.md: settings write rejected: read-only settings"]
        );
        assert!(overlay.active_template(URI).is_none());
    }

    #[test]
    fn document_closed_during_prompt_is_not_enabled() {
        let overlay = Arc::new(TemplateOverlay::new(
            FakeHost::with_settings(templates()).answer(Some(YES)),
        ));
        open(&overlay, "# Notes\n");

        let closer = Arc::clone(&overlay);
        *overlay.host().during_prompt.lock().unwrap() = Some(Box::new(move || {
            closer.did_close(URI);
        }));

        pollster::block_on(overlay.execute(Command::Create, Some(URI)));

        // The template is stored, but nothing is enabled for the closed document.
        assert_eq!(
            overlay.host().get("list").unwrap()[0],
            json!({"name": "notes.md", "content": "# Notes\n"})
        );
        assert!(overlay.with_workspace(|ws| ws.document_by_uri(URI).is_none()));
        assert!(overlay.host().errors().is_empty());

        // Reopening gives a fresh document without the association.
        pollster::block_on(overlay.did_open(URI, "# Notes\n".to_string(), Some(2)));
        assert!(overlay.active_template(URI).is_none());
    }

    #[test]
    fn auto_activation_and_suppression() {
        let mut settings = templates();
        settings["autoActivate"] = json!({"notes.md": "notes.md"});
        let overlay = TemplateOverlay::new(FakeHost::with_settings(settings));

        open(&overlay, "# Notes\n");
        assert_eq!(overlay.active_template(URI).unwrap().name, "notes.md");

        // Suppression keeps the current template; disable then stays off.
        pollster::block_on(overlay.execute(Command::DisableAutoActivation, Some(URI)));
        pollster::block_on(overlay.execute(Command::Disable, Some(URI)));
        pollster::block_on(
            overlay.did_change_visible_editors(vec![VisibleEditor::new("e1", URI)]),
        );
        assert!(overlay.active_template(URI).is_none());

        pollster::block_on(overlay.execute(Command::ClearDisabledAutoActivations, None));
        assert_eq!(overlay.active_template(URI).unwrap().name, "notes.md");
        assert!(overlay.host().errors().is_empty());
    }
}
