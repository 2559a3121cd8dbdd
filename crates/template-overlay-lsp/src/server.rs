//! LSP server implementation using tower-lsp.

use std::sync::Arc;

use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info};

use template_overlay_core::{Command, TemplateOverlay};

use crate::capabilities::server_capabilities;
use crate::convert;
use crate::host::LspHost;
use crate::protocol::{DidChangeVisibleEditors, VisibleEditorsParams};

/// The template overlay language server.
pub struct TemplateOverlayServer {
    /// Shared with spawned command tasks, which outlive the request.
    overlay: Arc<TemplateOverlay<LspHost>>,
}

impl TemplateOverlayServer {
    /// Create a new language server instance.
    pub fn new(client: Client) -> Self {
        Self {
            overlay: Arc::new(TemplateOverlay::new(LspHost::new(client))),
        }
    }

    /// Handler for `templateOverlay/didChangeVisibleEditors`.
    pub async fn did_change_visible_editors(&self, params: VisibleEditorsParams) {
        let editors = params
            .editors
            .into_iter()
            .map(convert::visible_editor_from_lsp)
            .collect();
        self.overlay.did_change_visible_editors(editors).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for TemplateOverlayServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            self.overlay.host().update_settings(options);
        }
        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "template-overlay-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("Template overlay server initialized");
        self.overlay
            .host()
            .log_message(MessageType::INFO, "Template overlay server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        self.overlay
            .did_open(document.uri.as_str(), document.text, Some(document.version))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Full document sync: the last change holds the whole text.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.overlay
                .did_change(uri.as_str(), change.text, Some(version))
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.overlay.did_close(params.text_document.uri.as_str());
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.overlay.host().update_settings(params.settings);
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        let command = Command::from_id(&params.command).ok_or_else(|| {
            Error::invalid_params(format!("unknown command: {}", params.command))
        })?;
        let active_uri = params
            .arguments
            .first()
            .and_then(Value::as_str)
            .map(str::to_string);
        debug!(%command, uri = ?active_uri, "Executing command");

        // Commands wait on user prompts, which the client only answers once
        // this request has returned.
        let overlay = Arc::clone(&self.overlay);
        tokio::spawn(async move {
            overlay.execute(command, active_uri.as_deref()).await;
        });
        Ok(None)
    }
}

/// Build the service with the custom notification wired in.
pub fn build_service() -> (LspService<TemplateOverlayServer>, tower_lsp::ClientSocket) {
    LspService::build(TemplateOverlayServer::new)
        .custom_method(
            <DidChangeVisibleEditors as notification::Notification>::METHOD,
            TemplateOverlayServer::did_change_visible_editors,
        )
        .finish()
}

/// Run the LSP server over stdio.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = build_service();
    Server::new(stdin, stdout, socket).serve(service).await;
}
