//! LSP capability negotiation.

use tower_lsp::lsp_types::{
    ExecuteCommandOptions, ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions,
};

use template_overlay_core::Command;

/// Get the server capabilities to report to the client.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                // Ranges are recomputed from the whole text on every change.
                change: Some(TextDocumentSyncKind::FULL),
                will_save: None,
                will_save_wait_until: None,
                save: None,
            },
        )),

        execute_command_provider: Some(ExecuteCommandOptions {
            commands: Command::ALL
                .iter()
                .map(|command| command.id().to_string())
                .collect(),
            ..Default::default()
        }),

        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_include_full_document_sync() {
        let caps = server_capabilities();
        let Some(TextDocumentSyncCapability::Options(options)) = caps.text_document_sync else {
            panic!("expected sync options");
        };
        assert_eq!(options.open_close, Some(true));
        assert_eq!(options.change, Some(TextDocumentSyncKind::FULL));
    }

    #[test]
    fn capabilities_list_every_command() {
        let caps = server_capabilities();
        let commands = caps.execute_command_provider.unwrap().commands;
        assert_eq!(commands.len(), Command::ALL.len());
        assert!(commands.contains(&"templateOverlay.create".to_string()));
    }
}
