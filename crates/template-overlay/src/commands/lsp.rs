//! LSP server command implementation.

use anyhow::Result;

/// Execute the LSP server.
///
/// This starts the template overlay language server, communicating over
/// stdio with JSON-RPC messages.
pub fn execute() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        template_overlay_lsp::run_server().await;
    });

    Ok(())
}
