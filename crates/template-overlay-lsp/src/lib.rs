//! Template overlay Language Server Protocol host.
//!
//! This crate runs `template-overlay-core` behind the tower-lsp framework. The
//! editor-side client stays thin: it forwards document sync, the visible
//! editors and command invocations, and paints the decorations it is sent.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    template-overlay-lsp                        │
//! │   tower-lsp wrapper, JSON-RPC/stdio, `template-overlay lsp`   │
//! │                                                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────────────────────┐  │
//! │  │  server.rs  │  │  host.rs    │  │    capabilities.rs    │  │
//! │  │LanguageServer│ │ Host traits │  │ Capability negotiation│  │
//! │  └──────┬──────┘  └──────┬──────┘  └───────────────────────┘  │
//! │         │   protocol.rs (custom messages), convert.rs          │
//! │         └────────────────┴──────────────────┐                  │
//! │                                             │                  │
//! │  ┌──────────────────────────────────────────▼───────────────┐  │
//! │  │                 template-overlay-core                     │  │
//! │  │        (Host-agnostic matching and overlay state)         │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! The server is invoked via the `template-overlay lsp` subcommand:
//!
//! ```bash
//! template-overlay lsp
//! ```
//!
//! Or programmatically:
//!
//! ```rust,ignore
//! template_overlay_lsp::run_server().await;
//! ```

pub mod capabilities;
pub mod convert;
pub mod host;
pub mod protocol;
pub mod server;

pub use server::run_server;
