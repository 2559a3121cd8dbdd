//! Transport-agnostic template overlay logic.
//!
//! This crate decides which spans of a live document still match a stored
//! template and keeps that answer current as documents open, change, close
//! and scroll in and out of view. It has no editor or protocol dependencies:
//! hosts feed it events and receive decoration updates back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     template-overlay-core                       │
//! │                                                                 │
//! │  service.rs ── TemplateOverlay<H: Host> (commands, prompts)     │
//! │      │                                                          │
//! │  workspace.rs ── Workspace (documents, visible editors)         │
//! │      │                 │                                        │
//! │  tracker.rs       renderer.rs ── ranges.rs (line diff)          │
//! │  (associations)   (decorations)                                 │
//! │                                                                 │
//! │  store.rs ── TemplateStore (settings `list` / `autoActivate`)   │
//! └─────────────────────────────────────────────────────────────────┘
//!             │
//!             ▼
//! ┌───────────────────────┐
//! │ template-overlay-lsp  │
//! │ (Native LSP host)     │
//! └───────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use template_overlay_core::{Template, compute_template_ranges};
//!
//! let template = Template::new("notes.md", "A\nB\nC\n");
//! let ranges = compute_template_ranges(&template, "A\nX\nC\n");
//! assert_eq!(ranges.len(), 2);
//! ```
//!
//! Offsets are UTF-8 byte offsets into the document text. They are converted
//! to line / UTF-16 column positions only when decorations are produced.

pub mod command;
pub mod document;
pub mod error;
pub mod host;
pub mod ranges;
pub mod renderer;
pub mod service;
pub mod store;
pub mod tracker;
pub mod types;
pub mod workspace;

// Re-export main types and functions for convenience
pub use command::Command;
pub use document::{Document, DocumentStore, LineIndex};
pub use error::{OverlayError, Result, SettingsError};
pub use host::{Decorator, Host, MemorySettings, Prompter, SettingsStore};
pub use ranges::compute_template_ranges;
pub use renderer::Renderer;
pub use service::TemplateOverlay;
pub use store::{AutoActivationRule, TemplateStore};
pub use tracker::ActivationTracker;
pub use types::{
    DecorationStyle, DecorationUpdate, DocumentId, EditorId, OffsetRange, Position, Range,
    Template, VisibleEditor,
};
pub use workspace::Workspace;
