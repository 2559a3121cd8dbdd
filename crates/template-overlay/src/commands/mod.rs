//! Command implementations for the template overlay CLI
//!
//! Each command module handles the CLI interface and delegates to
//! template-overlay-core or template-overlay-lsp for the actual work.

pub mod lsp;
pub mod ranges;
