//! Session editor for tiered linguistic transcripts.
//!
//! Ties a [`Session`](tierline_model::Session) to its undo history, event
//! bus, linear [`TranscriptDocument`](tierline_document::TranscriptDocument)
//! and find state behind one owner, [`SessionEditor`].

/// Editor configuration files.
pub mod config;
/// Error types.
pub mod error;
/// The editor itself.
pub mod session_editor;

pub use config::{EditorConfig, FindConfig};
pub use error::{ConfigError, EditorError, Result};
pub use session_editor::{ExternalChange, ReplaceSummary, SessionEditor};
