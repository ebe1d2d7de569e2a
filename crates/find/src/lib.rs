//! Find and replace over transcript sessions.
//!
//! A [`FindManager`] holds a [`FindExpr`] (plain text, regular expression or
//! [phonex](phonex) pattern) and a [`FindFilter`] choosing tiers, speakers and
//! non-record elements. Results are ordered by element, tier order and
//! offset. Replacements are returned as [`SessionEdit`](tierline_edit::SessionEdit)s
//! for the caller to post through its undo manager.

/// Error types.
pub mod error;
/// Search expressions.
pub mod expr;
/// Search scope.
pub mod filter;
/// Scanning, cursor and replace.
pub mod manager;
pub mod phonex;

pub use error::{FindError, Result};
pub use expr::{CompiledExpr, FindExpr, SearchType, TextMatch};
pub use filter::{FindFilter, SpeakerFilter};
pub use manager::{FindDirection, FindManager, FindResult, FindStep, PatternDiagnostic, ReplaceAll};
