//! Error types for the session data model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic produced when tier text does not parse to its declared type.
///
/// Stored alongside the literal text in an unvalidated tier value; never
/// surfaced as a hard failure while editing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (at char {offset})")]
pub struct ParseError {
	/// Human readable description.
	pub message: String,
	/// Character offset into the tier text where parsing failed.
	pub offset: usize,
}

impl ParseError {
	/// Creates a parse error at `offset`.
	pub fn new(message: impl Into<String>, offset: usize) -> Self {
		Self {
			message: message.into(),
			offset,
		}
	}
}

/// Errors from model operations addressed with bad indices or names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
	/// Element index outside the transcript.
	#[error("element index {index} out of range (len {len})")]
	ElementIndex {
		/// Requested index.
		index: usize,
		/// Transcript length.
		len: usize,
	},
	/// The element at this index is not a record.
	#[error("element {0} is not a record")]
	NotARecord(usize),
	/// The element at this index is not a comment.
	#[error("element {0} is not a comment")]
	NotAComment(usize),
	/// The element at this index is not a gem.
	#[error("element {0} is not a gem")]
	NotAGem(usize),
	/// No tier with this name is declared.
	#[error("unknown tier '{0}'")]
	UnknownTier(String),
	/// A tier with this name is already declared.
	#[error("tier '{0}' already exists")]
	DuplicateTier(String),
	/// System tiers cannot be removed or redeclared.
	#[error("'{0}' is a system tier")]
	SystemTier(String),
	/// The tier view does not reference every declared tier exactly once.
	#[error("tier view mismatch: {0}")]
	TierView(String),
	/// Phone index outside an IPA transcript.
	#[error("phone index {index} out of range (len {len})")]
	PhoneIndex {
		/// Requested index.
		index: usize,
		/// Transcript length.
		len: usize,
	},
	/// A media range whose end precedes its start.
	#[error("invalid media range {start_ms}..{end_ms}")]
	InvalidRange {
		/// Start in milliseconds.
		start_ms: u64,
		/// End in milliseconds.
		end_ms: u64,
	},
	/// Malformed tabular transfer text.
	#[error("transfer line {line}: {message}")]
	Transfer {
		/// One-based line number.
		line: usize,
		/// Description of the problem.
		message: String,
	},
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
