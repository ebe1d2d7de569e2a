//! Error types for find and replace.

use thiserror::Error;

/// Errors raised while compiling expressions, scanning or replacing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FindError {
	/// A plain or regular expression failed to compile.
	#[error(transparent)]
	Regex(#[from] regex::Error),
	/// A phonetic pattern failed to compile.
	#[error("phonex pattern error at char {offset}: {message}")]
	Phonex {
		/// Character offset into the pattern.
		offset: usize,
		/// What went wrong.
		message: String,
	},
	/// A newer scan superseded this one, or it was cancelled.
	#[error("search cancelled")]
	Cancelled,
	/// Replace was requested without a current match.
	#[error("no current match")]
	NoMatch,
	/// The match lies in a tier locked in the tier view.
	#[error("tier '{0}' is locked")]
	Locked(String),
	/// The match lies in a tier the active user cannot edit.
	#[error("tier '{0}' is not editable")]
	ReadOnly(String),
	/// The session changed under a match since the scan.
	#[error("match {0} no longer matches the session")]
	Stale(String),
}

impl FindError {
	pub(crate) fn phonex(offset: usize, message: impl Into<String>) -> Self {
		Self::Phonex {
			offset,
			message: message.into(),
		}
	}
}

/// Result type for find operations.
pub type Result<T> = std::result::Result<T, FindError>;
