//! Error types for edits and undo history.

use thiserror::Error;
use tierline_model::ModelError;

/// Errors raised while applying, reverting or grouping edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// The edit addressed something that does not exist in the session.
	#[error(transparent)]
	Model(#[from] ModelError),
	/// The addressed tier has no valid IPA value.
	#[error("tier '{0}' has no valid IPA transcript")]
	NotIpa(String),
	/// The edit was reverted or replayed before it was ever applied.
	#[error("edit '{0}' has no recorded state to revert")]
	NotApplied(&'static str),
	/// `end_update` without a matching `begin_update`.
	#[error("end_update called without begin_update")]
	UnbalancedUpdate,
	/// Undo or redo requested while an update group is open.
	#[error("cannot {0} while update group '{1}' is open")]
	UpdateOpen(&'static str, String),
}

/// Result type for edit operations.
pub type Result<T> = std::result::Result<T, EditError>;
