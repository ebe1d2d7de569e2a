//! Error types for the transcript document.

use thiserror::Error;
use tierline_primitives::SpliceError;

/// Internal failures while patching the buffer.
///
/// Rejected user edits are not errors; see
/// [`FilterVerdict`](crate::filter::FilterVerdict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
	/// A splice did not fit the buffer.
	#[error(transparent)]
	Splice(#[from] SpliceError),
	/// An offset outside the buffer.
	#[error("offset {offset} outside buffer of {len} chars")]
	OffsetOutOfRange {
		/// Requested offset.
		offset: usize,
		/// Buffer length.
		len: usize,
	},
	/// The position map and the buffer disagree about an element.
	#[error("position map out of sync for element {0}")]
	MapOutOfSync(usize),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
