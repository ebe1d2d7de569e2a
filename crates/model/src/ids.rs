use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a transcript element.
///
/// Survives moves, deletes and undo: a record removed and restored by undo
/// keeps the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
	/// Creates a fresh random id.
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}

	/// Wraps an existing UUID.
	pub const fn from_uuid(uuid: Uuid) -> Self {
		Self(uuid)
	}

	/// Returns the underlying UUID.
	pub const fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for ElementId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for ElementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}
