use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of a participant in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
pub enum ParticipantRole {
	#[strum(serialize = "Target Child")]
	TargetChild,
	Child,
	Mother,
	Father,
	Sibling,
	Investigator,
	Adult,
	#[default]
	Unidentified,
}

/// A speaker declared in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
	/// Short code used as the speaker label, e.g. `CHI`.
	pub id: String,
	/// Optional full name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Role in the session.
	#[serde(default)]
	pub role: ParticipantRole,
}

impl Participant {
	/// Creates a participant with the given code and role.
	pub fn new(id: impl Into<String>, role: ParticipantRole) -> Self {
		Self {
			id: id.into(),
			name: None,
			role,
		}
	}
}

/// Speaker reference held by a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Speaker {
	/// No participant assigned.
	#[default]
	Unknown,
	/// A participant referenced by id.
	Participant(String),
}

impl Speaker {
	/// Label rendered for unknown speakers.
	pub const UNKNOWN_ID: &'static str = "UNK";

	/// Creates a reference to the participant with `id`.
	pub fn participant(id: impl Into<String>) -> Self {
		Self::Participant(id.into())
	}

	/// Returns the speaker code, [`Self::UNKNOWN_ID`] for unknown speakers.
	pub fn id(&self) -> &str {
		match self {
			Self::Unknown => Self::UNKNOWN_ID,
			Self::Participant(id) => id,
		}
	}

	/// Resolves a speaker code, mapping the unknown label back to [`Speaker::Unknown`].
	pub fn from_id(id: &str) -> Self {
		if id.is_empty() || id == Self::UNKNOWN_ID {
			Self::Unknown
		} else {
			Self::participant(id)
		}
	}

	/// Returns true for [`Speaker::Unknown`].
	pub fn is_unknown(&self) -> bool {
		matches!(self, Self::Unknown)
	}
}

impl fmt::Display for Speaker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.id())
	}
}
