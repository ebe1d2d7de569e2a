use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::ids::ElementId;

/// Kind of transcript comment.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum CommentType {
	#[default]
	Comment,
	Activities,
	Situation,
	Location,
	Date,
	Warning,
}

impl CommentType {
	/// Header name used in chat label mode, e.g. `@Comment`.
	pub fn chat_label(self) -> String {
		format!("@{self}")
	}
}

/// A free-text comment between records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
	/// Stable id.
	pub id: ElementId,
	/// Comment kind.
	pub kind: CommentType,
	/// Comment text.
	pub text: String,
}

impl Comment {
	/// Creates a comment with a fresh id.
	pub fn new(kind: CommentType, text: impl Into<String>) -> Self {
		Self {
			id: ElementId::new(),
			kind,
			text: text.into(),
		}
	}
}

/// Gem boundary kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize)]
pub enum GemKind {
	#[strum(serialize = "Begin Gem")]
	Begin,
	#[strum(serialize = "End Gem")]
	End,
	#[strum(serialize = "Lazy Gem")]
	Lazy,
}

impl GemKind {
	/// Header name used in chat label mode.
	pub const fn chat_label(self) -> &'static str {
		match self {
			Self::Begin => "@Bg",
			Self::End => "@Eg",
			Self::Lazy => "@G",
		}
	}
}

/// A labelled gem marker delimiting a span of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gem {
	/// Stable id.
	pub id: ElementId,
	/// Gem kind.
	pub kind: GemKind,
	/// Gem label.
	pub label: String,
}

impl Gem {
	/// Creates a gem with a fresh id.
	pub fn new(kind: GemKind, label: impl Into<String>) -> Self {
		Self {
			id: ElementId::new(),
			kind,
			label: label.into(),
		}
	}
}
