//! Typed tiers.
//!
//! A [`Tier`] holds either a parsed [`TierValue`] or, when its text failed
//! to parse, an [`UnvalidatedValue`] carrying the literal text and the
//! diagnostic. Tiers in the session's blind set additionally keep one
//! content per transcriber.

mod system;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use system::{SystemTier, ipa_tier_for_syllables, syllable_tier_for};

use crate::alignment::PhoneAlignment;
use crate::error::ParseError;
use crate::ipa::IpaTranscript;
use crate::orthography::Orthography;
use crate::segment::MediaSegment;

/// Declared value type of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum TierType {
	Orthography,
	Ipa,
	Segment,
	Alignment,
	Text,
}

impl TierType {
	/// Parses tier text into a value of this type.
	pub fn parse(self, text: &str) -> Result<TierValue, ParseError> {
		match self {
			Self::Orthography => Orthography::parse(text).map(TierValue::Orthography),
			Self::Ipa => IpaTranscript::parse(text).map(TierValue::Ipa),
			Self::Segment => MediaSegment::parse(text).map(TierValue::Segment),
			Self::Alignment => Err(ParseError::new("alignment tiers are computed", 0)),
			Self::Text => match text.chars().position(|c| c == '\n' || c == '\r') {
				Some(offset) => Err(ParseError::new("line break in text tier", offset)),
				None => Ok(TierValue::Text(text.to_owned())),
			},
		}
	}

	/// Value of an empty tier of this type.
	pub fn empty_value(self) -> TierValue {
		match self {
			Self::Orthography => TierValue::Orthography(Orthography::default()),
			Self::Ipa => TierValue::Ipa(IpaTranscript::default()),
			Self::Segment => TierValue::Segment(MediaSegment::default()),
			Self::Alignment => TierValue::Alignment(PhoneAlignment::default()),
			Self::Text => TierValue::Text(String::new()),
		}
	}
}

/// A parsed tier value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierValue {
	Orthography(Orthography),
	Ipa(IpaTranscript),
	Segment(MediaSegment),
	Alignment(PhoneAlignment),
	Text(String),
}

impl TierValue {
	/// Type of this value.
	pub fn tier_type(&self) -> TierType {
		match self {
			Self::Orthography(_) => TierType::Orthography,
			Self::Ipa(_) => TierType::Ipa,
			Self::Segment(_) => TierType::Segment,
			Self::Alignment(_) => TierType::Alignment,
			Self::Text(_) => TierType::Text,
		}
	}

	/// Returns the IPA transcript if this is an IPA value.
	pub fn as_ipa(&self) -> Option<&IpaTranscript> {
		match self {
			Self::Ipa(ipa) => Some(ipa),
			_ => None,
		}
	}
}

impl fmt::Display for TierValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Orthography(v) => v.fmt(f),
			Self::Ipa(v) => v.fmt(f),
			Self::Segment(v) => v.fmt(f),
			Self::Alignment(v) => v.fmt(f),
			Self::Text(v) => f.write_str(v),
		}
	}
}

/// Literal text kept when tier text fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnvalidatedValue {
	/// Text exactly as entered.
	pub text: String,
	/// Why it did not parse.
	pub error: ParseError,
}

/// Content of a tier: a parsed value or the unvalidated fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierContent {
	Value(TierValue),
	Unvalidated(UnvalidatedValue),
}

impl TierContent {
	/// Parses `text`, falling back to an unvalidated value on failure.
	pub fn parse(tier_type: TierType, text: &str) -> Self {
		match tier_type.parse(text) {
			Ok(value) => Self::Value(value),
			Err(error) => Self::Unvalidated(UnvalidatedValue {
				text: text.to_owned(),
				error,
			}),
		}
	}

	/// Text rendered for this content.
	pub fn text(&self) -> String {
		match self {
			Self::Value(value) => value.to_string(),
			Self::Unvalidated(u) => u.text.clone(),
		}
	}

	/// The parsed value, if valid.
	pub fn value(&self) -> Option<&TierValue> {
		match self {
			Self::Value(value) => Some(value),
			Self::Unvalidated(_) => None,
		}
	}

	/// The parse diagnostic, if unvalidated.
	pub fn parse_error(&self) -> Option<&ParseError> {
		match self {
			Self::Value(_) => None,
			Self::Unvalidated(u) => Some(&u.error),
		}
	}

	/// Returns true for parsed values.
	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Value(_))
	}
}

/// A user-declared tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDescription {
	/// Tier name.
	pub name: String,
	/// Declared type.
	pub tier_type: TierType,
}

impl TierDescription {
	/// Creates a description.
	pub fn new(name: impl Into<String>, tier_type: TierType) -> Self {
		Self {
			name: name.into(),
			tier_type,
		}
	}
}

/// A named, typed tier on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
	name: String,
	tier_type: TierType,
	content: TierContent,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	blind: BTreeMap<String, TierContent>,
}

impl Tier {
	/// Creates an empty tier.
	pub fn new(name: impl Into<String>, tier_type: TierType) -> Self {
		Self {
			name: name.into(),
			tier_type,
			content: TierContent::Value(tier_type.empty_value()),
			blind: BTreeMap::new(),
		}
	}

	/// Creates a tier and parses `text` into it.
	pub fn with_text(name: impl Into<String>, tier_type: TierType, text: &str) -> Self {
		let mut tier = Self::new(name, tier_type);
		tier.content = TierContent::parse(tier_type, text);
		tier
	}

	/// Tier name.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn set_name(&mut self, name: impl Into<String>) {
		self.name = name.into();
	}

	/// Declared type.
	pub fn tier_type(&self) -> TierType {
		self.tier_type
	}

	/// Current content.
	pub fn content(&self) -> &TierContent {
		&self.content
	}

	/// Parsed value, if valid.
	pub fn value(&self) -> Option<&TierValue> {
		self.content.value()
	}

	/// Mutable parsed value, if valid.
	pub fn value_mut(&mut self) -> Option<&mut TierValue> {
		match &mut self.content {
			TierContent::Value(value) => Some(value),
			TierContent::Unvalidated(_) => None,
		}
	}

	/// Rendered text of the content.
	pub fn text(&self) -> String {
		self.content.text()
	}

	/// Replaces the content, returning the previous one.
	pub fn set_content(&mut self, content: TierContent) -> TierContent {
		std::mem::replace(&mut self.content, content)
	}

	/// Parses `text` into the tier, returning the previous content.
	pub fn set_text(&mut self, text: &str) -> TierContent {
		self.set_content(TierContent::parse(self.tier_type, text))
	}

	/// IPA transcript, if this is a valid IPA tier.
	pub fn ipa(&self) -> Option<&IpaTranscript> {
		self.value().and_then(TierValue::as_ipa)
	}

	/// Mutable IPA transcript, if this is a valid IPA tier.
	pub fn ipa_mut(&mut self) -> Option<&mut IpaTranscript> {
		match self.value_mut() {
			Some(TierValue::Ipa(ipa)) => Some(ipa),
			_ => None,
		}
	}

	/// Blind content entered by `transcriber`.
	pub fn blind_content(&self, transcriber: &str) -> Option<&TierContent> {
		self.blind.get(transcriber)
	}

	/// Sets or clears blind content for `transcriber`, returning the previous content.
	pub fn set_blind_content(
		&mut self,
		transcriber: &str,
		content: Option<TierContent>,
	) -> Option<TierContent> {
		match content {
			Some(content) => self.blind.insert(transcriber.to_owned(), content),
			None => self.blind.remove(transcriber),
		}
	}

	/// Transcribers with blind content on this tier.
	pub fn blind_transcribers(&self) -> impl Iterator<Item = &str> {
		self.blind.keys().map(String::as_str)
	}
}
