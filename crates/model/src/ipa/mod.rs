//! IPA transcripts.
//!
//! A transcript is a flat list of [`IpaElement`]s: phones (base symbol plus
//! diacritics) interleaved with word boundaries, stress markers, syllable
//! boundaries and pauses. Every element carries [`SyllabificationInfo`],
//! assigned by the syllabifier on parse and adjustable afterwards through
//! syllabification edits.

mod inventory;
mod syllabifier;
mod syllable;

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

pub use inventory::{CONSONANTS, SUFFIX_DIACRITICS, VOWELS};
pub use syllable::{DIPHTHONG_CODE, HIATUS_CODE, SyllabificationInfo, SyllableConstituentType};

use crate::error::{ModelError, ParseError};

/// Kind of an IPA element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpaElementKind {
	Consonant,
	Vowel,
	WordBoundary,
	StressMarker,
	SyllableBoundary,
	Pause,
}

/// One element of an IPA transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpaElement {
	kind: IpaElementKind,
	text: String,
	#[serde(default)]
	syllabification: SyllabificationInfo,
}

impl IpaElement {
	fn new(kind: IpaElementKind, text: impl Into<String>) -> Self {
		Self {
			kind,
			text: text.into(),
			syllabification: SyllabificationInfo::default(),
		}
	}

	/// Element kind.
	pub fn kind(&self) -> IpaElementKind {
		self.kind
	}

	/// Source text of the element, including diacritics.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns true for consonants and vowels.
	pub fn is_phone(&self) -> bool {
		matches!(self.kind, IpaElementKind::Consonant | IpaElementKind::Vowel)
	}

	/// Returns true for vowels and syllabic consonants.
	pub fn is_syllabic(&self) -> bool {
		match self.kind {
			IpaElementKind::Vowel => true,
			IpaElementKind::Consonant => self.text.chars().any(inventory::is_syllabic_mark),
			_ => false,
		}
	}

	/// Syllabification metadata.
	pub fn syllabification(&self) -> SyllabificationInfo {
		self.syllabification
	}

	/// Constituent type.
	pub fn constituent(&self) -> SyllableConstituentType {
		self.syllabification.constituent
	}

	/// Returns true if this element is part of a diphthong.
	pub fn is_diphthong_member(&self) -> bool {
		self.syllabification.diphthong_member
	}

	/// Base symbol without diacritics.
	pub fn base(&self) -> Option<char> {
		self.text.chars().next()
	}
}

/// A parsed IPA transcription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpaTranscript {
	elements: Vec<IpaElement>,
}

impl IpaTranscript {
	/// Parses IPA text and syllabifies it.
	///
	/// A single pair of enclosing `/…/` or `[…]` delimiters is accepted and
	/// dropped. Runs of whitespace collapse to one word boundary.
	pub fn parse(text: &str) -> Result<Self, ParseError> {
		let (body, lead) = strip_delimiters(text);
		let mut elements: Vec<IpaElement> = Vec::new();

		let graphemes: Vec<&str> = body.graphemes(true).collect();
		let mut offset = lead;
		let mut i = 0;
		while i < graphemes.len() {
			let g = graphemes[i];
			let width = g.chars().count();
			let Some(first) = g.chars().next() else {
				i += 1;
				continue;
			};

			if first.is_whitespace() {
				if elements
					.last()
					.is_some_and(|e| e.kind != IpaElementKind::WordBoundary)
				{
					elements.push(IpaElement::new(IpaElementKind::WordBoundary, " "));
				}
			} else if first == '(' {
				let dots = graphemes[i + 1..]
					.iter()
					.take_while(|g| **g == ".")
					.count();
				if (1..=3).contains(&dots) && graphemes.get(i + 1 + dots) == Some(&")") {
					let pause = format!("({})", ".".repeat(dots));
					elements.push(IpaElement::new(IpaElementKind::Pause, pause));
					offset += dots + 2;
					i += dots + 2;
					continue;
				}
				return Err(ParseError::new("malformed pause", offset));
			} else if inventory::is_stress(first) {
				elements.push(IpaElement::new(IpaElementKind::StressMarker, g));
			} else if first == '.' {
				elements.push(IpaElement::new(IpaElementKind::SyllableBoundary, g));
			} else if let Some(prev) = elements
				.last_mut()
				.filter(|e| e.is_phone() && e.text.ends_with(inventory::is_tie_bar))
			{
				if inventory::classify(first).is_none() {
					return Err(ParseError::new(format!("unexpected '{first}' after tie bar"), offset));
				}
				prev.text.push_str(g);
			} else if inventory::is_suffix_diacritic(first) {
				match elements.last_mut().filter(|e| e.is_phone()) {
					Some(prev) => prev.text.push_str(g),
					None => {
						return Err(ParseError::new(format!("dangling diacritic '{first}'"), offset));
					}
				}
			} else if let Some(kind) = inventory::classify(first) {
				elements.push(IpaElement::new(kind, g));
			} else {
				return Err(ParseError::new(format!("unexpected character '{first}'"), offset));
			}

			offset += width;
			i += 1;
		}

		if elements
			.last()
			.is_some_and(|e| e.kind == IpaElementKind::WordBoundary)
		{
			elements.pop();
		}

		let mut transcript = Self { elements };
		transcript.syllabify();
		Ok(transcript)
	}

	/// All elements in order.
	pub fn elements(&self) -> &[IpaElement] {
		&self.elements
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	/// Returns true if the transcript has no elements.
	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Element at `index`.
	pub fn get(&self, index: usize) -> Option<&IpaElement> {
		self.elements.get(index)
	}

	/// Phones with their element indices.
	pub fn phones(&self) -> impl Iterator<Item = (usize, &IpaElement)> {
		self.elements.iter().enumerate().filter(|(_, e)| e.is_phone())
	}

	/// Re-runs the syllabifier, discarding manual constituent and diphthong edits.
	pub fn syllabify(&mut self) {
		syllabifier::syllabify(&mut self.elements);
	}

	/// Snapshot of every element's syllabification.
	pub fn syllabification(&self) -> Vec<SyllabificationInfo> {
		self.elements.iter().map(|e| e.syllabification).collect()
	}

	/// Restores a snapshot taken with [`Self::syllabification`].
	///
	/// Entries beyond the transcript length are ignored.
	pub fn restore_syllabification(&mut self, infos: &[SyllabificationInfo]) {
		for (element, info) in self.elements.iter_mut().zip(infos) {
			element.syllabification = *info;
		}
	}

	/// Sets the constituent type at `index`, returning the previous value.
	pub fn set_constituent(
		&mut self,
		index: usize,
		constituent: SyllableConstituentType,
	) -> Result<SyllableConstituentType, ModelError> {
		let len = self.elements.len();
		let element = self
			.elements
			.get_mut(index)
			.ok_or(ModelError::PhoneIndex { index, len })?;
		Ok(std::mem::replace(
			&mut element.syllabification.constituent,
			constituent,
		))
	}

	/// Sets the diphthong flag at `index`, returning the previous value.
	pub fn set_diphthong_member(&mut self, index: usize, member: bool) -> Result<bool, ModelError> {
		let len = self.elements.len();
		let element = self
			.elements
			.get_mut(index)
			.ok_or(ModelError::PhoneIndex { index, len })?;
		Ok(std::mem::replace(
			&mut element.syllabification.diphthong_member,
			member,
		))
	}

	/// Finds the nucleus that pairs with the nucleus at `index` to form a diphthong.
	///
	/// Neighbouring phones are tried first (next, then previous), then phones
	/// two positions away. Non-phone elements such as word boundaries do not
	/// count as positions.
	pub fn diphthong_partner(&self, index: usize) -> Option<usize> {
		let element = self.elements.get(index)?;
		if !element.is_phone() || element.constituent() != SyllableConstituentType::Nucleus {
			return None;
		}
		let phones: Vec<usize> = self.phones().map(|(i, _)| i).collect();
		let pos = phones.iter().position(|&i| i == index)?;

		let candidates = [
			pos.checked_add(1),
			pos.checked_sub(1),
			pos.checked_add(2),
			pos.checked_sub(2),
		];
		candidates
			.into_iter()
			.flatten()
			.filter_map(|p| phones.get(p).copied())
			.find(|&i| self.elements[i].constituent() == SyllableConstituentType::Nucleus)
	}

	/// Finds the diphthong member paired with the member at `index`, using
	/// the same search order as [`Self::diphthong_partner`].
	pub fn member_partner(&self, index: usize) -> Option<usize> {
		if !self.elements.get(index)?.is_diphthong_member() {
			return None;
		}
		let phones: Vec<usize> = self.phones().map(|(i, _)| i).collect();
		let pos = phones.iter().position(|&i| i == index)?;
		[pos.checked_add(1), pos.checked_sub(1), pos.checked_add(2), pos.checked_sub(2)]
			.into_iter()
			.flatten()
			.filter_map(|p| phones.get(p).copied())
			.find(|&i| self.elements[i].is_diphthong_member())
	}

	/// Character offset of each element within the display string.
	pub fn element_offsets(&self) -> Vec<usize> {
		let mut offsets = Vec::with_capacity(self.elements.len());
		let mut pos = 0;
		for element in &self.elements {
			offsets.push(pos);
			pos += element.text.chars().count();
		}
		offsets
	}
}

fn strip_delimiters(text: &str) -> (&str, usize) {
	let trimmed = text.trim();
	let lead = text[..text.len() - text.trim_start().len()].chars().count();
	for (open, close) in [('/', '/'), ('[', ']')] {
		if trimmed.chars().count() >= 2
			&& trimmed.starts_with(open)
			&& trimmed.ends_with(close)
		{
			let inner = &trimmed[open.len_utf8()..trimmed.len() - close.len_utf8()];
			return (inner, lead + 1);
		}
	}
	(trimmed, lead)
}

impl fmt::Display for IpaTranscript {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for element in &self.elements {
			f.write_str(&element.text)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
