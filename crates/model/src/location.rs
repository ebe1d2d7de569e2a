use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Semantic address of a character in the transcript.
///
/// `char_position` is an offset into the rendered content of `tier` on the
/// element at `element_index`. Comments and gems expose their text under
/// the pseudo tiers [`Self::COMMENT_TIER`] and [`Self::GEM_TIER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranscriptElementLocation {
	/// Index of the transcript element.
	pub element_index: usize,
	/// Tier name.
	pub tier: String,
	/// Offset within the tier's rendered content.
	pub char_position: usize,
}

impl TranscriptElementLocation {
	/// Pseudo tier holding a comment's text.
	pub const COMMENT_TIER: &'static str = "Comment";
	/// Pseudo tier holding a gem's label.
	pub const GEM_TIER: &'static str = "Gem";

	/// Creates a location.
	pub fn new(element_index: usize, tier: impl Into<String>, char_position: usize) -> Self {
		Self {
			element_index,
			tier: tier.into(),
			char_position,
		}
	}

	/// Returns the same address at another offset.
	pub fn with_position(&self, char_position: usize) -> Self {
		Self {
			char_position,
			..self.clone()
		}
	}

	/// Orders by element, then by position of the tier in `tier_order`, then by offset.
	///
	/// Tiers missing from `tier_order` sort after listed tiers, by name.
	pub fn cmp_with_tier_order(&self, other: &Self, tier_order: &[impl AsRef<str>]) -> Ordering {
		self.element_index
			.cmp(&other.element_index)
			.then_with(|| {
				let rank = |tier: &str| tier_order.iter().position(|t| t.as_ref() == tier);
				match (rank(&self.tier), rank(&other.tier)) {
					(Some(a), Some(b)) => a.cmp(&b),
					(Some(_), None) => Ordering::Less,
					(None, Some(_)) => Ordering::Greater,
					(None, None) => self.tier.cmp(&other.tier),
				}
			})
			.then_with(|| self.char_position.cmp(&other.char_position))
	}
}

impl fmt::Display for TranscriptElementLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}:{}", self.element_index, self.tier, self.char_position)
	}
}

/// A range of characters within one tier of one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranscriptElementRange {
	/// Index of the transcript element.
	pub element_index: usize,
	/// Tier name.
	pub tier: String,
	/// Character range within the tier's rendered content.
	pub range: Range<usize>,
}

impl TranscriptElementRange {
	/// Creates a range.
	pub fn new(element_index: usize, tier: impl Into<String>, range: Range<usize>) -> Self {
		Self {
			element_index,
			tier: tier.into(),
			range,
		}
	}

	/// Location of the first character.
	pub fn start(&self) -> TranscriptElementLocation {
		TranscriptElementLocation::new(self.element_index, self.tier.clone(), self.range.start)
	}

	/// Location just past the last character.
	pub fn end(&self) -> TranscriptElementLocation {
		TranscriptElementLocation::new(self.element_index, self.tier.clone(), self.range.end)
	}
}

impl fmt::Display for TranscriptElementRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}.{}:{}..{}",
			self.element_index, self.tier, self.range.start, self.range.end
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ordering_follows_tier_order() {
		let order = ["Orthography", "IPA Target", "Notes"];
		let a = TranscriptElementLocation::new(0, "Notes", 0);
		let b = TranscriptElementLocation::new(0, "IPA Target", 9);
		let c = TranscriptElementLocation::new(1, "Orthography", 0);
		assert_eq!(a.cmp_with_tier_order(&b, &order), Ordering::Greater);
		assert_eq!(b.cmp_with_tier_order(&c, &order), Ordering::Less);
		let unlisted = TranscriptElementLocation::new(0, "Morphology", 0);
		assert_eq!(unlisted.cmp_with_tier_order(&a, &order), Ordering::Greater);
	}

	#[test]
	fn range_endpoints() {
		let r = TranscriptElementRange::new(0, "Orthography", 3..8);
		assert_eq!(r.start(), TranscriptElementLocation::new(0, "Orthography", 3));
		assert_eq!(r.end().char_position, 8);
		assert_eq!(r.to_string(), "0.Orthography:3..8");
	}
}
