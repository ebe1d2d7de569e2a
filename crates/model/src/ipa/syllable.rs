use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Code typed in syllabification edit mode to pair two nuclei as a diphthong.
pub const DIPHTHONG_CODE: char = 'D';
/// Code typed in syllabification edit mode to split a diphthong back into a hiatus.
pub const HIATUS_CODE: char = 'H';

/// Position of a phone within its syllable.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, Serialize, Deserialize,
)]
pub enum SyllableConstituentType {
	#[strum(serialize = "Left Appendix")]
	LeftAppendix,
	Onset,
	Nucleus,
	Coda,
	#[strum(serialize = "Right Appendix")]
	RightAppendix,
	#[strum(serialize = "OEHS")]
	Oehs,
	Ambisyllabic,
	#[default]
	Unknown,
	#[strum(serialize = "Syllable Boundary")]
	SyllableBoundaryMarker,
	#[strum(serialize = "Syllable Stress")]
	SyllableStressMarker,
	#[strum(serialize = "Word Boundary")]
	WordBoundaryMarker,
}

impl SyllableConstituentType {
	/// Single-character code rendered in syllabification tiers.
	pub const fn id_char(self) -> char {
		match self {
			Self::LeftAppendix => 'L',
			Self::Onset => 'O',
			Self::Nucleus => 'N',
			Self::Coda => 'C',
			Self::RightAppendix => 'R',
			Self::Oehs => 'E',
			Self::Ambisyllabic => 'A',
			Self::Unknown => 'U',
			Self::SyllableBoundaryMarker => 'B',
			Self::SyllableStressMarker => 'S',
			Self::WordBoundaryMarker => 'W',
		}
	}

	/// Resolves a code typed by the user. Case-insensitive; `D` maps to nucleus.
	pub fn from_id_char(ch: char) -> Option<Self> {
		let upper = ch.to_ascii_uppercase();
		if upper == DIPHTHONG_CODE {
			return Some(Self::Nucleus);
		}
		Self::iter().find(|ty| ty.id_char() == upper)
	}

	/// Returns true if `ch` is accepted by the syllabification edit filter.
	pub fn is_edit_code(ch: char) -> bool {
		let upper = ch.to_ascii_uppercase();
		upper == HIATUS_CODE || Self::from_id_char(upper).is_some()
	}

	/// Constituents whose code is not shown in syllabification tiers.
	pub const fn is_hidden(self) -> bool {
		matches!(
			self,
			Self::SyllableStressMarker | Self::Unknown | Self::WordBoundaryMarker
		)
	}

	/// Constituents assigned to non-phone elements.
	pub const fn is_marker(self) -> bool {
		matches!(
			self,
			Self::SyllableBoundaryMarker | Self::SyllableStressMarker | Self::WordBoundaryMarker
		)
	}
}

/// Syllabification metadata carried by every IPA element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyllabificationInfo {
	/// Constituent type.
	pub constituent: SyllableConstituentType,
	/// True when this nucleus is paired with an adjacent nucleus as a diphthong.
	#[serde(default)]
	pub diphthong_member: bool,
}

impl SyllabificationInfo {
	/// Creates info for a constituent with no diphthong pairing.
	pub const fn new(constituent: SyllableConstituentType) -> Self {
		Self {
			constituent,
			diphthong_member: false,
		}
	}

	/// Code rendered for this element: `D` for diphthong nuclei, otherwise the constituent code.
	pub fn display_code(&self) -> char {
		if self.diphthong_member && self.constituent == SyllableConstituentType::Nucleus {
			DIPHTHONG_CODE
		} else {
			self.constituent.id_char()
		}
	}
}
