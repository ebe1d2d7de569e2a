//! Syllabification edit mode.
//!
//! A small state machine: the mode is entered on a syllable tier of one
//! record and left on cancel or when the caret moves outside the syllable
//! tiers of that record.

use tierline_model::TranscriptElementLocation;
use tierline_model::tier::ipa_tier_for_syllables;

use crate::filter::FilterMode;

/// Edit mode state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyllabificationEditState {
	/// Plain editing.
	#[default]
	Off,
	/// Typing edits codes of the syllable tiers of `element_index`.
	On {
		/// Record being edited.
		element_index: usize,
		/// Syllable tier holding the caret.
		tier: String,
	},
}

/// Outcome of a state machine input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
	/// Nothing changed.
	Unchanged,
	/// The mode was entered.
	Entered,
	/// The mode was left.
	Exited,
}

impl SyllabificationEditState {
	/// Returns true while the mode is on.
	pub fn is_active(&self) -> bool {
		matches!(self, Self::On { .. })
	}

	/// Filters in effect for this state.
	pub fn filter_mode(&self) -> FilterMode {
		match self {
			Self::Off => FilterMode::Default,
			Self::On { .. } => FilterMode::SyllabificationEdit,
		}
	}

	/// Record being edited, if the mode is on.
	pub fn element_index(&self) -> Option<usize> {
		match self {
			Self::Off => None,
			Self::On { element_index, .. } => Some(*element_index),
		}
	}

	/// Enters the mode if `caret` is on a syllable tier.
	pub fn enter(&mut self, caret: Option<&TranscriptElementLocation>) -> ModeTransition {
		match caret {
			Some(loc) if !self.is_active() && is_syllable_tier(&loc.tier) => {
				*self = Self::On {
					element_index: loc.element_index,
					tier: loc.tier.clone(),
				};
				ModeTransition::Entered
			}
			_ => ModeTransition::Unchanged,
		}
	}

	/// Leaves the mode.
	pub fn cancel(&mut self) -> ModeTransition {
		if std::mem::take(self).is_active() {
			ModeTransition::Exited
		} else {
			ModeTransition::Unchanged
		}
	}

	/// Follows the caret, leaving the mode when it exits the edited tiers.
	pub fn caret_moved(&mut self, caret: Option<&TranscriptElementLocation>) -> ModeTransition {
		let Self::On { element_index, tier } = self else {
			return ModeTransition::Unchanged;
		};
		match caret {
			Some(loc) if loc.element_index == *element_index && is_syllable_tier(&loc.tier) => {
				if *tier != loc.tier {
					*tier = loc.tier.clone();
				}
				ModeTransition::Unchanged
			}
			_ => self.cancel(),
		}
	}
}

fn is_syllable_tier(tier: &str) -> bool {
	ipa_tier_for_syllables(tier).is_some()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn loc(element: usize, tier: &str) -> TranscriptElementLocation {
		TranscriptElementLocation::new(element, tier, 0)
	}

	#[test]
	fn enters_only_on_syllable_tiers() {
		let mut state = SyllabificationEditState::default();
		assert_eq!(state.enter(Some(&loc(0, "IPA Target"))), ModeTransition::Unchanged);
		assert_eq!(state.enter(None), ModeTransition::Unchanged);
		assert_eq!(state.enter(Some(&loc(0, "Target Syllables"))), ModeTransition::Entered);
		assert_eq!(state.filter_mode(), FilterMode::SyllabificationEdit);
		assert_eq!(state.enter(Some(&loc(0, "Actual Syllables"))), ModeTransition::Unchanged);
	}

	#[test]
	fn caret_motion_within_record_syllables_keeps_mode() {
		let mut state = SyllabificationEditState::default();
		state.enter(Some(&loc(2, "Target Syllables")));
		assert_eq!(state.caret_moved(Some(&loc(2, "Actual Syllables"))), ModeTransition::Unchanged);
		assert_eq!(
			state,
			SyllabificationEditState::On {
				element_index: 2,
				tier: "Actual Syllables".into()
			}
		);
	}

	#[test]
	fn leaving_exits() {
		for to in [Some(loc(2, "IPA Target")), Some(loc(3, "Target Syllables")), None] {
			let mut state = SyllabificationEditState::default();
			state.enter(Some(&loc(2, "Target Syllables")));
			assert_eq!(state.caret_moved(to.as_ref()), ModeTransition::Exited);
			assert!(!state.is_active());
			assert_eq!(state.filter_mode(), FilterMode::Default);
		}
	}

	#[test]
	fn cancel() {
		let mut state = SyllabificationEditState::default();
		assert_eq!(state.cancel(), ModeTransition::Unchanged);
		state.enter(Some(&loc(0, "Target Syllables")));
		assert_eq!(state.element_index(), Some(0));
		assert_eq!(state.cancel(), ModeTransition::Exited);
	}
}
