use strum::{EnumIter, IntoEnumIterator};

use super::TierType;

/// Built-in tiers present on every record.
///
/// The two syllable tiers are virtual: they are views over the
/// syllabification stored in the corresponding IPA tier and are never
/// declared in the tier view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SystemTier {
	Orthography,
	IpaTarget,
	TargetSyllables,
	IpaActual,
	ActualSyllables,
	Alignment,
	Segment,
	Notes,
}

impl SystemTier {
	/// Tier name as shown in the tier view.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Orthography => "Orthography",
			Self::IpaTarget => "IPA Target",
			Self::TargetSyllables => "Target Syllables",
			Self::IpaActual => "IPA Actual",
			Self::ActualSyllables => "Actual Syllables",
			Self::Alignment => "Alignment",
			Self::Segment => "Segment",
			Self::Notes => "Notes",
		}
	}

	/// Dependent tier name used when chat-style labels are enabled.
	pub const fn chat_name(self) -> &'static str {
		match self {
			Self::Orthography => "*",
			Self::IpaTarget => "%xpho",
			Self::TargetSyllables => "%xsyl",
			Self::IpaActual => "%pho",
			Self::ActualSyllables => "%syl",
			Self::Alignment => "%xpal",
			Self::Segment => "%seg",
			Self::Notes => "%com",
		}
	}

	/// Resolves a tier name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::iter().find(|t| t.name() == name)
	}

	/// Value type held by this tier.
	pub const fn tier_type(self) -> TierType {
		match self {
			Self::Orthography => TierType::Orthography,
			Self::IpaTarget | Self::IpaActual | Self::TargetSyllables | Self::ActualSyllables => {
				TierType::Ipa
			}
			Self::Alignment => TierType::Alignment,
			Self::Segment => TierType::Segment,
			Self::Notes => TierType::Text,
		}
	}

	/// Returns true for tiers derived from another tier instead of stored.
	pub const fn is_virtual(self) -> bool {
		matches!(self, Self::TargetSyllables | Self::ActualSyllables)
	}

	/// Tiers stored on every record, in default tier-view order.
	pub fn stored() -> impl Iterator<Item = Self> {
		[
			Self::Orthography,
			Self::IpaTarget,
			Self::IpaActual,
			Self::Alignment,
			Self::Segment,
			Self::Notes,
		]
		.into_iter()
	}
}

/// Name of the syllabification view derived from an IPA tier.
///
/// `IPA Target` and `IPA Actual` map to their system syllable tiers; any other
/// IPA tier `X` maps to `X Syllables`.
pub fn syllable_tier_for(ipa_tier: &str) -> String {
	match SystemTier::from_name(ipa_tier) {
		Some(SystemTier::IpaTarget) => SystemTier::TargetSyllables.name().to_owned(),
		Some(SystemTier::IpaActual) => SystemTier::ActualSyllables.name().to_owned(),
		_ => format!("{ipa_tier} Syllables"),
	}
}

/// Inverse of [`syllable_tier_for`].
pub fn ipa_tier_for_syllables(syllable_tier: &str) -> Option<String> {
	match SystemTier::from_name(syllable_tier) {
		Some(SystemTier::TargetSyllables) => Some(SystemTier::IpaTarget.name().to_owned()),
		Some(SystemTier::ActualSyllables) => Some(SystemTier::IpaActual.name().to_owned()),
		_ => syllable_tier
			.strip_suffix(" Syllables")
			.filter(|s| !s.is_empty())
			.map(str::to_owned),
	}
}
