//! Symbol classes recognized by the IPA parser.

use super::IpaElementKind;

/// Vowel base symbols.
pub const VOWELS: &str = "iyɨʉɯuɪʏʊeøɘɵɤoəɛœɜɞʌɔæɐaɶɑɒɚɝᵻᵿ";

/// Consonant base symbols.
pub const CONSONANTS: &str = concat!(
	"pbtdʈɖcɟkɡgqɢʔʡ",
	"mɱnɳɲŋɴ",
	"ʙrʀⱱɾɽ",
	"ɸβfvθðszʃʒʂʐçʝxɣχʁħʕhɦʜʢɕʑɧ",
	"ɬɮʋɹɻjɰlɭʎʟɺ",
	"ʍwɥ",
	"ɓɗʄɠʛʘǀǃǂǁ",
);

/// Modifier letters written after a phone and belonging to it.
pub const SUFFIX_DIACRITICS: &str = "ːˑʰʱʷʲˠˤⁿˡʼ˞ᵊ";

/// Returns the element kind for a base symbol.
pub(super) fn classify(ch: char) -> Option<IpaElementKind> {
	if VOWELS.contains(ch) {
		Some(IpaElementKind::Vowel)
	} else if CONSONANTS.contains(ch) {
		Some(IpaElementKind::Consonant)
	} else {
		None
	}
}

pub(super) fn is_stress(ch: char) -> bool {
	matches!(ch, 'ˈ' | 'ˌ')
}

pub(super) fn is_suffix_diacritic(ch: char) -> bool {
	SUFFIX_DIACRITICS.contains(ch)
}

pub(super) fn is_tie_bar(ch: char) -> bool {
	matches!(ch, '\u{0361}' | '\u{035C}')
}

/// Combining marks that make a consonant syllabic.
pub(super) fn is_syllabic_mark(ch: char) -> bool {
	matches!(ch, '\u{0329}' | '\u{030D}')
}

/// Liquids and glides that may follow an obstruent inside an onset cluster.
pub(super) fn is_cluster_second(ch: char) -> bool {
	"lrɹɾʁjwɥʎ".contains(ch)
}

/// Stops and fricatives that may start a two-consonant onset.
pub(super) fn is_obstruent(ch: char) -> bool {
	"pbtdʈɖcɟkɡgqɢfvθðszʃʒʂʐçʝxɣχɸβ".contains(ch)
}
