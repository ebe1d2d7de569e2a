use proptest::prelude::*;

use super::*;
use crate::ipa::SyllableConstituentType as Sc;

fn codes(t: &IpaTranscript) -> String {
	t.elements()
		.iter()
		.map(|e| e.syllabification().display_code())
		.collect()
}

#[test]
fn parse_strips_slashes_and_splits_words() {
	let t = IpaTranscript::parse("/hi ðɛr/").unwrap();
	assert_eq!(t.to_string(), "hi ðɛr");
	assert_eq!(t.len(), 6);
	assert_eq!(t.elements()[2].kind(), IpaElementKind::WordBoundary);
	assert_eq!(t.phones().count(), 5);
}

#[test]
fn default_syllabification() {
	let t = IpaTranscript::parse("hi ðɛr").unwrap();
	assert_eq!(codes(&t), "ONWONC");
}

#[test]
fn maximal_onset_with_cluster() {
	let t = IpaTranscript::parse("ɛkstra").unwrap();
	// ɛ k s t r a
	assert_eq!(codes(&t), "NCCOON");
}

#[test]
fn explicit_boundary_splits_interval() {
	let t = IpaTranscript::parse("bæs.kɪt").unwrap();
	assert_eq!(codes(&t), "ONCBONC");
}

#[test]
fn diacritics_attach_to_phone() {
	let t = IpaTranscript::parse("tʰiː t͡ʃa").unwrap();
	let texts: Vec<&str> = t.elements().iter().map(IpaElement::text).collect();
	assert_eq!(texts, ["tʰ", "iː", " ", "t͡ʃ", "a"]);
}

#[test]
fn pauses_and_stress() {
	let t = IpaTranscript::parse("ˈhɛ (..) lo").unwrap();
	assert_eq!(t.elements()[0].constituent(), Sc::SyllableStressMarker);
	assert!(t.elements().iter().any(|e| e.kind() == IpaElementKind::Pause));
	assert_eq!(t.to_string(), "ˈhɛ (..) lo");
}

#[test]
fn invalid_character_reports_offset() {
	let err = IpaTranscript::parse("hi ð3r").unwrap_err();
	assert_eq!(err.offset, 4);
	let err = IpaTranscript::parse("/ab(c/").unwrap_err();
	assert_eq!(err.offset, 3);
}

#[test]
fn empty_text_is_empty_transcript() {
	let t = IpaTranscript::parse("   ").unwrap();
	assert!(t.is_empty());
}

#[test]
fn diphthong_partner_prefers_adjacent_nucleus() {
	let t = IpaTranscript::parse("hai").unwrap();
	assert_eq!(t.diphthong_partner(1), Some(2));
	assert_eq!(t.diphthong_partner(2), Some(1));
	assert_eq!(t.diphthong_partner(0), None);
}

#[test]
fn diphthong_partner_two_positions_away() {
	let t = IpaTranscript::parse("hi ðɛr").unwrap();
	assert_eq!(t.diphthong_partner(1), Some(4));
}

#[test]
fn member_partner_follows_flags() {
	let mut t = IpaTranscript::parse("hi ðɛr").unwrap();
	assert_eq!(t.member_partner(1), None);
	t.set_diphthong_member(1, true).unwrap();
	t.set_diphthong_member(4, true).unwrap();
	assert_eq!(t.member_partner(1), Some(4));
	assert_eq!(t.member_partner(4), Some(1));
}

#[test]
fn set_constituent_returns_previous() {
	let mut t = IpaTranscript::parse("pa").unwrap();
	assert_eq!(t.set_constituent(0, Sc::LeftAppendix).unwrap(), Sc::Onset);
	assert_eq!(t.elements()[0].constituent(), Sc::LeftAppendix);
	assert!(t.set_constituent(9, Sc::Onset).is_err());
}

#[test]
fn syllabify_resets_manual_edits() {
	let mut t = IpaTranscript::parse("pa").unwrap();
	t.set_diphthong_member(1, true).unwrap();
	t.set_constituent(0, Sc::Coda).unwrap();
	t.syllabify();
	assert_eq!(codes(&t), "ON");
}

#[test]
fn edit_codes() {
	for c in ['o', 'N', 'c', 'D', 'h', 'l', 'r', 'e', 'a', 'u'] {
		assert!(SyllableConstituentType::is_edit_code(c), "{c}");
	}
	for c in ['x', '1', ':', 'ʃ'] {
		assert!(!SyllableConstituentType::is_edit_code(c), "{c}");
	}
	assert_eq!(SyllableConstituentType::from_id_char('d'), Some(Sc::Nucleus));
}

proptest! {
	#[test]
	fn display_round_trips(words in proptest::collection::vec("[ptkbdgmnslrwjaeiouəɛɪʊ]{1,6}", 1..5)) {
		let text = words.join(" ");
		let t = IpaTranscript::parse(&text).unwrap();
		prop_assert_eq!(t.to_string(), text.clone());
		let again = IpaTranscript::parse(&t.to_string()).unwrap();
		prop_assert_eq!(again, t);
	}
}
