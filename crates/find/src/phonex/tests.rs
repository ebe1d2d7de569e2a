use pretty_assertions::assert_eq;
use regex::Regex;

use super::*;

fn matches(pattern: &str, text: &str) -> Vec<String> {
	let re = Regex::new(&to_regex(pattern).unwrap()).unwrap();
	re.find_iter(text).map(|m| m.as_str().to_owned()).collect()
}

fn error_offset(pattern: &str) -> usize {
	match to_regex(pattern) {
		Err(FindError::Phonex { offset, .. }) => offset,
		other => panic!("expected a phonex error for {pattern:?}, got {other:?}"),
	}
}

#[test]
fn consonant_vowel_sequences() {
	assert_eq!(matches("\\c\\v", "hi ðɛr"), ["hi", "ðɛ"]);
	assert_eq!(matches("\\v\\c", "hi ðɛr"), ["ɛr"]);
}

#[test]
fn phones_carry_their_diacritics() {
	assert_eq!(matches("t", "tʰa"), ["tʰ"]);
	assert_eq!(matches("t\\v", "tʰaː"), ["tʰaː"]);
}

#[test]
fn word_boundaries() {
	assert_eq!(matches("#\\c", "hi ðɛr"), ["h", "ð"]);
	assert_eq!(matches("\\c#", "hi ðɛr"), ["r"]);
}

#[test]
fn phone_sets() {
	assert_eq!(matches("[ðd]ɛ", "hi ðɛr dɛ"), ["ðɛ", "dɛ"]);
	assert_eq!(matches("[^h]i", "hi bi"), ["bi"]);
}

#[test]
fn groups_and_quantifiers() {
	assert_eq!(matches("(\\c)+\\v", "strɛ"), ["strɛ"]);
	assert_eq!(matches("\\c{2}\\v", "strɛ"), ["trɛ"]);
	assert_eq!(matches("(h|ð)\\v", "hi ðɛr"), ["hi", "ðɛ"]);
	assert_eq!(matches("\\c\\v?", "hr"), ["h", "r"]);
}

#[test]
fn whitespace_is_ignored() {
	assert_eq!(matches("\\c \\v", "hi"), ["hi"]);
}

#[test]
fn malformed_patterns_report_offsets() {
	assert_eq!(error_offset("h\\q"), 1);
	assert_eq!(error_offset("hi)"), 2);
	assert_eq!(error_offset("(hi"), 3);
	assert_eq!(error_offset("[hi"), 0);
	assert_eq!(error_offset("[]"), 0);
	assert_eq!(error_offset("*h"), 0);
	assert_eq!(error_offset("h{x}"), 1);
	assert_eq!(error_offset("h1"), 1);
	assert_eq!(error_offset("[h1]"), 2);
}
