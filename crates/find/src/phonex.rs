//! Phonetic patterns.
//!
//! A phonex pattern describes a sequence of phones rather than characters.
//! Every phone atom matches one base symbol together with the diacritics
//! written after it, so `t` matches both `t` and `tʰ`. Patterns compile to a
//! regular expression over the rendered IPA text of a tier.
//!
//! | syntax | matches |
//! |---|---|
//! | `ð`, `ɛ`, ... | that phone |
//! | `.` or `\w` | any phone |
//! | `\c` | any consonant |
//! | `\v` | any vowel |
//! | `[ðd]`, `[^aeiou]` | a phone from, or not from, the set |
//! | `( )` | capture group, referenced as `$1` in replacements |
//! | `\|`, `*`, `+`, `?`, `{n,m}` | alternation and quantifiers |
//! | `#` | word boundary |
//! | `^`, `$` | start and end of the tier |
//!
//! Whitespace in a pattern is ignored.

use std::iter::Peekable;
use std::str::CharIndices;

use tierline_model::ipa::{CONSONANTS, SUFFIX_DIACRITICS, VOWELS};

use crate::error::{FindError, Result};

fn is_phone_symbol(ch: char) -> bool {
	CONSONANTS.contains(ch) || VOWELS.contains(ch)
}

/// Regex fragment matching one phone whose base symbol is in `class`.
fn phone(class: &str) -> String {
	format!("(?:[{class}][\\p{{Mn}}{SUFFIX_DIACRITICS}]*)")
}

/// Translates a phonex pattern into regular expression source.
pub fn to_regex(pattern: &str) -> Result<String> {
	let mut out = String::with_capacity(pattern.len() * 4);
	let mut depth = 0usize;
	let mut quantifiable = false;
	let mut chars = pattern.char_indices().peekable();
	let any = format!("{CONSONANTS}{VOWELS}");

	while let Some((offset, ch)) = chars.next() {
		let offset = char_offset(pattern, offset);
		match ch {
			c if c.is_whitespace() => continue,
			'.' => out.push_str(&phone(&any)),
			'\\' => match chars.next() {
				Some((_, 'c')) => out.push_str(&phone(CONSONANTS)),
				Some((_, 'v')) => out.push_str(&phone(VOWELS)),
				Some((_, 'w')) => out.push_str(&phone(&any)),
				Some((_, other)) => return Err(FindError::phonex(offset, format!("unknown class '\\{other}'"))),
				None => return Err(FindError::phonex(offset, "dangling '\\'")),
			},
			'[' => out.push_str(&phone(&class(pattern, offset, &mut chars)?)),
			'(' => {
				depth += 1;
				out.push('(');
				quantifiable = false;
				continue;
			}
			')' => {
				if depth == 0 {
					return Err(FindError::phonex(offset, "unbalanced ')'"));
				}
				depth -= 1;
				out.push(')');
			}
			'|' => {
				out.push('|');
				quantifiable = false;
				continue;
			}
			'*' | '+' | '?' => {
				if !quantifiable && !(ch == '?' && out.ends_with(['*', '+', '}'])) {
					return Err(FindError::phonex(offset, format!("'{ch}' has nothing to repeat")));
				}
				out.push(ch);
				quantifiable = false;
				continue;
			}
			'{' => {
				if !quantifiable {
					return Err(FindError::phonex(offset, "'{' has nothing to repeat"));
				}
				out.push_str(&repetition(offset, &mut chars)?);
				quantifiable = false;
				continue;
			}
			'#' => {
				out.push_str("\\b");
				quantifiable = false;
				continue;
			}
			'^' | '$' => {
				out.push(ch);
				quantifiable = false;
				continue;
			}
			c if is_phone_symbol(c) => out.push_str(&phone(&c.to_string())),
			c => return Err(FindError::phonex(offset, format!("'{c}' is not a phone"))),
		}
		quantifiable = true;
	}

	if depth > 0 {
		return Err(FindError::phonex(pattern.chars().count(), "unclosed '('"));
	}
	Ok(out)
}

fn char_offset(pattern: &str, byte: usize) -> usize {
	pattern[..byte].chars().count()
}

/// Reads a `[...]` set after its opening bracket and returns the regex class body.
fn class(pattern: &str, open: usize, chars: &mut Peekable<CharIndices<'_>>) -> Result<String> {
	let negated = chars.next_if(|&(_, c)| c == '^').is_some();
	let mut members = String::new();
	loop {
		match chars.next() {
			Some((_, ']')) => break,
			Some((_, c)) if c.is_whitespace() => {}
			Some((_, c)) if is_phone_symbol(c) => members.push(c),
			Some((byte, c)) => {
				return Err(FindError::phonex(
					char_offset(pattern, byte),
					format!("'{c}' is not a phone"),
				));
			}
			None => return Err(FindError::phonex(open, "unclosed '['")),
		}
	}
	if members.is_empty() {
		return Err(FindError::phonex(open, "empty phone set"));
	}
	if !negated {
		return Ok(members);
	}
	let rest: String = CONSONANTS
		.chars()
		.chain(VOWELS.chars())
		.filter(|c| !members.contains(*c))
		.collect();
	if rest.is_empty() {
		return Err(FindError::phonex(open, "phone set excludes every phone"));
	}
	Ok(rest)
}

/// Reads a `{n}`, `{n,}` or `{n,m}` repetition after its opening brace.
fn repetition(open: usize, chars: &mut Peekable<CharIndices<'_>>) -> Result<String> {
	let mut body = String::new();
	loop {
		match chars.next() {
			Some((_, '}')) => break,
			Some((_, c)) if c.is_ascii_digit() || c == ',' => body.push(c),
			Some(_) | None => return Err(FindError::phonex(open, "malformed repetition")),
		}
	}
	let mut bounds = body.splitn(2, ',');
	let valid = match (bounds.next(), bounds.next()) {
		(Some(min), None) => !min.is_empty(),
		(Some(min), Some(max)) => !min.is_empty() && !max.contains(','),
		_ => false,
	};
	if !valid {
		return Err(FindError::phonex(open, "malformed repetition"));
	}
	Ok(format!("{{{body}}}"))
}

#[cfg(test)]
mod tests;
