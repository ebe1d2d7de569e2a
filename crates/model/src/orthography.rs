use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Orthographic transcription of an utterance.
///
/// Stored as whitespace separated words. Group delimiters (`<>`, `[]`,
/// `()`, `{}`) must be balanced and properly nested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orthography {
	words: Vec<String>,
}

impl Orthography {
	/// Parses orthography text.
	pub fn parse(text: &str) -> Result<Self, ParseError> {
		let mut stack: Vec<(char, usize)> = Vec::new();
		for (offset, ch) in text.chars().enumerate() {
			match ch {
				'<' | '[' | '(' | '{' => stack.push((ch, offset)),
				'>' | ']' | ')' | '}' => {
					let open = match ch {
						'>' => '<',
						']' => '[',
						')' => '(',
						_ => '{',
					};
					match stack.pop() {
						Some((c, _)) if c == open => {}
						_ => return Err(ParseError::new(format!("unmatched '{ch}'"), offset)),
					}
				}
				'\n' | '\r' | '\t' => {
					return Err(ParseError::new("control character in orthography", offset));
				}
				_ => {}
			}
		}
		if let Some((ch, offset)) = stack.pop() {
			return Err(ParseError::new(format!("unclosed '{ch}'"), offset));
		}

		Ok(Self {
			words: text.split_whitespace().map(str::to_owned).collect(),
		})
	}

	/// Returns the words in order.
	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Returns true if there are no words.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}

impl fmt::Display for Orthography {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.words.join(" "))
	}
}
