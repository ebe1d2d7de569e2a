//! Search expressions and their compiled form.

use regex::{Regex, RegexBuilder};
use strum::{Display, EnumIter, EnumString};
use tierline_model::TierType;

use crate::error::Result;
use crate::phonex;

/// How the pattern of a [`FindExpr`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SearchType {
	/// Literal text.
	#[default]
	Plain,
	/// Regular expression.
	Regex,
	/// Phonetic pattern over IPA tiers.
	Phonex,
}

/// A search pattern with its options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindExpr {
	pub pattern: String,
	pub search_type: SearchType,
	pub case_sensitive: bool,
}

impl FindExpr {
	pub fn new(pattern: impl Into<String>, search_type: SearchType) -> Self {
		Self {
			pattern: pattern.into(),
			search_type,
			case_sensitive: false,
		}
	}

	pub fn plain(pattern: impl Into<String>) -> Self {
		Self::new(pattern, SearchType::Plain)
	}

	pub fn regex(pattern: impl Into<String>) -> Self {
		Self::new(pattern, SearchType::Regex)
	}

	pub fn phonex(pattern: impl Into<String>) -> Self {
		Self::new(pattern, SearchType::Phonex)
	}

	/// Builder-style case sensitivity.
	pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
		self.case_sensitive = case_sensitive;
		self
	}

	/// Compiles the pattern. Phonex patterns are always case sensitive.
	pub fn compile(&self) -> Result<CompiledExpr> {
		let (source, case_sensitive) = match self.search_type {
			SearchType::Plain => (regex::escape(&self.pattern), self.case_sensitive),
			SearchType::Regex => (self.pattern.clone(), self.case_sensitive),
			SearchType::Phonex => (phonex::to_regex(&self.pattern)?, true),
		};
		let regex = RegexBuilder::new(&source)
			.case_insensitive(!case_sensitive)
			.build()?;
		Ok(CompiledExpr {
			search_type: self.search_type,
			regex,
		})
	}
}

/// A compiled [`FindExpr`].
#[derive(Debug, Clone)]
pub struct CompiledExpr {
	search_type: SearchType,
	regex: Regex,
}

impl CompiledExpr {
	pub fn search_type(&self) -> SearchType {
		self.search_type
	}

	/// Returns true if tiers of `tier_type` can be searched with this expression.
	///
	/// Phonex only runs against IPA tiers.
	pub fn applies_to(&self, tier_type: TierType) -> bool {
		self.search_type != SearchType::Phonex || tier_type == TierType::Ipa
	}

	/// Every non-empty, non-overlapping match in `text`, in order.
	pub fn find_all(&self, text: &str) -> Vec<TextMatch> {
		let mut out = Vec::new();
		for caps in self.regex.captures_iter(text) {
			let Some(whole) = caps.get(0) else { continue };
			if whole.is_empty() {
				continue;
			}
			let start = text[..whole.start()].chars().count();
			let len = whole.as_str().chars().count();
			let groups = caps
				.iter()
				.skip(1)
				.map(|g| g.map(|m| m.as_str().to_owned()))
				.collect();
			out.push(TextMatch {
				range: start..start + len,
				text: whole.as_str().to_owned(),
				groups,
			});
		}
		out
	}
}

/// One match inside a tier's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
	/// Character range of the match.
	pub range: std::ops::Range<usize>,
	/// Matched text.
	pub text: String,
	/// Capture groups, starting at group 1.
	pub groups: Vec<Option<String>>,
}

impl TextMatch {
	/// Expands `$0`-`$9`, `${n}` and `$$` in `replacement`.
	///
	/// References to missing groups expand to nothing.
	pub fn expand(&self, replacement: &str) -> String {
		expand(&self.text, &self.groups, replacement)
	}
}

pub(crate) fn expand(whole: &str, groups: &[Option<String>], replacement: &str) -> String {
	let group = |n: usize| group_text(whole, groups, n);
	let mut out = String::with_capacity(replacement.len());
	let mut chars = replacement.chars().peekable();
	while let Some(ch) = chars.next() {
		if ch != '$' {
			out.push(ch);
			continue;
		}
		match chars.peek().copied() {
			Some('$') => {
				chars.next();
				out.push('$');
			}
			Some(d) if d.is_ascii_digit() => {
				chars.next();
				out.push_str(group(d as usize - '0' as usize));
			}
			Some('{') => {
				let rest: String = chars.clone().skip(1).take_while(|c| *c != '}').collect();
				let closed = chars.clone().nth(1 + rest.chars().count()) == Some('}');
				match rest.parse::<usize>() {
					Ok(n) if closed => {
						for _ in 0..rest.chars().count() + 2 {
							chars.next();
						}
						out.push_str(group(n));
					}
					_ => out.push('$'),
				}
			}
			_ => out.push('$'),
		}
	}
	out
}

fn group_text<'a>(whole: &'a str, groups: &'a [Option<String>], n: usize) -> &'a str {
	match n {
		0 => whole,
		n => groups.get(n - 1).and_then(|g| g.as_deref()).unwrap_or(""),
	}
}
