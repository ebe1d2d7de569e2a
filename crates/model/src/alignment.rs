use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ipa::{IpaElement, IpaTranscript};

const INDEL: u32 = 2;
const SAME_CLASS: u32 = 1;
const CROSS_CLASS: u32 = 5;

/// A phone referenced from an aligned pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRef {
	/// Element index within the source transcript.
	pub index: usize,
	/// Phone text.
	pub text: String,
}

/// One column of a phone alignment. At least one side is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
	/// Target phone, or [`None`] for an insertion in the actual form.
	pub target: Option<PhoneRef>,
	/// Actual phone, or [`None`] for a deletion.
	pub actual: Option<PhoneRef>,
}

/// Alignment of IPA Target phones against IPA Actual phones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneAlignment {
	pairs: Vec<AlignedPair>,
}

impl PhoneAlignment {
	/// Symbol rendered for a missing side.
	pub const GAP: &'static str = "∅";

	/// Computes the minimum-cost alignment of the phones of two transcripts.
	///
	/// Identical phones cost nothing, substitutions within the same class
	/// (consonant/vowel) are cheap, and cross-class substitutions cost more
	/// than a deletion plus an insertion so they never occur.
	pub fn from_transcripts(target: &IpaTranscript, actual: &IpaTranscript) -> Self {
		let t: Vec<(usize, &IpaElement)> = target.phones().collect();
		let a: Vec<(usize, &IpaElement)> = actual.phones().collect();
		let (n, m) = (t.len(), a.len());

		let mut cost = vec![vec![0u32; m + 1]; n + 1];
		for (i, row) in cost.iter_mut().enumerate() {
			row[0] = i as u32 * INDEL;
		}
		for j in 0..=m {
			cost[0][j] = j as u32 * INDEL;
		}
		for i in 1..=n {
			for j in 1..=m {
				let sub = cost[i - 1][j - 1] + substitution(t[i - 1].1, a[j - 1].1);
				let del = cost[i - 1][j] + INDEL;
				let ins = cost[i][j - 1] + INDEL;
				cost[i][j] = sub.min(del).min(ins);
			}
		}

		let mut pairs = Vec::with_capacity(n.max(m));
		let (mut i, mut j) = (n, m);
		while i > 0 || j > 0 {
			let target_ref = |k: usize| PhoneRef {
				index: t[k].0,
				text: t[k].1.text().to_owned(),
			};
			let actual_ref = |k: usize| PhoneRef {
				index: a[k].0,
				text: a[k].1.text().to_owned(),
			};
			if i > 0
				&& j > 0 && cost[i][j] == cost[i - 1][j - 1] + substitution(t[i - 1].1, a[j - 1].1)
			{
				pairs.push(AlignedPair {
					target: Some(target_ref(i - 1)),
					actual: Some(actual_ref(j - 1)),
				});
				i -= 1;
				j -= 1;
			} else if j > 0 && cost[i][j] == cost[i][j - 1] + INDEL {
				pairs.push(AlignedPair {
					target: None,
					actual: Some(actual_ref(j - 1)),
				});
				j -= 1;
			} else {
				pairs.push(AlignedPair {
					target: Some(target_ref(i - 1)),
					actual: None,
				});
				i -= 1;
			}
		}
		pairs.reverse();
		Self { pairs }
	}

	/// Aligned columns in order.
	pub fn pairs(&self) -> &[AlignedPair] {
		&self.pairs
	}

	/// Returns true if nothing is aligned.
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Target element aligned with the actual element at `actual_index`.
	pub fn target_for(&self, actual_index: usize) -> Option<usize> {
		self.pairs
			.iter()
			.find(|p| p.actual.as_ref().is_some_and(|r| r.index == actual_index))
			.and_then(|p| p.target.as_ref().map(|r| r.index))
	}
}

fn substitution(target: &IpaElement, actual: &IpaElement) -> u32 {
	if target.base() == actual.base() {
		0
	} else if target.kind() == actual.kind() {
		SAME_CLASS
	} else {
		CROSS_CLASS
	}
}

impl fmt::Display for PhoneAlignment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, pair) in self.pairs.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			let side = |r: &Option<PhoneRef>| r.as_ref().map_or(Self::GAP, |r| r.text.as_str()).to_owned();
			write!(f, "{}↔{}", side(&pair.target), side(&pair.actual))?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn align(target: &str, actual: &str) -> String {
		PhoneAlignment::from_transcripts(
			&IpaTranscript::parse(target).unwrap(),
			&IpaTranscript::parse(actual).unwrap(),
		)
		.to_string()
	}

	#[test]
	fn identical_forms_align_one_to_one() {
		assert_eq!(align("hi", "hi"), "h↔h i↔i");
	}

	#[test]
	fn substitution_and_deletion() {
		assert_eq!(align("hi ðɛr", "hi dɛ"), "h↔h i↔i ð↔d ɛ↔ɛ r↔∅");
	}

	#[test]
	fn vowels_never_align_with_consonants() {
		assert_eq!(align("a", "t"), "a↔∅ ∅↔t");
	}

	#[test]
	fn empty_sides() {
		assert_eq!(align("", "ba"), "∅↔b ∅↔a");
		assert!(PhoneAlignment::from_transcripts(&IpaTranscript::default(), &IpaTranscript::default()).is_empty());
	}

	#[test]
	fn target_for_maps_indices() {
		let target = IpaTranscript::parse("hi ðɛr").unwrap();
		let actual = IpaTranscript::parse("hi dɛ").unwrap();
		let pm = PhoneAlignment::from_transcripts(&target, &actual);
		assert_eq!(pm.target_for(3), Some(3));
		assert_eq!(pm.target_for(2), None);
	}
}
