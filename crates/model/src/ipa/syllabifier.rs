//! Default syllabifier.
//!
//! Vowels and syllabic consonants are nuclei. Consonants before the first
//! nucleus of a word are onsets and those after the last are codas. An
//! intervocalic run is split at an explicit syllable boundary or stress
//! marker when one is present, otherwise by maximal onset: the last
//! consonant is an onset, extended to two when the pair is an obstruent
//! followed by a liquid or glide.

use tracing::trace;

use super::inventory::{is_cluster_second, is_obstruent};
use super::{IpaElement, IpaElementKind, SyllabificationInfo, SyllableConstituentType as Sc};

pub(super) fn syllabify(elements: &mut [IpaElement]) {
	for element in elements.iter_mut() {
		let constituent = match element.kind {
			IpaElementKind::WordBoundary => Sc::WordBoundaryMarker,
			IpaElementKind::StressMarker => Sc::SyllableStressMarker,
			IpaElementKind::SyllableBoundary => Sc::SyllableBoundaryMarker,
			IpaElementKind::Pause | IpaElementKind::Consonant | IpaElementKind::Vowel => Sc::Unknown,
		};
		element.syllabification = SyllabificationInfo::new(constituent);
	}

	let mut start = 0;
	for i in 0..=elements.len() {
		let at_separator = elements.get(i).is_none_or(|e| {
			matches!(e.kind, IpaElementKind::WordBoundary | IpaElementKind::Pause)
		});
		if at_separator {
			syllabify_word(&mut elements[start..i]);
			start = i + 1;
		}
	}
	trace!(elements = elements.len(), "ipa syllabified");
}

fn syllabify_word(word: &mut [IpaElement]) {
	let nuclei: Vec<usize> = (0..word.len()).filter(|&i| word[i].is_syllabic()).collect();
	let (Some(&first), Some(&last)) = (nuclei.first(), nuclei.last()) else {
		return;
	};

	for &n in &nuclei {
		word[n].syllabification.constituent = Sc::Nucleus;
	}
	for element in word[..first].iter_mut().filter(|e| e.is_phone()) {
		element.syllabification.constituent = Sc::Onset;
	}
	for element in word[last + 1..].iter_mut().filter(|e| e.is_phone()) {
		element.syllabification.constituent = Sc::Coda;
	}
	for pair in nuclei.windows(2) {
		split_interval(word, pair[0] + 1, pair[1]);
	}
}

fn split_interval(word: &mut [IpaElement], from: usize, to: usize) {
	let boundary = (from..to).find(|&i| {
		matches!(
			word[i].kind,
			IpaElementKind::SyllableBoundary | IpaElementKind::StressMarker
		)
	});
	let consonants: Vec<usize> = (from..to).filter(|&i| word[i].is_phone()).collect();
	let n = consonants.len();

	let onset_start = match boundary {
		Some(b) => consonants.iter().position(|&i| i > b).unwrap_or(n),
		None if n >= 2 && forms_cluster(&word[consonants[n - 2]], &word[consonants[n - 1]]) => n - 2,
		None => n.saturating_sub(1),
	};

	for (k, &i) in consonants.iter().enumerate() {
		word[i].syllabification.constituent = if k < onset_start {
			Sc::Coda
		} else {
			Sc::Onset
		};
	}
}

fn forms_cluster(first: &IpaElement, second: &IpaElement) -> bool {
	first.base().is_some_and(is_obstruent) && second.base().is_some_and(is_cluster_second)
}
