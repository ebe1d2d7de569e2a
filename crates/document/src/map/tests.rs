use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tierline_model::ElementId;

use super::*;
use crate::span::SpanKind;

fn line(id: ElementId, element: usize, tier: &str, content: &[&str]) -> Vec<Span> {
	let attrs = |kind| SpanAttrs::new(id, element, tier, kind);
	let mut spans = vec![Span::new(format!("{tier}\t"), attrs(SpanKind::Label))];
	spans.extend(content.iter().map(|c| Span::new(*c, attrs(SpanKind::Content))));
	spans.push(Span::new("\n", attrs(SpanKind::LineEnd)));
	spans
}

/// `A\thi there\nB\t\n` for element 0 and `C\tok\n` for element 1.
fn map() -> PositionMap {
	let (a, b) = (ElementId::new(), ElementId::new());
	let mut spans = line(a, 0, "A", &["hi", " ", "there"]);
	spans.extend(line(a, 0, "B", &[""]));
	spans.extend(line(b, 1, "C", &["ok"]));
	spans.into_iter().collect()
}

#[test]
fn locations_inside_content() {
	let map = map();
	assert_eq!(map.len_chars(), 19);
	assert_eq!(map.location_at_offset(0), None);
	assert_eq!(map.location_at_offset(2), Some(TranscriptElementLocation::new(0, "A", 0)));
	assert_eq!(map.location_at_offset(5), Some(TranscriptElementLocation::new(0, "A", 3)));
	assert_eq!(map.location_at_offset(10), Some(TranscriptElementLocation::new(0, "A", 8)));
	assert_eq!(map.location_at_offset(11), None);
}

#[test]
fn empty_content_is_addressable() {
	let map = map();
	assert_eq!(map.location_at_offset(13), Some(TranscriptElementLocation::new(0, "B", 0)));
	assert_eq!(map.offset_at_location(&TranscriptElementLocation::new(0, "B", 0)), Some(13));
	assert_eq!(map.offset_at_location(&TranscriptElementLocation::new(0, "B", 1)), None);
}

#[test]
fn content_start_wins_over_previous_end() {
	let map = map();
	let runs = map.runs();
	let at = runs[2].start;
	assert_eq!(map.content_run_at(at), Some(2));
	assert_eq!(map.content_run_at(runs[1].end()), Some(2));
}

#[test]
fn element_and_tier_runs() {
	let map = map();
	assert_eq!(map.element_runs(0), Some(0..8));
	assert_eq!(map.element_runs(1), Some(8..11));
	assert_eq!(map.element_runs(2), None);
	assert_eq!(map.tier_runs(0, "B"), Some(5..8));
	assert_eq!(map.content_runs(0, "A"), Some(1..4));
	assert_eq!(map.content_range(1, "C"), Some(16..18));
}

#[test]
fn resize_shifts_following_runs() {
	let mut map = map();
	map.resize_content(1..4, 2);
	assert_eq!(map.content_runs(0, "A"), Some(1..2));
	assert_eq!(map.location_at_offset(10), Some(TranscriptElementLocation::new(1, "C", 0)));
	assert_eq!(map.len_chars(), 13);
}

#[test]
fn replace_and_renumber() {
	let mut map = map();
	let id = ElementId::new();
	let at = map.insertion_point(1);
	map.renumber(1, 1);
	let replaced = map.replace_runs(at..at, line(id, 1, "D", &["new"]));
	assert_eq!(replaced, 14..14);
	assert_eq!(map.content_range(1, "D"), Some(16..19));
	assert_eq!(map.content_range(2, "C"), Some(22..24));

	let runs = map.element_runs(1).unwrap();
	assert_eq!(map.replace_runs(runs, Vec::new()), 14..20);
	map.renumber(2, -1);
	assert_eq!(map.content_range(1, "C"), Some(16..18));
	assert_eq!(map.element_runs(2), None);
	assert_eq!(map.len_chars(), 19);
}

proptest! {
	#[test]
	fn offset_location_inverse(words in proptest::collection::vec("[a-z]{0,4}", 1..6)) {
		let id = ElementId::new();
		let mut spans = Vec::new();
		for (i, word) in words.iter().enumerate() {
			spans.extend(line(id, 0, &format!("T{i}"), &[word.as_str()]));
		}
		let map: PositionMap = spans.into_iter().collect();
		for offset in 0..=map.len_chars() {
			if let Some(loc) = map.location_at_offset(offset) {
				prop_assert_eq!(map.offset_at_location(&loc), Some(offset));
			}
		}
	}
}
