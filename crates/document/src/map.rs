//! Offset to span lookup.
//!
//! The [`PositionMap`] mirrors the buffer as an ordered list of [`Run`]s,
//! one per rendered span. Runs are sorted by offset and grouped by element
//! index, so both offset and element lookups are binary searches.

use std::ops::Range;

use tierline_model::TranscriptElementLocation;

use crate::span::{Span, SpanAttrs};

/// A span placed in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
	/// Offset of the first character.
	pub start: usize,
	/// Length in characters.
	pub len: usize,
	/// Span attributes.
	pub attrs: SpanAttrs,
}

impl Run {
	/// Offset one past the last character.
	pub fn end(&self) -> usize {
		self.start + self.len
	}
}

/// Buffer runs in offset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
	runs: Vec<Run>,
}

impl PositionMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// All runs.
	pub fn runs(&self) -> &[Run] {
		&self.runs
	}

	/// Total length in characters.
	pub fn len_chars(&self) -> usize {
		self.runs.last().map_or(0, Run::end)
	}

	/// Returns true if nothing is rendered.
	pub fn is_empty(&self) -> bool {
		self.runs.is_empty()
	}

	/// Index of the content run addressing `offset`.
	///
	/// A content run starting at `offset` wins over one containing it, which
	/// wins over one ending at it. Labels and line ends never match.
	pub fn content_run_at(&self, offset: usize) -> Option<usize> {
		let first = self.runs.partition_point(|r| r.end() < offset);
		let mut containing = None;
		let mut ending = None;
		for (i, run) in self.runs.iter().enumerate().skip(first) {
			if run.start > offset {
				break;
			}
			if !run.attrs.is_content() {
				continue;
			}
			if run.start == offset {
				return Some(i);
			}
			if offset < run.end() {
				containing.get_or_insert(i);
			} else {
				ending.get_or_insert(i);
			}
		}
		containing.or(ending)
	}

	/// Semantic location of `offset`, if it falls inside tier content.
	pub fn location_at_offset(&self, offset: usize) -> Option<TranscriptElementLocation> {
		let run = &self.runs[self.content_run_at(offset)?];
		let content = self.content_runs(run.attrs.element_index, &run.attrs.tier)?;
		let start = self.runs[content.start].start;
		Some(TranscriptElementLocation::new(
			run.attrs.element_index,
			run.attrs.tier.clone(),
			offset - start,
		))
	}

	/// Buffer offset of `loc`, if its tier is rendered and long enough.
	pub fn offset_at_location(&self, loc: &TranscriptElementLocation) -> Option<usize> {
		let range = self.content_range(loc.element_index, &loc.tier)?;
		let offset = range.start + loc.char_position;
		(offset <= range.end).then_some(offset)
	}

	/// Run indices of the element at `element_index`.
	pub fn element_runs(&self, element_index: usize) -> Option<Range<usize>> {
		let start = self.runs.partition_point(|r| r.attrs.element_index < element_index);
		let end = self.runs.partition_point(|r| r.attrs.element_index <= element_index);
		(start < end).then_some(start..end)
	}

	/// Run indices of the line of `tier` on element `element_index`.
	pub fn tier_runs(&self, element_index: usize, tier: &str) -> Option<Range<usize>> {
		let element = self.element_runs(element_index)?;
		let runs = &self.runs[element.clone()];
		let first = runs.iter().position(|r| r.attrs.tier == tier)?;
		let len = runs[first..]
			.iter()
			.take_while(|r| r.attrs.tier == tier)
			.count();
		Some(element.start + first..element.start + first + len)
	}

	/// Run indices of the content of `tier` on element `element_index`.
	pub fn content_runs(&self, element_index: usize, tier: &str) -> Option<Range<usize>> {
		let line = self.tier_runs(element_index, tier)?;
		let runs = &self.runs[line.clone()];
		let first = runs.iter().position(|r| r.attrs.is_content())?;
		let len = runs[first..]
			.iter()
			.take_while(|r| r.attrs.is_content())
			.count();
		Some(line.start + first..line.start + first + len)
	}

	/// Character range covered by run indices `runs`.
	pub fn char_range(&self, runs: Range<usize>) -> Range<usize> {
		match (self.runs.get(runs.start), runs.end.checked_sub(1).and_then(|i| self.runs.get(i))) {
			(Some(first), Some(last)) if runs.start < runs.end => first.start..last.end(),
			_ => {
				let at = self.runs.get(runs.start).map_or(self.len_chars(), |r| r.start);
				at..at
			}
		}
	}

	/// Character range of the content of `tier` on element `element_index`.
	pub fn content_range(&self, element_index: usize, tier: &str) -> Option<Range<usize>> {
		self.content_runs(element_index, tier)
			.map(|runs| self.char_range(runs))
	}

	/// Run index where runs of `element_index` begin or would be inserted.
	pub fn insertion_point(&self, element_index: usize) -> usize {
		self.runs.partition_point(|r| r.attrs.element_index < element_index)
	}

	/// Replaces run indices `runs` with `spans`, shifting the runs after them.
	///
	/// Returns the character range replaced, before the change.
	pub fn replace_runs(&mut self, runs: Range<usize>, spans: Vec<Span>) -> Range<usize> {
		let old = self.char_range(runs.clone());
		let mut at = old.start;
		let new: Vec<Run> = spans
			.into_iter()
			.map(|span| {
				let run = Run {
					start: at,
					len: span.char_len(),
					attrs: span.attrs,
				};
				at += run.len;
				run
			})
			.collect();
		let new_len = at - old.start;
		let count = new.len();
		self.runs.splice(runs.clone(), new);
		self.shift(runs.start + count, old.len(), new_len);
		old
	}

	/// Collapses content runs `runs` into their first run with length `len`.
	pub fn resize_content(&mut self, runs: Range<usize>, len: usize) {
		if runs.is_empty() {
			return;
		}
		let old = self.char_range(runs.clone());
		self.runs[runs.start].len = len;
		self.runs.drain(runs.start + 1..runs.end);
		self.shift(runs.start + 1, old.len(), len);
	}

	/// Adds `delta` to the element index of every run at or after `from_element`.
	pub fn renumber(&mut self, from_element: usize, delta: isize) {
		let first = self.insertion_point(from_element);
		for run in &mut self.runs[first..] {
			run.attrs.element_index = run.attrs.element_index.saturating_add_signed(delta);
		}
	}

	fn shift(&mut self, from_run: usize, old_len: usize, new_len: usize) {
		if old_len == new_len {
			return;
		}
		for run in &mut self.runs[from_run..] {
			run.start = run.start + new_len - old_len;
		}
	}
}

impl FromIterator<Span> for PositionMap {
	fn from_iter<I: IntoIterator<Item = Span>>(spans: I) -> Self {
		let mut map = Self::new();
		map.replace_runs(0..0, spans.into_iter().collect());
		map
	}
}

#[cfg(test)]
mod tests;
