//! The linear transcript document.
//!
//! [`TranscriptDocument`] renders a session into one text buffer and keeps
//! the two in step. The session is never owned here: every operation takes
//! it by reference and returns a [`DocumentOutcome`] listing the session
//! edits and events the caller must post and fire. Buffer rewrites are
//! scoped to the smallest unit that changed: a tier line, an element, or
//! as a last resort the whole buffer.

mod editing;
mod events;

use std::fmt;
use std::ops::Range;

use rustc_hash::FxHashMap;
use tierline_edit::{EditorEvent, SessionEdit};
use tierline_model::{ElementId, Session, TranscriptElementLocation};
use tierline_primitives::{ChangeSet, Rope};
use tracing::{debug, trace, warn};

use crate::error::{DocumentError, Result};
use crate::extension::DerivedTier;
use crate::filter::RejectReason;
use crate::format::{BatchContext, FormatOptions};
use crate::freeze::CaretFreeze;
use crate::map::PositionMap;
use crate::mode::SyllabificationEditState;
use crate::span::{Batch, Span};

/// Document behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
	/// Label and content formatting.
	pub format: FormatOptions,
	/// Render only the current record and its neighbouring comments and gems.
	pub single_record_view: bool,
	/// Post a transient tier edit for every accepted keystroke.
	pub live_updates: bool,
	/// Report tier text that fails to parse on commit.
	pub report_validation_errors: bool,
}

impl Default for DocumentOptions {
	fn default() -> Self {
		Self {
			format: FormatOptions::default(),
			single_record_view: false,
			live_updates: true,
			report_validation_errors: false,
		}
	}
}

/// Tier text that was committed unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
	/// Location of the offending character.
	pub location: TranscriptElementLocation,
	/// Committed text.
	pub text: String,
	/// Parser message.
	pub message: String,
}

/// Work produced by a document operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[must_use]
pub struct DocumentOutcome {
	/// Session edits to post, in order.
	pub edits: Vec<SessionEdit>,
	/// Events to fire after the edits.
	pub events: Vec<EditorEvent>,
	/// Validation diagnostics for committed text.
	pub diagnostics: Vec<ValidationDiagnostic>,
	/// Set when an edit request was refused.
	pub rejected: Option<RejectReason>,
}

impl DocumentOutcome {
	/// Returns true if the outcome carries no work.
	pub fn is_empty(&self) -> bool {
		self.edits.is_empty() && self.events.is_empty() && self.diagnostics.is_empty()
	}

	/// Appends the work of `other`.
	pub fn merge(&mut self, other: DocumentOutcome) {
		self.edits.extend(other.edits);
		self.events.extend(other.events);
		self.diagnostics.extend(other.diagnostics);
		self.rejected = self.rejected.or(other.rejected);
	}
}

/// Spans rendered for an element, stamped with the version they were built against.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
	element_index: usize,
	element_id: ElementId,
	stamp: u64,
	batch: Batch,
}

impl PreparedBatch {
	/// Element the batch renders.
	pub fn element_index(&self) -> usize {
		self.element_index
	}

	/// Rendered spans.
	pub fn batch(&self) -> &Batch {
		&self.batch
	}
}

/// A session rendered as one editable text buffer.
pub struct TranscriptDocument {
	rope: Rope,
	map: PositionMap,
	options: DocumentOptions,
	extensions: Vec<Box<dyn DerivedTier>>,
	caret: usize,
	caret_location: Option<TranscriptElementLocation>,
	focused: usize,
	edit_state: SyllabificationEditState,
	freeze: CaretFreeze,
	stamps: FxHashMap<ElementId, u64>,
	next_stamp: u64,
	dirty: Option<(usize, String)>,
}

impl fmt::Debug for TranscriptDocument {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TranscriptDocument")
			.field("len_chars", &self.rope.len_chars())
			.field("runs", &self.map.runs().len())
			.field("caret", &self.caret)
			.field("caret_location", &self.caret_location)
			.field("focused", &self.focused)
			.field("edit_state", &self.edit_state)
			.finish_non_exhaustive()
	}
}

impl TranscriptDocument {
	/// Creates an empty document. Call [`Self::rebuild_all`] to render a session.
	pub fn new(options: DocumentOptions, extensions: Vec<Box<dyn DerivedTier>>) -> Self {
		Self {
			rope: Rope::new(),
			map: PositionMap::new(),
			options,
			extensions,
			caret: 0,
			caret_location: None,
			focused: 0,
			edit_state: SyllabificationEditState::Off,
			freeze: CaretFreeze::default(),
			stamps: FxHashMap::default(),
			next_stamp: 0,
			dirty: None,
		}
	}

	/// Creates a document rendering `session`, focused on `focused`.
	pub fn with_session(
		session: &Session,
		focused: usize,
		options: DocumentOptions,
		extensions: Vec<Box<dyn DerivedTier>>,
	) -> Self {
		let mut doc = Self::new(options, extensions);
		doc.focused = focused;
		doc.rebuild_all(session);
		doc
	}

	/// Buffer text.
	pub fn text(&self) -> String {
		self.rope.to_string()
	}

	/// Buffer.
	pub fn rope(&self) -> &Rope {
		&self.rope
	}

	/// Span layout of the buffer.
	pub fn map(&self) -> &PositionMap {
		&self.map
	}

	/// Buffer length in characters.
	pub fn len_chars(&self) -> usize {
		self.rope.len_chars()
	}

	/// Options in effect.
	pub fn options(&self) -> &DocumentOptions {
		&self.options
	}

	/// Caret offset.
	pub fn caret(&self) -> usize {
		self.caret
	}

	/// Semantic caret location, [`None`] on labels.
	pub fn caret_location(&self) -> Option<&TranscriptElementLocation> {
		self.caret_location.as_ref()
	}

	/// Element receiving derived-tier lines.
	pub fn focused(&self) -> usize {
		self.focused
	}

	/// Syllabification edit mode state.
	pub fn edit_state(&self) -> &SyllabificationEditState {
		&self.edit_state
	}

	/// Registered extensions in hook order.
	pub fn extensions(&self) -> impl Iterator<Item = &dyn DerivedTier> {
		self.extensions.iter().map(|e| e.as_ref())
	}

	/// Semantic location of `offset`.
	pub fn location_at_offset(&self, offset: usize) -> Option<TranscriptElementLocation> {
		self.map.location_at_offset(offset)
	}

	/// Buffer offset of `loc`.
	pub fn offset_at_location(&self, loc: &TranscriptElementLocation) -> Option<usize> {
		self.map.offset_at_location(loc)
	}

	/// Buffer text in `range`.
	pub fn slice(&self, range: Range<usize>) -> Result<String> {
		let len = self.rope.len_chars();
		if range.start > range.end || range.end > len {
			return Err(DocumentError::OffsetOutOfRange { offset: range.end, len });
		}
		Ok(self.rope.slice(range).to_string())
	}

	/// Buffer text of the content of `tier` on element `element_index`.
	pub fn tier_text(&self, element_index: usize, tier: &str) -> Option<String> {
		let range = self.map.content_range(element_index, tier)?;
		Some(self.rope.slice(range).to_string())
	}

	/// Indices of the elements the buffer renders.
	pub fn rendered_elements(&self, session: &Session) -> Range<usize> {
		let len = session.transcript().len();
		if !self.options.single_record_view {
			return 0..len;
		}
		let Some(record) = self.single_record(session) else {
			return 0..len;
		};
		let elements = session.transcript().elements();
		let start = (0..record)
			.rev()
			.find(|&i| elements[i].is_record())
			.map_or(0, |i| i + 1);
		let end = (record + 1..len)
			.find(|&i| elements[i].is_record())
			.unwrap_or(len);
		start..end
	}

	/// The record shown in single-record view: the focused element if it is
	/// a record, else the nearest record before it, else the first after it.
	fn single_record(&self, session: &Session) -> Option<usize> {
		let elements = session.transcript().elements();
		let focus = self.focused.min(elements.len().checked_sub(1)?);
		(0..=focus)
			.rev()
			.find(|&i| elements[i].is_record())
			.or_else(|| (focus..elements.len()).find(|&i| elements[i].is_record()))
	}

	/// Element that receives derived-tier lines.
	fn derived_target(&self, session: &Session) -> Option<usize> {
		if self.options.single_record_view {
			self.single_record(session)
		} else {
			Some(self.focused)
		}
	}

	fn batch_context<'a>(&'a self, session: &'a Session) -> BatchContext<'a> {
		let focused = self.derived_target(session);
		BatchContext {
			session,
			options: &self.options.format,
			extensions: &self.extensions,
			focused,
			syllable_edit: self.edit_state.is_active() && self.edit_state.element_index() == focused,
		}
	}

	/// Renders the element at `element_index`, stamped with its current version.
	pub fn prepare_element(&self, session: &Session, element_index: usize) -> Option<PreparedBatch> {
		let element_id = session.transcript().get(element_index)?.id();
		let batch = self.batch_context(session).element(element_index)?;
		Some(PreparedBatch {
			element_index,
			element_id,
			stamp: self.stamps.get(&element_id).copied().unwrap_or(0),
			batch,
		})
	}

	/// Splices a prepared batch into the buffer.
	///
	/// Returns `Ok(false)` and leaves the buffer untouched when the element
	/// was rebuilt since the batch was prepared.
	pub fn splice_prepared(&mut self, prepared: PreparedBatch) -> Result<bool> {
		let current = self.stamps.get(&prepared.element_id).copied().unwrap_or(0);
		if current != prepared.stamp {
			warn!(
				element = prepared.element_index,
				stamp = prepared.stamp,
				current,
				"stale element batch dropped"
			);
			return Ok(false);
		}
		let runs = match self.map.element_runs(prepared.element_index) {
			Some(runs) if self.map.runs()[runs.start].attrs.element_id == prepared.element_id => runs,
			Some(_) => return Err(DocumentError::MapOutOfSync(prepared.element_index)),
			None => {
				let at = self.map.insertion_point(prepared.element_index);
				at..at
			}
		};
		self.splice_runs(runs, prepared.batch.spans)?;
		self.stamp(prepared.element_id);
		Ok(true)
	}

	/// Re-renders the whole buffer.
	pub fn rebuild_all(&mut self, session: &Session) {
		let rendered = self.rendered_elements(session);
		let spans: Vec<Span> = {
			let cx = self.batch_context(session);
			rendered
				.clone()
				.filter_map(|i| cx.element(i))
				.flat_map(|b| b.spans)
				.collect()
		};
		let text: String = spans.iter().map(|s| s.text.as_str()).collect();
		self.rope = Rope::from_str(&text);
		self.map = spans.into_iter().collect();
		self.stamps.clear();
		for i in rendered.clone() {
			if let Some(element) = session.transcript().get(i) {
				self.stamp(element.id());
			}
		}
		self.restore_caret();
		debug!(
			elements = rendered.len(),
			chars = self.rope.len_chars(),
			"document rebuilt"
		);
	}

	/// Re-renders one element, falling back to a full rebuild on failure.
	pub fn rebuild_element(&mut self, session: &Session, element_index: usize) {
		if !self.rendered_elements(session).contains(&element_index) {
			return;
		}
		let result = match self.prepare_element(session, element_index) {
			Some(prepared) => self.splice_prepared(prepared).map(drop),
			None => Ok(()),
		};
		if let Err(err) = result {
			warn!(element = element_index, error = %err, "element rebuild failed, rebuilding document");
			self.rebuild_all(session);
			return;
		}
		trace!(element = element_index, "element rebuilt");
		self.restore_caret();
	}

	/// Re-renders the line of one tier, falling back to the element.
	pub fn rebuild_tier(&mut self, session: &Session, element_index: usize, tier: &str) {
		if !self.rendered_elements(session).contains(&element_index) {
			return;
		}
		let Some(prepared) = self.prepare_element(session, element_index) else {
			return;
		};
		let spans: Vec<Span> = prepared
			.batch
			.spans
			.into_iter()
			.filter(|s| s.attrs.tier == tier)
			.collect();
		let runs = match (self.map.tier_runs(element_index, tier), spans.is_empty()) {
			(None, true) => return,
			(Some(runs), false) => runs,
			_ => return self.rebuild_element(session, element_index),
		};
		if let Err(err) = self.splice_runs(runs, spans) {
			warn!(element = element_index, tier, error = %err, "tier rebuild failed");
			return self.rebuild_element(session, element_index);
		}
		self.stamp(prepared.element_id);
		trace!(element = element_index, tier, "tier rebuilt");
		self.restore_caret();
	}

	/// Re-renders elements `range` in one splice.
	fn rebuild_range(&mut self, session: &Session, range: Range<usize>) {
		let rendered = self.rendered_elements(session);
		let range = range.start.max(rendered.start)..range.end.min(rendered.end);
		if range.is_empty() {
			return;
		}
		let runs = self.map.insertion_point(range.start)..self.map.insertion_point(range.end);
		let spans: Vec<Span> = {
			let cx = self.batch_context(session);
			range
				.clone()
				.filter_map(|i| cx.element(i))
				.flat_map(|b| b.spans)
				.collect()
		};
		if let Err(err) = self.splice_runs(runs, spans) {
			warn!(error = %err, "range rebuild failed, rebuilding document");
			return self.rebuild_all(session);
		}
		for i in range {
			if let Some(element) = session.transcript().get(i) {
				self.stamp(element.id());
			}
		}
		self.restore_caret();
	}

	fn splice_runs(&mut self, runs: Range<usize>, spans: Vec<Span>) -> Result<()> {
		let old = self.map.char_range(runs.clone());
		let text: String = spans.iter().map(|s| s.text.as_str()).collect();
		let changes = ChangeSet::splice(self.rope.len_chars(), old.start, old.end, text)?;
		changes.apply(&mut self.rope)?;
		self.map.replace_runs(runs, spans);
		if self.map.len_chars() != self.rope.len_chars() {
			return Err(DocumentError::MapOutOfSync(self.map.len_chars()));
		}
		Ok(())
	}

	fn stamp(&mut self, id: ElementId) {
		self.next_stamp += 1;
		self.stamps.insert(id, self.next_stamp);
	}

	/// Puts the caret back on its semantic location after a rewrite.
	fn restore_caret(&mut self) {
		if let Some(loc) = self.caret_location.as_mut()
			&& let Some(range) = self.map.content_range(loc.element_index, &loc.tier)
		{
			loc.char_position = loc.char_position.min(range.len());
			self.caret = range.start + loc.char_position;
			return;
		}
		self.caret = self.caret.min(self.rope.len_chars());
		self.caret_location = self.map.location_at_offset(self.caret);
	}
}
