//! Edit and navigation filters.
//!
//! Every buffer edit request passes through the filter chain of the active
//! [`FilterMode`] before it touches the buffer. A filter accepts the request,
//! rejects it, or rewrites it: either into another buffer edit or into
//! session edits that bypass the buffer entirely. Navigation requests pass a
//! single per-mode navigation filter.

use std::ops::Range;

use tierline_edit::{ScTypeEdit, SessionEdit, ToggleDiphthongEdit};
use tierline_model::ipa::HIATUS_CODE;
use tierline_model::{IpaTranscript, Session, SyllableConstituentType};
use tracing::trace;

use crate::map::{PositionMap, Run};

/// A request to replace `range` of the buffer with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
	/// Replaced character range.
	pub range: Range<usize>,
	/// Inserted text.
	pub text: String,
}

impl EditRequest {
	/// Inserts `text` at `at`.
	pub fn insert(at: usize, text: impl Into<String>) -> Self {
		Self::replace(at..at, text)
	}

	/// Deletes `range`.
	pub fn delete(range: Range<usize>) -> Self {
		Self::replace(range, String::new())
	}

	/// Replaces `range` with `text`.
	pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
		Self {
			range,
			text: text.into(),
		}
	}
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RejectReason {
	/// The range is not inside editable tier content.
	#[strum(serialize = "not editable")]
	NotEditable,
	/// The tier is locked.
	#[strum(serialize = "tier locked")]
	Locked,
	/// The character is not a syllabification code.
	#[strum(serialize = "invalid code")]
	InvalidCode,
	/// The request would change nothing.
	#[strum(serialize = "no change")]
	NoChange,
}

/// Replacement produced by a rewriting filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
	/// Apply this buffer edit instead.
	Request(EditRequest),
	/// Post these session edits instead of touching the buffer.
	Edits(Vec<SessionEdit>),
}

/// Result of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
	/// Pass the request on.
	Accept,
	/// Refuse the request.
	Reject(RejectReason),
	/// Replace the request.
	Rewrite(Rewrite),
}

/// The tier content an edit request lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
	/// Element index.
	pub element_index: usize,
	/// Tier name.
	pub tier: String,
	/// Content run indices of the tier.
	pub runs: Range<usize>,
	/// Character range of the tier content.
	pub content: Range<usize>,
}

impl EditTarget {
	/// Resolves the tier content holding the start of `range`.
	pub fn resolve(map: &PositionMap, range: &Range<usize>) -> Option<Self> {
		let run = &map.runs()[map.content_run_at(range.start)?];
		let element_index = run.attrs.element_index;
		let runs = map.content_runs(element_index, &run.attrs.tier)?;
		Some(Self {
			element_index,
			tier: run.attrs.tier.clone(),
			content: map.char_range(runs.clone()),
			runs,
		})
	}
}

/// State visible to filters.
pub struct FilterInput<'a> {
	/// Session the buffer renders.
	pub session: &'a Session,
	/// Buffer layout.
	pub map: &'a PositionMap,
	/// Resolved target, if the request starts in tier content.
	pub target: Option<&'a EditTarget>,
}

impl FilterInput<'_> {
	fn target_runs(&self) -> &[Run] {
		match self.target {
			Some(t) => &self.map.runs()[t.runs.clone()],
			None => &[],
		}
	}
}

/// A buffer edit filter.
pub type EditFilter = fn(&EditRequest, &FilterInput<'_>) -> FilterVerdict;

/// A caret motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavRequest {
	/// Caret offset before the motion.
	pub from: usize,
	/// Requested caret offset.
	pub to: usize,
	/// True for a single arrow-key step, false for a jump.
	pub step: bool,
}

/// A navigation filter returns the offset the caret actually moves to.
pub type NavFilter = fn(&NavRequest, &PositionMap) -> usize;

const DEFAULT_FILTERS: &[EditFilter] = &[reject_not_editable, reject_locked, strip_line_breaks];
const SYLLABLE_FILTERS: &[EditFilter] = &[reject_locked, syllable_code];

/// Filter set in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
	/// Plain tier editing.
	#[default]
	Default,
	/// Typing replaces syllabification codes.
	SyllabificationEdit,
}

impl FilterMode {
	/// Edit filters run in order.
	pub fn edit_filters(self) -> &'static [EditFilter] {
		match self {
			Self::Default => DEFAULT_FILTERS,
			Self::SyllabificationEdit => SYLLABLE_FILTERS,
		}
	}

	/// Navigation filter.
	pub fn nav_filter(self) -> NavFilter {
		match self {
			Self::Default => clamp_nav,
			Self::SyllabificationEdit => syllable_nav,
		}
	}
}

/// Runs `filters` over `request`.
///
/// The first rejection or session-edit rewrite ends the chain. A buffer
/// rewrite replaces the request for the remaining filters.
pub fn run_chain(filters: &[EditFilter], request: EditRequest, input: &FilterInput<'_>) -> FilterVerdict {
	let mut current = request.clone();
	for filter in filters {
		match filter(&current, input) {
			FilterVerdict::Accept => {}
			FilterVerdict::Rewrite(Rewrite::Request(next)) => current = next,
			verdict => {
				trace!(?verdict, "edit filtered");
				return verdict;
			}
		}
	}
	if current == request {
		FilterVerdict::Accept
	} else {
		FilterVerdict::Rewrite(Rewrite::Request(current))
	}
}

fn reject_not_editable(request: &EditRequest, input: &FilterInput<'_>) -> FilterVerdict {
	let Some(target) = input.target else {
		return FilterVerdict::Reject(RejectReason::NotEditable);
	};
	let inside = target.content.start <= request.range.start && request.range.end <= target.content.end;
	if !inside || input.target_runs().iter().any(|r| !r.attrs.editable) {
		return FilterVerdict::Reject(RejectReason::NotEditable);
	}
	FilterVerdict::Accept
}

fn reject_locked(_request: &EditRequest, input: &FilterInput<'_>) -> FilterVerdict {
	if input.target_runs().iter().any(|r| r.attrs.locked) {
		return FilterVerdict::Reject(RejectReason::Locked);
	}
	FilterVerdict::Accept
}

fn strip_line_breaks(request: &EditRequest, _input: &FilterInput<'_>) -> FilterVerdict {
	if !request.text.contains(['\n', '\r']) {
		return FilterVerdict::Accept;
	}
	let text: String = request
		.text
		.chars()
		.filter(|c| !matches!(c, '\n' | '\r'))
		.collect();
	FilterVerdict::Rewrite(Rewrite::Request(EditRequest::replace(request.range.clone(), text)))
}

/// Turns a typed code over a syllabification code span into syllable edits.
fn syllable_code(request: &EditRequest, input: &FilterInput<'_>) -> FilterVerdict {
	let reject = FilterVerdict::Reject;
	let Some(target) = input.target else {
		return reject(RejectReason::NotEditable);
	};
	let code_run = input
		.target_runs()
		.iter()
		.find(|r| r.start == request.range.start && r.attrs.syllable.is_some_and(|m| m.is_code));
	let (Some(run), Some(parent)) = (code_run, code_run.and_then(|r| r.attrs.parent_tier.as_deref()))
	else {
		return reject(RejectReason::NotEditable);
	};
	if request.range.len() > run.len {
		return reject(RejectReason::NotEditable);
	}
	let mut chars = request.text.chars();
	let (Some(ch), None) = (chars.next(), chars.next()) else {
		return reject(RejectReason::NotEditable);
	};
	if !SyllableConstituentType::is_edit_code(ch) {
		return reject(RejectReason::InvalidCode);
	}
	let Some(meta) = run.attrs.syllable else {
		return reject(RejectReason::NotEditable);
	};
	let Some(ipa) = input
		.session
		.transcript()
		.record(target.element_index)
		.ok()
		.and_then(|r| r.tier(parent))
		.and_then(|t| t.ipa())
	else {
		return reject(RejectReason::NotEditable);
	};

	match syllable_edits(ipa, target.element_index, parent, meta.phone_index, ch) {
		Some(edits) if !edits.is_empty() => FilterVerdict::Rewrite(Rewrite::Edits(edits)),
		_ => reject(RejectReason::NoChange),
	}
}

/// Session edits for typing `code` over the code of phone `phone`.
///
/// `D` pairs the phone with its diphthong partner, making it a nucleus
/// first if needed. `H` on a diphthong member splits the pair. Any other
/// code sets the constituent type.
pub fn syllable_edits(
	ipa: &IpaTranscript,
	element_index: usize,
	tier: &str,
	phone: usize,
	code: char,
) -> Option<Vec<SessionEdit>> {
	let element = ipa.get(phone)?;
	let upper = code.to_ascii_uppercase();
	let nucleus = SyllableConstituentType::Nucleus;

	if upper == tierline_model::ipa::DIPHTHONG_CODE {
		if element.is_diphthong_member() {
			return None;
		}
		let mut edits = Vec::new();
		let mut staged = ipa.clone();
		if element.constituent() != nucleus {
			staged.set_constituent(phone, nucleus).ok()?;
			edits.push(ScTypeEdit::new(element_index, tier, phone, nucleus).into());
		}
		if let Some(partner) = staged.diphthong_partner(phone) {
			edits.push(ToggleDiphthongEdit::new(element_index, tier, phone, partner).into());
		}
		return Some(edits);
	}

	if upper == HIATUS_CODE {
		if !element.is_diphthong_member() {
			return None;
		}
		let partner = ipa.member_partner(phone)?;
		return Some(vec![ToggleDiphthongEdit::new(element_index, tier, phone, partner).into()]);
	}

	let ty = SyllableConstituentType::from_id_char(upper)?;
	if ty == element.constituent() {
		return None;
	}
	Some(vec![ScTypeEdit::new(element_index, tier, phone, ty).into()])
}

fn clamp_nav(nav: &NavRequest, map: &PositionMap) -> usize {
	nav.to.min(map.len_chars())
}

/// Steps between code spans of the current syllable tier; jumps pass.
fn syllable_nav(nav: &NavRequest, map: &PositionMap) -> usize {
	let to = clamp_nav(nav, map);
	if !nav.step {
		return to;
	}
	let Some(from) = map.content_run_at(nav.from) else {
		return to;
	};
	let attrs = &map.runs()[from].attrs;
	let Some(line) = map.content_runs(attrs.element_index, &attrs.tier) else {
		return to;
	};
	let codes = map.runs()[line]
		.iter()
		.filter(|r| r.attrs.syllable.is_some_and(|m| m.is_code))
		.map(|r| r.start);
	let next = if nav.to >= nav.from {
		codes.filter(|&s| s > nav.from).min()
	} else {
		codes.filter(|&s| s < nav.from).max()
	};
	next.unwrap_or(nav.from)
}

#[cfg(test)]
mod tests;
