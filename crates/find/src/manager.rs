//! Ordered multi-tier search with a match cursor, and replace.
//!
//! A scan visits every element accepted by the [`FindFilter`] and collects
//! matches ordered by element index, then configured tier order, then
//! offset. The cursor walks that list; stepping past either end yields
//! [`FindStep::Boundary`] rather than wrapping.
//!
//! Scans are synchronous but cancellable: [`FindManager::begin_scan`] takes
//! a fresh generation, which cancels any scan still holding the previous
//! token.

use indexmap::IndexMap;
use tierline_document::format::{displayed_content, is_editable};
use tierline_edit::{ChangeCommentEdit, ChangeGemEdit, SessionEdit, TierEdit};
use tierline_model::{
	Session, TierContent, TierType, TranscriptElement, TranscriptElementLocation, TranscriptElementRange,
};
use tierline_primitives::{GenerationClock, GenerationToken};
use tracing::{debug, trace, warn};

use crate::error::{FindError, Result};
use crate::expr::{CompiledExpr, FindExpr, expand};
use crate::filter::FindFilter;

/// One match in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindResult {
	/// Element, tier and character range of the match.
	pub range: TranscriptElementRange,
	/// Matched text.
	pub text: String,
	/// Capture groups, starting at group 1.
	pub groups: Vec<Option<String>>,
}

impl FindResult {
	/// Expands capture references in `replacement` against this match.
	pub fn expand(&self, replacement: &str) -> String {
		expand(&self.text, &self.groups, replacement)
	}
}

/// Direction the cursor moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindDirection {
	/// Towards later elements and offsets.
	Forward,
	/// Towards earlier elements and offsets.
	Backward,
}

/// Outcome of moving the cursor.
///
/// Stepping never wraps: the first step past the last match in a direction
/// reports a boundary and leaves the cursor where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindStep<'a> {
	/// The cursor moved onto this match.
	Match(&'a FindResult),
	/// No further match in this direction. The cursor did not move.
	Boundary(FindDirection),
}

/// A tier whose expression failed to compile during a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDiagnostic {
	/// Tier the expression was meant for.
	pub tier: String,
	/// Compile error.
	pub error: FindError,
}

/// Result of [`FindManager::replace_all`].
#[derive(Debug, Default)]
pub struct ReplaceAll {
	/// One edit per rewritten tier, in match order.
	pub edits: Vec<SessionEdit>,
	/// Number of matches rewritten.
	pub replaced: usize,
	/// Matches left alone because their tier is locked or read only.
	pub skipped: usize,
}

/// Search state over one session.
#[derive(Debug, Default)]
pub struct FindManager {
	filter: FindFilter,
	expr: FindExpr,
	tier_exprs: IndexMap<String, FindExpr>,
	clock: GenerationClock,
	results: Option<Vec<FindResult>>,
	tier_order: Vec<String>,
	cursor: Option<usize>,
	current: Option<TranscriptElementRange>,
	anchor: Option<TranscriptElementLocation>,
	diagnostics: Vec<PatternDiagnostic>,
}

impl FindManager {
	/// Creates a manager searching for `expr` in the tiers `filter` accepts.
	pub fn new(expr: FindExpr, filter: FindFilter) -> Self {
		Self {
			expr,
			filter,
			..Self::default()
		}
	}

	/// Main expression, used on every tier without its own.
	pub fn expr(&self) -> &FindExpr {
		&self.expr
	}

	/// Element and tier filter.
	pub fn filter(&self) -> &FindFilter {
		&self.filter
	}

	/// Replaces the main expression and forgets the current match.
	pub fn set_expr(&mut self, expr: FindExpr) {
		self.expr = expr;
		self.restart();
	}

	/// Replaces the filter and forgets the current match.
	pub fn set_filter(&mut self, filter: FindFilter) {
		self.filter = filter;
		self.restart();
	}

	/// Uses `expr` instead of the main expression on `tier`.
	pub fn set_tier_expr(&mut self, tier: impl Into<String>, expr: FindExpr) {
		self.tier_exprs.insert(tier.into(), expr);
		self.restart();
	}

	/// Drops every per-tier expression.
	pub fn clear_tier_exprs(&mut self) {
		self.tier_exprs.clear();
		self.restart();
	}

	/// Drops the results of the last scan, keeping the cursor position.
	///
	/// The next scan relocates the cursor on the same match if it still exists.
	pub fn invalidate(&mut self) {
		self.results = None;
		self.cursor = None;
	}

	fn restart(&mut self) {
		self.invalidate();
		self.current = None;
	}

	/// Starts the next search from `location` instead of the current match.
	pub fn set_current_location(&mut self, location: TranscriptElementLocation) {
		self.cursor = None;
		self.current = None;
		self.anchor = Some(location);
	}

	/// Results of the last completed scan.
	pub fn results(&self) -> Option<&[FindResult]> {
		self.results.as_deref()
	}

	/// The match under the cursor.
	pub fn current(&self) -> Option<&FindResult> {
		let results = self.results.as_ref()?;
		results.get(self.cursor?)
	}

	/// Expressions that failed to compile during the last scan.
	pub fn diagnostics(&self) -> &[PatternDiagnostic] {
		&self.diagnostics
	}

	/// Takes a token for a new scan, cancelling any scan in progress.
	pub fn begin_scan(&mut self) -> GenerationToken {
		self.clock.advance()
	}

	/// Scans `session` and stores the ordered results.
	///
	/// A tier whose expression fails to compile is skipped and reported in
	/// [`Self::diagnostics`]; the error is returned only when no tier could
	/// be searched at all.
	pub fn scan(&mut self, session: &Session, token: &GenerationToken) -> Result<&[FindResult]> {
		let tiers = self.filter.search_tiers(session);
		let mut diagnostics = Vec::new();
		let mut compiled: IndexMap<&str, Option<CompiledExpr>> = IndexMap::new();
		for tier in tiers
			.iter()
			.map(String::as_str)
			.chain([TranscriptElementLocation::COMMENT_TIER, TranscriptElementLocation::GEM_TIER])
		{
			let expr = self.tier_exprs.get(tier).unwrap_or(&self.expr);
			let entry = match expr.compile() {
				Ok(c) => Some(c),
				Err(error) => {
					warn!(tier, pattern = %expr.pattern, %error, "search expression failed to compile");
					diagnostics.push(PatternDiagnostic {
						tier: tier.to_owned(),
						error,
					});
					None
				}
			};
			compiled.insert(tier, entry);
		}
		if compiled.values().all(Option::is_none)
			&& let Some(first) = diagnostics.first()
		{
			let error = first.error.clone();
			self.diagnostics = diagnostics;
			return Err(error);
		}

		let mut results = Vec::new();
		for (index, element) in session.transcript().elements().iter().enumerate() {
			if token.is_cancelled() || !self.clock.is_current(token) {
				debug!(index, "search cancelled");
				return Err(FindError::Cancelled);
			}
			if !self.filter.accepts(element) {
				continue;
			}
			match element {
				TranscriptElement::Record(record) => {
					for name in &tiers {
						let (Some(tier), Some(Some(expr))) = (record.tier(name), compiled.get(name.as_str()))
						else {
							continue;
						};
						if !expr.applies_to(tier.tier_type()) {
							continue;
						}
						let text = displayed_content(session, tier).text();
						collect(&mut results, expr, index, name, &text);
					}
				}
				TranscriptElement::Comment(comment) => {
					let tier = TranscriptElementLocation::COMMENT_TIER;
					if let Some(Some(expr)) = compiled.get(tier)
						&& expr.applies_to(TierType::Text)
					{
						collect(&mut results, expr, index, tier, &comment.text);
					}
				}
				TranscriptElement::Gem(gem) => {
					let tier = TranscriptElementLocation::GEM_TIER;
					if let Some(Some(expr)) = compiled.get(tier)
						&& expr.applies_to(TierType::Text)
					{
						collect(&mut results, expr, index, tier, &gem.label);
					}
				}
			}
		}

		debug!(pattern = %self.expr.pattern, matches = results.len(), "search complete");
		self.cursor = self
			.current
			.as_ref()
			.and_then(|current| results.iter().position(|r| &r.range == current));
		self.diagnostics = diagnostics;
		self.tier_order = tiers.clone();
		Ok(self.results.insert(results).as_slice())
	}

	/// Scans with a fresh generation.
	pub fn search(&mut self, session: &Session) -> Result<&[FindResult]> {
		let token = self.begin_scan();
		self.scan(session, &token)
	}

	fn ensure_results(&mut self, session: &Session) -> Result<()> {
		if self.results.is_none() {
			self.search(session)?;
		}
		Ok(())
	}

	/// Moves the cursor to the next match, scanning first if needed.
	pub fn find_next(&mut self, session: &Session) -> Result<FindStep<'_>> {
		self.step(session, FindDirection::Forward)
	}

	/// Moves the cursor to the previous match, scanning first if needed.
	pub fn find_prev(&mut self, session: &Session) -> Result<FindStep<'_>> {
		self.step(session, FindDirection::Backward)
	}

	fn step(&mut self, session: &Session, direction: FindDirection) -> Result<FindStep<'_>> {
		self.ensure_results(session)?;
		let Some(results) = self.results.as_ref() else {
			return Ok(FindStep::Boundary(direction));
		};
		let order = &self.tier_order;
		let next = match (self.cursor, direction) {
			(Some(i), FindDirection::Forward) => Some(i + 1).filter(|&n| n < results.len()),
			(Some(i), FindDirection::Backward) => i.checked_sub(1),
			(None, FindDirection::Forward) => match &self.anchor {
				Some(anchor) => results
					.iter()
					.position(|r| r.range.start().cmp_with_tier_order(anchor, order).is_ge()),
				None => (!results.is_empty()).then_some(0),
			},
			(None, FindDirection::Backward) => match &self.anchor {
				Some(anchor) => results
					.iter()
					.rposition(|r| r.range.start().cmp_with_tier_order(anchor, order).is_lt()),
				None => results.len().checked_sub(1),
			},
		};
		let Some(next) = next else {
			trace!(?direction, "search boundary");
			return Ok(FindStep::Boundary(direction));
		};
		let result = &results[next];
		self.cursor = Some(next);
		self.current = Some(result.range.clone());
		self.anchor = Some(result.range.start());
		Ok(FindStep::Match(result))
	}

	/// Builds the edit rewriting the current match with `replacement`.
	///
	/// The caller posts the edit. The next [`Self::find_next`] continues after
	/// the replaced text.
	pub fn replace_current(&mut self, session: &Session, replacement: &str) -> Result<SessionEdit> {
		let result = self.current().ok_or(FindError::NoMatch)?.clone();
		let range = &result.range;
		check_writable(session, range)?;
		let text = tier_text(session, range).ok_or_else(|| FindError::Stale(range.to_string()))?;
		let expanded = result.expand(replacement);
		let updated = splice(&text, &result, &expanded).ok_or_else(|| FindError::Stale(range.to_string()))?;
		let edit = tier_edit(session, range.element_index, &range.tier, &updated)?;
		debug!(range = %range, replacement = %expanded, "replace current match");

		self.anchor = Some(TranscriptElementLocation::new(
			range.element_index,
			range.tier.clone(),
			range.range.start + expanded.chars().count(),
		));
		self.restart();
		Ok(edit)
	}

	/// Builds one edit per tier rewriting every match with `replacement`.
	///
	/// Matches in locked or read-only tiers are skipped. Post the edits as one
	/// undo group.
	pub fn replace_all(&mut self, session: &Session, replacement: &str) -> Result<ReplaceAll> {
		self.ensure_results(session)?;
		let mut out = ReplaceAll::default();
		let Some(results) = self.results.as_ref() else {
			return Ok(out);
		};

		let mut groups: IndexMap<(usize, &str), Vec<&FindResult>> = IndexMap::new();
		for result in results {
			groups
				.entry((result.range.element_index, result.range.tier.as_str()))
				.or_default()
				.push(result);
		}

		for ((element_index, tier), matches) in groups {
			if let Err(err) = check_writable(session, &matches[0].range) {
				debug!(element_index, tier, %err, "skipping tier");
				out.skipped += matches.len();
				continue;
			}
			let stale = || FindError::Stale(format!("{element_index}.{tier}"));
			let mut text = tier_text(session, &matches[0].range).ok_or_else(stale)?;
			for result in matches.iter().rev() {
				text = splice(&text, result, &result.expand(replacement)).ok_or_else(stale)?;
			}
			out.edits.push(tier_edit(session, element_index, tier, &text)?);
			out.replaced += matches.len();
		}

		debug!(replaced = out.replaced, skipped = out.skipped, "replace all");
		self.restart();
		Ok(out)
	}
}

fn collect(results: &mut Vec<FindResult>, expr: &CompiledExpr, index: usize, tier: &str, text: &str) {
	results.extend(expr.find_all(text).into_iter().map(|m| FindResult {
		range: TranscriptElementRange::new(index, tier, m.range),
		text: m.text,
		groups: m.groups,
	}));
}

fn check_writable(session: &Session, range: &TranscriptElementRange) -> Result<()> {
	if session.tier_view().is_locked(&range.tier) {
		return Err(FindError::Locked(range.tier.clone()));
	}
	let element = session
		.transcript()
		.get(range.element_index)
		.ok_or_else(|| FindError::Stale(range.to_string()))?;
	if let TranscriptElement::Record(record) = element {
		let tier = record
			.tier(&range.tier)
			.ok_or_else(|| FindError::Stale(range.to_string()))?;
		if !is_editable(session, tier) {
			return Err(FindError::ReadOnly(range.tier.clone()));
		}
	}
	Ok(())
}

/// Current text of the tier a range points into.
fn tier_text(session: &Session, range: &TranscriptElementRange) -> Option<String> {
	match session.transcript().get(range.element_index)? {
		TranscriptElement::Record(record) => {
			let tier = record.tier(&range.tier)?;
			Some(displayed_content(session, tier).text())
		}
		TranscriptElement::Comment(c) if range.tier == TranscriptElementLocation::COMMENT_TIER => {
			Some(c.text.clone())
		}
		TranscriptElement::Gem(g) if range.tier == TranscriptElementLocation::GEM_TIER => Some(g.label.clone()),
		_ => None,
	}
}

/// Replaces the matched characters of `result` in `text`, if they are still there.
fn splice(text: &str, result: &FindResult, replacement: &str) -> Option<String> {
	let chars: Vec<char> = text.chars().collect();
	let found: String = chars.get(result.range.range.clone())?.iter().collect();
	if found != result.text {
		return None;
	}
	let mut out: String = chars[..result.range.range.start].iter().collect();
	out.push_str(replacement);
	out.extend(&chars[result.range.range.end..]);
	Some(out)
}

fn tier_edit(session: &Session, element_index: usize, tier: &str, text: &str) -> Result<SessionEdit> {
	let stale = || FindError::Stale(format!("{element_index}.{tier}"));
	match session.transcript().get(element_index).ok_or_else(stale)? {
		TranscriptElement::Record(record) => {
			let tier_type = record.tier(tier).ok_or_else(stale)?.tier_type();
			let edit = TierEdit::new(element_index, tier, TierContent::parse(tier_type, text));
			let edit = match session.transcriber() {
				Some(t) if session.is_blind(tier) => edit.for_transcriber(t.username.clone()),
				_ => edit,
			};
			Ok(edit.into())
		}
		TranscriptElement::Comment(_) => Ok(ChangeCommentEdit::new(element_index, text).into()),
		TranscriptElement::Gem(_) => Ok(ChangeGemEdit::new(element_index, text).into()),
	}
}
