//! Buffer edits, caret motion and commits.

use tierline_edit::{ChangeCommentEdit, ChangeGemEdit, EditorEvent, TierEdit};
use tierline_model::tier::ipa_tier_for_syllables;
use tierline_model::{Session, TierContent, TierType, TranscriptElementLocation};
use tierline_primitives::ChangeSet;
use tracing::{debug, trace, warn};

use super::{DocumentOutcome, TranscriptDocument, ValidationDiagnostic};
use crate::extension::SyllabificationExtension;
use crate::filter::{EditRequest, EditTarget, FilterInput, FilterVerdict, NavRequest, RejectReason, Rewrite, run_chain};
use crate::format::displayed_content;
use crate::freeze::FreezeToken;
use crate::mode::ModeTransition;

impl TranscriptDocument {
	/// Applies a buffer edit request.
	///
	/// The request runs through the filters of the current mode. Accepted
	/// text lands in the buffer and marks the tier dirty until the caret
	/// leaves it or [`Self::flush`] is called. Session-edit rewrites leave
	/// the buffer alone and come back in [`DocumentOutcome::edits`].
	pub fn apply_edit(&mut self, session: &Session, request: EditRequest) -> DocumentOutcome {
		let mut outcome = DocumentOutcome::default();
		let target = EditTarget::resolve(&self.map, &request.range);
		let verdict = {
			let input = FilterInput {
				session,
				map: &self.map,
				target: target.as_ref(),
			};
			run_chain(self.edit_state.filter_mode().edit_filters(), request.clone(), &input)
		};
		let request = match verdict {
			FilterVerdict::Accept => request,
			FilterVerdict::Rewrite(Rewrite::Request(rewritten)) => rewritten,
			FilterVerdict::Rewrite(Rewrite::Edits(edits)) => {
				outcome.edits = edits;
				return outcome;
			}
			FilterVerdict::Reject(reason) => {
				debug!(range = ?request.range, %reason, "edit rejected");
				outcome.rejected = Some(reason);
				return outcome;
			}
		};
		let Some(target) = target else {
			outcome.rejected = Some(RejectReason::NotEditable);
			return outcome;
		};

		let inserted = request.text.chars().count();
		let spliced = ChangeSet::splice(
			self.rope.len_chars(),
			request.range.start,
			request.range.end,
			request.text.clone(),
		)
		.and_then(|changes| changes.apply(&mut self.rope));
		if let Err(err) = spliced {
			warn!(range = ?request.range, error = %err, "buffer splice failed");
			outcome.rejected = Some(RejectReason::NotEditable);
			return outcome;
		}
		let len = target.content.len() - request.range.len() + inserted;
		self.map.resize_content(target.runs.clone(), len);

		self.caret = request.range.start + inserted;
		let location = TranscriptElementLocation::new(
			target.element_index,
			target.tier.clone(),
			self.caret - target.content.start,
		);
		self.caret_location = Some(location.clone());
		self.dirty = Some((target.element_index, target.tier.clone()));
		trace!(element = target.element_index, tier = %target.tier, len, "tier text edited");

		if self.options.live_updates
			&& let Some(edit) = self.tier_edit(session, target.element_index, &target.tier, true)
		{
			outcome.edits.push(edit.0.into());
		}
		if !self.freeze.suppress() {
			outcome.events.push(EditorEvent::CaretMoved { location });
		}
		outcome
	}

	/// Builds the tier edit carrying the buffer text of a record tier.
	fn tier_edit(
		&self,
		session: &Session,
		element_index: usize,
		tier: &str,
		value_adjusting: bool,
	) -> Option<(TierEdit, TierContent)> {
		if ipa_tier_for_syllables(tier).is_some() {
			return None;
		}
		let stored = session.transcript().record(element_index).ok()?.tier(tier)?;
		if stored.tier_type() == TierType::Alignment {
			return None;
		}
		let text = self.tier_text(element_index, tier)?;
		let content = TierContent::parse(stored.tier_type(), &text);
		if !value_adjusting && !self.options.live_updates && *displayed_content(session, stored) == content {
			return None;
		}
		let mut edit = TierEdit::new(element_index, tier, content.clone()).with_value_adjusting(value_adjusting);
		if let Some(transcriber) = session.transcriber()
			&& session.is_blind(tier)
		{
			edit = edit.for_transcriber(transcriber.username.clone());
		}
		Some((edit, content))
	}

	/// Returns true if buffer text has not been committed yet.
	pub fn is_dirty(&self) -> bool {
		self.dirty.is_some()
	}

	/// Commits the dirty tier, if any, as a session edit.
	pub fn flush(&mut self, session: &Session) -> DocumentOutcome {
		let mut outcome = DocumentOutcome::default();
		let Some((element_index, tier)) = self.dirty.take() else {
			return outcome;
		};
		let Some(text) = self.tier_text(element_index, &tier) else {
			warn!(element = element_index, tier = %tier, "dirty tier no longer rendered");
			return outcome;
		};

		match tier.as_str() {
			TranscriptElementLocation::COMMENT_TIER => {
				outcome.edits.push(ChangeCommentEdit::new(element_index, text).into());
			}
			TranscriptElementLocation::GEM_TIER => {
				outcome.edits.push(ChangeGemEdit::new(element_index, text).into());
			}
			_ => {
				let Some((edit, content)) = self.tier_edit(session, element_index, &tier, false) else {
					return outcome;
				};
				if let Some(error) = content.parse_error()
					&& self.options.report_validation_errors
				{
					debug!(element = element_index, tier = %tier, %error, "unvalidated tier text committed");
					outcome.diagnostics.push(ValidationDiagnostic {
						location: TranscriptElementLocation::new(element_index, tier.clone(), error.offset),
						text,
						message: error.message.clone(),
					});
				}
				outcome.edits.push(edit.into());
			}
		}
		debug!(element = element_index, tier = %tier, "tier committed");
		outcome
	}

	/// Moves the caret to `offset`.
	pub fn set_caret(&mut self, session: &Session, offset: usize) -> DocumentOutcome {
		self.move_caret(
			session,
			NavRequest {
				from: self.caret,
				to: offset,
				step: false,
			},
		)
	}

	/// Moves the caret one step forward or back.
	pub fn step_caret(&mut self, session: &Session, forward: bool) -> DocumentOutcome {
		let to = if forward {
			self.caret + 1
		} else {
			self.caret.saturating_sub(1)
		};
		self.move_caret(
			session,
			NavRequest {
				from: self.caret,
				to,
				step: true,
			},
		)
	}

	/// Moves the caret to `loc`. Returns [`None`] if it is not rendered.
	pub fn set_caret_location(
		&mut self,
		session: &Session,
		loc: &TranscriptElementLocation,
	) -> Option<DocumentOutcome> {
		let offset = self.map.offset_at_location(loc)?;
		Some(self.set_caret(session, offset))
	}

	fn move_caret(&mut self, session: &Session, request: NavRequest) -> DocumentOutcome {
		let mut outcome = DocumentOutcome::default();
		let to = (self.edit_state.filter_mode().nav_filter())(&request, &self.map);
		let location = self.map.location_at_offset(to);

		let left_dirty = self.dirty.as_ref().is_some_and(|(element, tier)| {
			location
				.as_ref()
				.is_none_or(|l| l.element_index != *element || l.tier != *tier)
		});
		if left_dirty {
			outcome.merge(self.flush(session));
		}

		self.caret = to;
		self.caret_location = location.clone();

		let edited = self.edit_state.element_index();
		if self.edit_state.caret_moved(location.as_ref()) == ModeTransition::Exited {
			if let Some(element) = edited {
				self.rebuild_element(session, element);
			}
			outcome
				.events
				.push(EditorEvent::SyllabificationEditMode { active: false });
		}

		if let Some(loc) = &location {
			if loc.element_index != self.focused {
				outcome.events.push(EditorEvent::CurrentRecordChanged {
					element_index: loc.element_index,
				});
			}
			if !self.freeze.suppress() {
				outcome.events.push(EditorEvent::CaretMoved { location: loc.clone() });
			}
		}
		outcome
	}

	/// Enters syllabification edit mode if the caret is on a syllable tier.
	pub fn enter_syllabification_edit(&mut self, session: &Session) -> DocumentOutcome {
		let mut outcome = DocumentOutcome::default();
		if self.edit_state.enter(self.caret_location.as_ref()) != ModeTransition::Entered {
			return outcome;
		}
		if let Some(element) = self.edit_state.element_index() {
			self.rebuild_element(session, element);
		}
		self.snap_to_code();
		debug!(caret = self.caret, "syllabification edit mode entered");
		outcome
			.events
			.push(EditorEvent::SyllabificationEditMode { active: true });
		outcome
	}

	/// Leaves syllabification edit mode.
	pub fn cancel_syllabification_edit(&mut self, session: &Session) -> DocumentOutcome {
		let mut outcome = DocumentOutcome::default();
		let edited = self.edit_state.element_index();
		if self.edit_state.cancel() == ModeTransition::Exited {
			if let Some(element) = edited {
				self.rebuild_element(session, element);
			}
			debug!("syllabification edit mode left");
			outcome
				.events
				.push(EditorEvent::SyllabificationEditMode { active: false });
		}
		outcome
	}

	/// Puts the caret on the nearest code span of its syllable line.
	fn snap_to_code(&mut self) {
		let Some(loc) = &self.caret_location else {
			return;
		};
		let Some(line) = self.map.content_runs(loc.element_index, &loc.tier) else {
			return;
		};
		let codes: Vec<usize> = self.map.runs()[line]
			.iter()
			.filter(|r| r.attrs.syllable.is_some_and(|m| m.is_code))
			.map(|r| r.start)
			.collect();
		let caret = self.caret;
		let snapped = codes
			.iter()
			.copied()
			.find(|&start| start >= caret)
			.or_else(|| codes.last().copied());
		if let Some(offset) = snapped {
			self.caret = offset;
			self.caret_location = self.map.location_at_offset(offset);
		}
	}

	/// Shows or hides the lines of the extension named `name`.
	pub fn set_extension_enabled(&mut self, session: &Session, name: &str, enabled: bool) -> DocumentOutcome {
		let mut outcome = DocumentOutcome::default();
		let Some(ext) = self.extensions.iter_mut().find(|e| e.name() == name) else {
			warn!(extension = name, "unknown derived tier extension");
			return outcome;
		};
		if ext.is_enabled() == enabled {
			return outcome;
		}
		ext.set_enabled(enabled);
		let extension = ext.name();
		if extension == SyllabificationExtension::NAME && !enabled {
			outcome.merge(self.cancel_syllabification_edit(session));
		}
		if let Some(element) = self.derived_target(session) {
			self.rebuild_element(session, element);
		}
		debug!(extension, enabled, "derived tier toggled");
		outcome.events.push(EditorEvent::DerivedTierToggled {
			extension,
			visible: enabled,
		});
		outcome
	}

	/// Stops caret motion from being reported until the token is released.
	pub fn freeze_caret(&mut self) -> FreezeToken {
		self.freeze.freeze()
	}

	/// Releases a freeze. Reports the final caret location if the caret
	/// moved while frozen and this was the outermost freeze.
	pub fn release_caret(&mut self, token: FreezeToken) -> Option<EditorEvent> {
		if !self.freeze.release(token) {
			return None;
		}
		self.caret_location
			.clone()
			.map(|location| EditorEvent::CaretMoved { location })
	}

	/// Returns true while caret reports are frozen.
	pub fn is_caret_frozen(&self) -> bool {
		self.freeze.is_frozen()
	}
}
