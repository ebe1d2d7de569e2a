//! Find and replace through the editor.

use tierline_find::{FindExpr, FindFilter, FindManager, FindResult, FindStep};
use tracing::debug;

use super::SessionEditor;
use crate::error::Result;

/// Counts reported by [`SessionEditor::replace_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
	pub replaced: usize,
	/// Matches left alone in locked or read-only tiers.
	pub skipped: usize,
}

impl SessionEditor {
	pub fn find_manager(&self) -> &FindManager {
		&self.find
	}

	/// Access for cancellable scans and per-tier expressions.
	pub fn find_manager_mut(&mut self) -> &mut FindManager {
		&mut self.find
	}

	pub fn set_find_expr(&mut self, expr: FindExpr) {
		self.find.set_expr(expr);
	}

	pub fn set_find_filter(&mut self, filter: FindFilter) {
		self.find.set_filter(filter);
	}

	/// Scans the session and returns the number of matches.
	pub fn search(&mut self) -> Result<usize> {
		self.flush()?;
		Ok(self.find.search(&self.session)?.len())
	}

	/// Moves to the next match and puts the caret on it.
	///
	/// Returns [`None`] at the end of the results; the cursor stays put.
	pub fn find_next(&mut self) -> Result<Option<FindResult>> {
		self.flush()?;
		let step = self.find.find_next(&self.session)?;
		let found = match step {
			FindStep::Match(result) => Some(result.clone()),
			FindStep::Boundary(_) => None,
		};
		self.show_match(found)
	}

	/// Moves to the previous match and puts the caret on it.
	pub fn find_prev(&mut self) -> Result<Option<FindResult>> {
		self.flush()?;
		let step = self.find.find_prev(&self.session)?;
		let found = match step {
			FindStep::Match(result) => Some(result.clone()),
			FindStep::Boundary(_) => None,
		};
		self.show_match(found)
	}

	fn show_match(&mut self, found: Option<FindResult>) -> Result<Option<FindResult>> {
		if let Some(result) = &found {
			self.set_current_element(result.range.element_index);
			if !self.set_caret_location(&result.range.start())? {
				debug!(range = %result.range, "match is not rendered");
			}
		}
		Ok(found)
	}

	/// Rewrites the current match as one undoable edit.
	pub fn replace_current(&mut self, replacement: &str) -> Result<()> {
		self.flush()?;
		let edit = self.find.replace_current(&self.session, replacement)?;
		self.post_group("replace", [edit])
	}

	/// Rewrites every match as one undo group.
	pub fn replace_all(&mut self, replacement: &str) -> Result<ReplaceSummary> {
		self.flush()?;
		let all = self.find.replace_all(&self.session, replacement)?;
		let summary = ReplaceSummary {
			replaced: all.replaced,
			skipped: all.skipped,
		};
		self.post_group("replace all", all.edits)?;
		Ok(summary)
	}
}
