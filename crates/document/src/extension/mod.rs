//! Derived tiers rendered alongside stored tiers.
//!
//! Extensions are registered with the document in hook order. After each
//! visible tier line of the focused record is emitted, every enabled
//! extension may append lines of its own.

mod alignment;
mod syllabification;

pub use alignment::AlignmentExtension;
pub use syllabification::SyllabificationExtension;

use tierline_model::{Record, Session};

use crate::format::FormatOptions;
use crate::span::Batch;

/// Per-record state handed to extension hooks.
pub struct HookContext<'a> {
	/// Source session.
	pub session: &'a Session,
	/// Record being rendered.
	pub record: &'a Record,
	/// Index of that record.
	pub element_index: usize,
	/// Rendering options.
	pub options: &'a FormatOptions,
	/// Syllabification edit mode is on.
	pub syllable_edit: bool,
}

/// A tier computed from stored tiers and rendered by the document.
pub trait DerivedTier: Send {
	/// Stable extension name, e.g. `syllabification`.
	fn name(&self) -> &'static str;

	/// Returns true if the extension currently renders.
	fn is_enabled(&self) -> bool;

	/// Shows or hides the extension's lines.
	fn set_enabled(&mut self, enabled: bool);

	/// Returns true if a change to `tier` alters this extension's output.
	fn depends_on(&self, session: &Session, tier: &str) -> bool;

	/// Appends lines after the line of `tier`.
	fn after_tier(&self, cx: &HookContext<'_>, tier: &str, batch: &mut Batch);
}

/// Extensions installed by default: syllabification, then alignment.
pub fn default_extensions() -> Vec<Box<dyn DerivedTier>> {
	vec![
		Box::new(SyllabificationExtension::new()),
		Box::new(AlignmentExtension::new()),
	]
}
