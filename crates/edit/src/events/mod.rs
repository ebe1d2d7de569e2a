//! Editor events.
//!
//! Events are plain data. Components that react to them (the transcript
//! document, derived-tier extensions, external observers) subscribe through
//! the [`EventManager`] and never receive mutable access to the session.

mod manager;

use strum::{Display, EnumDiscriminants, EnumIter};
use tierline_model::{ElementId, TranscriptElementLocation};

pub use manager::{Delivery, EventManager, EventSender, SubscriptionId};

/// A change notification.
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(EventKind), derive(Hash, Display, EnumIter))]
pub enum EditorEvent {
	/// The whole session was replaced or restructured.
	SessionChanged,
	/// A transcript element was inserted. Fired for comments and gems too.
	RecordAdded {
		/// Index the element now occupies.
		element_index: usize,
		/// Its id.
		id: ElementId,
	},
	/// A transcript element was removed.
	RecordDeleted {
		/// Index the element occupied.
		element_index: usize,
		/// Its id.
		id: ElementId,
	},
	/// A transcript element changed outside its tiers: speaker, comment
	/// text or gem label.
	RecordChanged {
		/// Index of the element.
		element_index: usize,
	},
	/// A transcript element moved.
	RecordMoved {
		/// Previous index.
		from: usize,
		/// New index.
		to: usize,
	},
	/// The element the editor considers current changed.
	CurrentRecordChanged {
		/// New current element.
		element_index: usize,
	},
	/// A tier value changed.
	TierChange {
		/// Index of the record.
		element_index: usize,
		/// Changed tier.
		tier: String,
		/// True for transient live-typing changes.
		value_adjusting: bool,
	},
	/// Tier order, visibility, locking, the blind set or the set of
	/// declared tiers changed.
	TierViewChanged,
	/// A derived tier was shown or hidden.
	DerivedTierToggled {
		/// Extension name.
		extension: &'static str,
		/// New visibility.
		visible: bool,
	},
	/// Syllabification edit mode was entered or left.
	SyllabificationEditMode {
		/// True while edit mode is on.
		active: bool,
	},
	/// The caret moved to a new semantic location.
	CaretMoved {
		/// New caret location.
		location: TranscriptElementLocation,
	},
	/// Session date or media location changed.
	SessionMetadataChanged,
	/// The unsaved-changes flag flipped.
	ModifiedFlagChanged(bool),
	/// The session is being replaced by a copy freshly loaded from disk.
	EditorReloadFromDisk,
}

impl EditorEvent {
	/// Kind of this event.
	pub fn kind(&self) -> EventKind {
		EventKind::from(self)
	}

	/// Returns true for events that invalidate the document layout.
	pub fn is_structural(&self) -> bool {
		matches!(
			self,
			Self::SessionChanged
				| Self::RecordAdded { .. }
				| Self::RecordDeleted { .. }
				| Self::RecordMoved { .. }
				| Self::TierViewChanged
				| Self::EditorReloadFromDisk
		)
	}
}

#[cfg(test)]
mod tests;
