//! Edits, undo history and event delivery for a session editor.
//!
//! Every mutation of a [`Session`](tierline_model::Session) made by the
//! editor is a [`SessionEdit`] posted to the [`UndoManager`]. Applying an
//! edit yields the [`EditorEvent`]s describing what changed; the
//! [`EventManager`] delivers those to subscribers either synchronously or on
//! the next owner cycle.

/// Edit objects and their inverse operations.
pub mod edits;
/// Error types.
pub mod error;
/// Event payloads and the event manager.
pub mod events;
/// Grouped undo/redo history.
pub mod undo;

pub use edits::{
	AddElementEdit, AddTierEdit, ChangeCommentEdit, ChangeGemEdit, ChangeSpeakerEdit, DeleteElementEdit,
	DuplicateRecordEdit, EditContext, MediaLocationEdit, MoveElementEdit, RemoveTierEdit, RenameTierEdit,
	ResetSyllabificationEdit, ScTypeEdit, SessionDateEdit, SessionEdit, TierEdit, TierViewEdit,
	ToggleBlindTierEdit, ToggleDiphthongEdit,
};
pub use error::{EditError, Result};
pub use events::{Delivery, EditorEvent, EventKind, EventManager, EventSender, SubscriptionId};
pub use undo::{DEFAULT_UNDO_LIMIT, UndoGroup, UndoManager};
