//! Detecting and absorbing changes made to the session file on disk.

use chrono::{DateTime, Utc};
use tierline_edit::EditorEvent;
use tierline_model::Session;
use tracing::{debug, info};

use super::SessionEditor;

/// Result of comparing the loaded session with the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalChange {
	/// The file was not modified since it was loaded.
	Unchanged,
	/// The file is newer than the loaded session.
	Diverged {
		loaded: DateTime<Utc>,
		disk: DateTime<Utc>,
	},
	/// No load time was recorded.
	Unknown,
}

impl SessionEditor {
	/// Compares the recorded load time with the file's modification time.
	pub fn check_external_modification(&self, disk_mtime: DateTime<Utc>) -> ExternalChange {
		match self.loaded_at {
			Some(loaded) if disk_mtime > loaded => {
				debug!(%loaded, disk = %disk_mtime, "session file changed on disk");
				ExternalChange::Diverged {
					loaded,
					disk: disk_mtime,
				}
			}
			Some(_) => ExternalChange::Unchanged,
			None => ExternalChange::Unknown,
		}
	}

	/// Replaces the session with a copy freshly read from disk.
	///
	/// Undo history and uncommitted buffer text are discarded.
	pub fn reload_from_disk(&mut self, session: Session, mtime: DateTime<Utc>) {
		info!(elements = session.transcript().len(), "reloading session from disk");
		self.session = session;
		self.loaded_at = Some(mtime);
		self.undo.clear();
		self.diagnostics.clear();
		self.find.invalidate();
		self.dispatch([EditorEvent::EditorReloadFromDisk, EditorEvent::SessionChanged]);
		let last = self.session.transcript().len().saturating_sub(1);
		if self.current > last {
			self.dispatch([EditorEvent::CurrentRecordChanged { element_index: last }]);
		}
		self.set_modified(false);
	}
}
