use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tierline_document::{EditRequest, RejectReason};
use tierline_edit::{AddTierEdit, DuplicateRecordEdit, RenameTierEdit};
use tierline_model::{Gem, GemKind, Speaker, TierDescription, TierType, TranscriptElement, TierView};

use crate::common::{assert_in_sync, editor, session};

#[test]
fn delete_then_undo_restores_session_and_text() {
	let mut editor = editor(session());
	let session = editor.session().clone();
	let text = editor.document().text();

	editor.delete_element(1).unwrap();
	assert_eq!(editor.session().transcript().len(), 2);
	assert_in_sync(&editor);

	assert!(editor.undo().unwrap());
	assert_eq!(editor.session(), &session);
	assert_eq!(editor.document().text(), text);
}

#[test]
fn add_then_undo_restores_session_and_text() {
	let mut editor = editor(session());
	let session = editor.session().clone();
	let text = editor.document().text();

	editor
		.add_element(3, TranscriptElement::Gem(Gem::new(GemKind::Begin, "bath")))
		.unwrap();
	assert_in_sync(&editor);
	assert!(editor.undo().unwrap());
	assert_eq!(editor.session(), &session);
	assert_eq!(editor.document().text(), text);

	assert!(editor.redo().unwrap());
	assert_eq!(editor.session().transcript().len(), 4);
	assert_in_sync(&editor);
}

#[test]
fn add_record_at_focused_index_keeps_buffer_in_sync() {
	let mut editor = editor(session());
	assert_eq!(editor.current_element(), 0);
	let record = editor.session().new_record(Speaker::participant("CHI"));
	editor.add_element(0, TranscriptElement::Record(record)).unwrap();
	assert_eq!(editor.document().focused(), 0);
	assert_in_sync(&editor);

	assert!(editor.undo().unwrap());
	assert_in_sync(&editor);
}

#[test]
fn duplicate_record_then_undo() {
	let mut editor = editor(session());
	let session = editor.session().clone();
	let text = editor.document().text();

	editor.post(DuplicateRecordEdit::new(0)).unwrap();
	let transcript = editor.session().transcript();
	assert_eq!(transcript.len(), 4);
	assert_ne!(transcript.record(1).unwrap().id(), transcript.record(0).unwrap().id());
	assert_eq!(transcript.record(1).unwrap().tier_text("Orthography"), "hi there");
	assert_eq!(editor.current_element(), 1);
	assert_in_sync(&editor);

	assert!(editor.undo().unwrap());
	assert_eq!(editor.session(), &session);
	assert_eq!(editor.document().text(), text);
}

#[test]
fn rename_tier_relabels_every_record() {
	let mut editor = editor(session());
	editor
		.post(AddTierEdit::new(TierDescription::new("Morphology", TierType::Text)))
		.unwrap();
	let before = editor.session().clone();

	editor.post(RenameTierEdit::new("Morphology", "Mor")).unwrap();
	let text = editor.document().text();
	assert!(text.contains("Mor\t"));
	assert!(!text.contains("Morphology"));
	assert!(editor.session().transcript().record(2).unwrap().has_tier("Mor"));
	assert_in_sync(&editor);

	assert!(editor.undo().unwrap());
	assert_eq!(editor.session(), &before);
	assert_in_sync(&editor);
}

#[test]
fn move_keeps_buffer_in_sync() {
	let mut editor = editor(session());
	editor.move_element(0, 2).unwrap();
	assert_in_sync(&editor);
	assert!(editor.undo().unwrap());
	assert_in_sync(&editor);
}

#[test]
fn locked_tiers_refuse_typing() {
	let mut session = session();
	let mut view = TierView::new(session.tier_view().items().to_vec());
	view.get_mut("Notes").unwrap().locked = true;
	session.set_tier_view(view).unwrap();
	let mut editor = editor(session);
	let before = editor.session().clone();
	let text = editor.document().text();

	let start = editor.document().map().content_range(0, "Notes").unwrap().start;
	assert_eq!(
		editor.edit_text(EditRequest::insert(start, "x")).unwrap(),
		Some(RejectReason::Locked)
	);
	editor.flush().unwrap();
	assert_eq!(editor.document().text(), text);
	assert_eq!(editor.session(), &before);
	assert!(!editor.is_modified());
}

proptest! {
	#[test]
	fn document_offsets_round_trip(words in proptest::collection::vec("[a-z]{1,6}", 1..5)) {
		let mut session = session();
		let text = words.join(" ");
		session
			.transcript_mut()
			.record_mut(2)
			.unwrap()
			.tier_mut("Orthography")
			.unwrap()
			.set_text(&text);
		let editor = editor(session);
		let doc = editor.document();
		for offset in 0..=doc.len_chars() {
			if let Some(loc) = doc.location_at_offset(offset) {
				prop_assert_eq!(doc.offset_at_location(&loc), Some(offset));
			}
		}
	}
}
