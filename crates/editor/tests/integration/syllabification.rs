use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

use tierline_document::{EditRequest, SyllabificationExtension};
use tierline_edit::{Delivery, EditorEvent, EventKind};

use crate::common::{assert_in_sync, editor, session};

#[test]
fn diphthong_toggle_through_edit_mode() {
	let mut editor = editor(session());
	let original = editor.session().clone();
	let start = editor
		.document()
		.map()
		.content_range(0, "Target Syllables")
		.unwrap()
		.start;
	editor.set_caret(start).unwrap();

	editor.enter_syllabification_edit().unwrap();
	assert!(editor.document().edit_state().is_active());
	assert_eq!(editor.document().caret(), start + 2);
	editor.step_caret(true).unwrap();
	assert_eq!(editor.document().caret(), start + 5);

	assert_eq!(
		editor
			.edit_text(EditRequest::replace(start + 5..start + 6, "D"))
			.unwrap(),
		None
	);
	assert_ne!(editor.session(), &original);
	assert!(editor.is_modified());
	assert_in_sync(&editor);

	let ipa = editor.session().transcript().record(0).unwrap().ipa_target().unwrap();
	assert!(ipa.get(1).unwrap().is_diphthong_member());
	assert!(ipa.get(4).unwrap().is_diphthong_member());
	let map = editor.document().map();
	let runs = map.content_runs(0, "Target Syllables").unwrap();
	let classes: Vec<(usize, char)> = map.runs()[runs]
		.iter()
		.filter_map(|run| run.attrs.syllable.filter(|meta| meta.is_code))
		.map(|meta| (meta.phone_index, meta.color_class()))
		.collect();
	assert_eq!(classes, [(0, 'O'), (1, 'D'), (3, 'O'), (4, 'D'), (5, 'C')]);

	assert!(editor.undo().unwrap());
	assert_eq!(editor.session(), &original);
}

#[test]
fn hiding_syllables_leaves_edit_mode() {
	let mut editor = editor(session());
	let start = editor
		.document()
		.map()
		.content_range(0, "Target Syllables")
		.unwrap()
		.start;
	editor.set_caret(start).unwrap();
	editor.enter_syllabification_edit().unwrap();

	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	editor.events().subscribe(
		&[EventKind::SyllabificationEditMode],
		Delivery::Sync,
		move |event| sink.borrow_mut().push(event.clone()),
	);
	editor
		.set_derived_tier_visible(SyllabificationExtension::NAME, false)
		.unwrap();
	assert!(!editor.document().edit_state().is_active());
	assert_eq!(editor.document().tier_text(0, "Target Syllables"), None);
	assert_eq!(*seen.borrow(), vec![EditorEvent::SyllabificationEditMode { active: false }]);
}
