use pretty_assertions::assert_eq;
use tierline_find::FindExpr;
use tierline_model::TranscriptElementLocation;

use crate::common::{assert_in_sync, editor, session};

#[test]
fn find_next_moves_caret_to_match() {
	let mut editor = editor(session());
	editor.set_find_expr(FindExpr::plain("there"));
	assert_eq!(editor.search().unwrap(), 1);

	let found = editor.find_next().unwrap().unwrap();
	assert_eq!(found.range.element_index, 0);
	assert_eq!(found.range.tier, "Orthography");
	assert_eq!(found.range.range, 3..8);
	assert_eq!(
		editor.document().caret_location(),
		Some(&TranscriptElementLocation::new(0, "Orthography", 3))
	);
	assert_eq!(editor.find_next().unwrap(), None);
}

#[test]
fn replace_all_is_one_undo_step() {
	let mut editor = editor(session());
	let original = editor.session().clone();
	editor.set_find_expr(FindExpr::regex("th(ere)"));

	let summary = editor.replace_all("wh$1").unwrap();
	assert_eq!(summary.replaced, 1);
	assert_eq!(summary.skipped, 0);
	let record = editor.session().transcript().record(0).unwrap();
	assert_eq!(record.tier_text("Orthography"), "hi where");
	assert_in_sync(&editor);

	assert!(editor.undo().unwrap());
	assert_eq!(editor.session(), &original);
	assert_in_sync(&editor);
}

#[test]
fn edits_invalidate_results() {
	let mut editor = editor(session());
	editor.set_find_expr(FindExpr::plain("bye"));
	assert_eq!(editor.search().unwrap(), 1);
	let found = editor.find_next().unwrap().unwrap();
	assert_eq!(found.range.element_index, 2);
	assert_eq!(editor.current_element(), 2);

	editor.replace_current("see you").unwrap();
	assert!(editor.find_manager().results().is_none());
	let record = editor.session().transcript().record(2).unwrap();
	assert_eq!(record.tier_text("Orthography"), "see you");
}
