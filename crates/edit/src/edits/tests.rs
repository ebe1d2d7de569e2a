use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tierline_model::{
	Comment, CommentType, ModelError, Participant, ParticipantRole, Session, Speaker,
	SyllableConstituentType, SystemTier, TierContent, TierDescription, TierType, TranscriptElement,
};

use super::*;
use crate::error::EditError;

fn session() -> Session {
	let mut session = Session::new("corpus", "s1");
	session.add_participant(Participant::new("CHI", ParticipantRole::TargetChild));
	session.add_participant(Participant::new("MOT", ParticipantRole::Mother));
	let mut record = session.new_record(Speaker::participant("CHI"));
	record.tier_mut("Orthography").unwrap().set_text("hi there");
	record.tier_mut("IPA Target").unwrap().set_text("/hi ðɛr/");
	session.transcript_mut().push(TranscriptElement::Record(record));
	session
}

fn content(session: &Session, tier: &str, text: &str) -> TierContent {
	TierContent::parse(session.tier_type(tier).unwrap(), text)
}

fn roundtrip(session: &mut Session, edit: impl Into<SessionEdit>) -> Vec<EditorEvent> {
	let before = session.clone();
	let mut current = 0;
	let mut edit = edit.into();
	let events = edit.apply(&mut EditContext::new(session, &mut current)).unwrap();
	assert_ne!(*session, before, "{} changed nothing", edit.name());
	edit.unapply(&mut EditContext::new(session, &mut current)).unwrap();
	assert_eq!(*session, before);
	events
}

#[test]
fn add_then_unapply_is_identity() {
	let mut session = session();
	let record = session.new_record(Speaker::participant("MOT"));
	let events = roundtrip(&mut session, AddElementEdit::new(1, TranscriptElement::Record(record)));
	assert!(matches!(events[0], EditorEvent::RecordAdded { element_index: 1, .. }));
}

#[test]
fn delete_only_record_then_undo() {
	let mut session = session();
	let id = session.transcript().record(0).unwrap().id();
	let before = session.clone();
	let mut current = 0;
	let mut edit = DeleteElementEdit::new(0);

	let mut cx = EditContext::new(&mut session, &mut current);
	edit.apply(&mut cx).unwrap();
	assert_eq!(cx.session.transcript().record_count(), 0);
	edit.unapply(&mut cx).unwrap();

	assert_eq!(session.transcript().record_count(), 1);
	assert_eq!(session.transcript().record(0).unwrap().id(), id);
	assert_eq!(session, before);
	assert_eq!(current, 0);
}

#[test]
fn move_restores_current_index() {
	let mut session = session();
	for _ in 0..2 {
		let record = session.new_record(Speaker::participant("MOT"));
		session.transcript_mut().push(TranscriptElement::Record(record));
	}
	let ids: Vec<_> = session.transcript().elements().iter().map(|e| e.id()).collect();
	let mut current = 0;
	let mut edit = MoveElementEdit::new(0, 2);
	let events = edit
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(current, 2);
	assert_eq!(session.transcript().index_of(ids[0]), Some(2));
	assert!(events.contains(&EditorEvent::RecordMoved { from: 0, to: 2 }));

	edit.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(current, 0);
	let after: Vec<_> = session.transcript().elements().iter().map(|e| e.id()).collect();
	assert_eq!(after, ids);
}

#[test]
fn ipa_change_recomputes_alignment() {
	let mut session = session();
	let before = session.clone();
	let new = content(&session, "IPA Actual", "hi dɛ");
	let mut current = 0;
	let mut edit = TierEdit::new(0, "IPA Actual", new);
	let events = edit
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let record = session.transcript().record(0).unwrap();
	assert_eq!(record.tier_text("Alignment"), "h↔h i↔i ð↔d ɛ↔ɛ r↔∅");
	assert_eq!(
		events.last(),
		Some(&EditorEvent::TierChange {
			element_index: 0,
			tier: SystemTier::Alignment.name().into(),
			value_adjusting: false,
		})
	);

	edit.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(session, before);
}

#[test]
fn adjusting_edits_skip_alignment() {
	let mut session = session();
	let new = content(&session, "IPA Actual", "hi");
	let mut current = 0;
	let mut edit = TierEdit::new(0, "IPA Actual", new).with_value_adjusting(true);
	let events = edit
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(events.len(), 1);
	assert_eq!(session.transcript().record(0).unwrap().tier_text("Alignment"), "");
}

#[test]
fn unparsable_text_is_kept_unvalidated() {
	let mut session = session();
	let new = content(&session, "Segment", "1:00-0:30");
	assert!(!new.is_valid());
	let mut current = 0;
	TierEdit::new(0, "Segment", new)
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(session.transcript().record(0).unwrap().tier_text("Segment"), "1:00-0:30");
}

#[test]
fn blind_edit_writes_transcriber_value() {
	let mut session = session();
	let new = content(&session, "Orthography", "hi dere");
	let mut current = 0;
	let mut edit = TierEdit::new(0, "Orthography", new.clone()).for_transcriber("alice");
	edit.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let tier = session.transcript().record(0).unwrap().tier("Orthography").unwrap();
	assert_eq!(tier.text(), "hi there");
	assert_eq!(tier.blind_content("alice"), Some(&new));

	edit.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let tier = session.transcript().record(0).unwrap().tier("Orthography").unwrap();
	assert_eq!(tier.blind_content("alice"), None);
}

#[test]
fn tier_view_blind_and_tier_edits_invert() {
	let mut session = session();
	let mut view = session.tier_view().clone();
	view.get_mut("Notes").unwrap().locked = true;
	roundtrip(&mut session, TierViewEdit::new(view));
	roundtrip(&mut session, ToggleBlindTierEdit::new("Orthography"));
	roundtrip(
		&mut session,
		AddTierEdit::new(TierDescription::new("Morphology", TierType::Text)),
	);
	roundtrip(&mut session, ChangeSpeakerEdit::new(0, Speaker::Unknown));
}

#[test]
fn reset_syllabification_discards_manual_codes() {
	let mut session = session();
	let mut current = 0;
	ScTypeEdit::new(0, "IPA Target", 0, SyllableConstituentType::Ambisyllabic)
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let events = roundtrip(&mut session, ResetSyllabificationEdit::new(0, "IPA Target"));
	assert_eq!(
		events,
		[EditorEvent::TierChange {
			element_index: 0,
			tier: "IPA Target".into(),
			value_adjusting: false,
		}]
	);
}

#[test]
fn remove_tier_redo_matches_first_apply() {
	let mut session = session();
	session
		.add_user_tier(TierDescription::new("Morphology", TierType::Text))
		.unwrap();
	session
		.transcript_mut()
		.record_mut(0)
		.unwrap()
		.tier_mut("Morphology")
		.unwrap()
		.set_text("co|hi");
	let mut current = 0;
	let mut edit = RemoveTierEdit::new("Morphology");
	edit.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let removed = session.clone();
	edit.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(
		session.transcript().record(0).unwrap().tier_text("Morphology"),
		"co|hi"
	);
	edit.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(session, removed);
}

#[test]
fn rename_tier_then_unapply_is_identity() {
	let mut session = session();
	session
		.add_user_tier(TierDescription::new("Morphology", TierType::Text))
		.unwrap();
	session
		.transcript_mut()
		.record_mut(0)
		.unwrap()
		.tier_mut("Morphology")
		.unwrap()
		.set_text("co|hi");
	session.set_blind("Morphology", true);

	let events = roundtrip(&mut session, RenameTierEdit::new("Morphology", "Mor"));
	assert_eq!(events, [EditorEvent::TierViewChanged]);

	let mut current = 0;
	let mut edit = RenameTierEdit::new("Morphology", "Mor");
	edit.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(session.transcript().record(0).unwrap().tier_text("Mor"), "co|hi");
	assert!(session.is_blind("Mor"));
	assert!(session.tier_view().get("Mor").is_some());
}

#[test]
fn rename_to_a_system_tier_is_refused() {
	let mut session = session();
	session
		.add_user_tier(TierDescription::new("Morphology", TierType::Text))
		.unwrap();
	let before = session.clone();
	let mut current = 0;
	let err = RenameTierEdit::new("Morphology", "Orthography")
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap_err();
	assert_eq!(err, EditError::Model(ModelError::SystemTier("Orthography".into())));
	assert_eq!(session, before);
}

#[test]
fn session_metadata_edits_invert() {
	let mut session = session();
	let events = roundtrip(&mut session, SessionDateEdit::new(NaiveDate::from_ymd_opt(2024, 3, 1)));
	assert_eq!(events, [EditorEvent::SessionMetadataChanged]);
	roundtrip(&mut session, MediaLocationEdit::new(Some("s1.wav".into())));

	session.media = Some("s1.wav".into());
	roundtrip(&mut session, MediaLocationEdit::new(None));
}

#[test]
fn duplicate_record_inserts_fresh_copy_after_it() {
	let mut session = session();
	let events = roundtrip(&mut session, DuplicateRecordEdit::new(0));
	assert!(matches!(events[0], EditorEvent::RecordAdded { element_index: 1, .. }));

	let original = session.transcript().record(0).unwrap().clone();
	let mut current = 0;
	let mut edit = DuplicateRecordEdit::new(0);
	let events = edit
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert!(events.contains(&EditorEvent::CurrentRecordChanged { element_index: 1 }));
	assert_eq!(current, 1);
	let copy = session.transcript().record(1).unwrap();
	assert_ne!(copy.id(), original.id());
	assert_eq!(copy.tier_text("IPA Target"), original.tier_text("IPA Target"));
	assert_eq!(copy.speaker(), original.speaker());
	let copy_id = copy.id();

	edit.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(current, 0);
	edit.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(session.transcript().record(1).unwrap().id(), copy_id);
}

#[test]
fn comment_edits() {
	let mut session = session();
	session
		.transcript_mut()
		.push(TranscriptElement::Comment(Comment::new(CommentType::Situation, "at home")));
	roundtrip(&mut session, ChangeCommentEdit::new(1, "in the park"));

	let before = session.clone();
	let mut current = 0;
	let err = ChangeCommentEdit::new(0, "x")
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap_err();
	assert_eq!(err, EditError::Model(ModelError::NotAComment(0)));
	assert_eq!(session, before);
}

#[test]
fn diphthong_toggle_is_symmetric() {
	let mut session = session();
	let ipa = session.transcript().record(0).unwrap().ipa_target().unwrap().clone();
	let partner = ipa.diphthong_partner(1).unwrap();
	assert_eq!(partner, 4);

	let mut current = 0;
	let mut edit = ToggleDiphthongEdit::new(0, "IPA Target", 1, partner);
	edit.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let after = session.transcript().record(0).unwrap().ipa_target().unwrap();
	assert!(after.get(1).unwrap().is_diphthong_member());
	assert!(after.get(4).unwrap().is_diphthong_member());

	edit.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let restored = session.transcript().record(0).unwrap().ipa_target().unwrap();
	assert_eq!(restored.syllabification(), ipa.syllabification());
}

#[test]
fn sc_type_leaving_nucleus_clears_both_diphthong_members() {
	let mut session = session();
	let mut current = 0;
	ToggleDiphthongEdit::new(0, "IPA Target", 1, 4)
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let before = session.clone();

	let mut edit = ScTypeEdit::new(0, "IPA Target", 1, SyllableConstituentType::Coda);
	edit.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	let ipa = session.transcript().record(0).unwrap().ipa_target().unwrap();
	assert_eq!(ipa.get(1).unwrap().constituent(), SyllableConstituentType::Coda);
	assert!(!ipa.get(1).unwrap().is_diphthong_member());
	assert!(!ipa.get(4).unwrap().is_diphthong_member());
	assert_eq!(ipa.get(4).unwrap().constituent(), SyllableConstituentType::Nucleus);

	edit.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap();
	assert_eq!(session, before);
}

#[test]
fn syllable_edits_need_valid_ipa() {
	let mut session = session();
	session
		.transcript_mut()
		.record_mut(0)
		.unwrap()
		.tier_mut("IPA Actual")
		.unwrap()
		.set_text("h3");
	let mut current = 0;
	let err = ResetSyllabificationEdit::new(0, "IPA Actual")
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap_err();
	assert_eq!(err, EditError::NotIpa("IPA Actual".into()));

	let err = ScTypeEdit::new(0, "IPA Target", 40, SyllableConstituentType::Onset)
		.apply(&mut EditContext::new(&mut session, &mut current))
		.unwrap_err();
	assert!(matches!(err, EditError::Model(ModelError::PhoneIndex { index: 40, .. })));
}

#[test]
fn unapply_before_apply_is_error() {
	let mut session = session();
	let mut current = 0;
	let err = DeleteElementEdit::new(0)
		.unapply(&mut EditContext::new(&mut session, &mut current))
		.unwrap_err();
	assert_eq!(err, EditError::NotApplied("delete element"));
}
