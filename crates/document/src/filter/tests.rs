use pretty_assertions::assert_eq;
use tierline_model::{Participant, ParticipantRole, Speaker, TranscriptElement};

use super::*;
use crate::extension::default_extensions;
use crate::format::{BatchContext, FormatOptions};

struct Fixture {
	session: Session,
	map: PositionMap,
}

impl Fixture {
	fn new(syllable_edit: bool) -> Self {
		let mut session = Session::new("corpus", "s1");
		session.add_participant(Participant::new("CHI", ParticipantRole::TargetChild));
		let mut record = session.new_record(Speaker::participant("CHI"));
		record.tier_mut("Orthography").unwrap().set_text("hi there");
		record.tier_mut("IPA Target").unwrap().set_text("/hi ðɛr/");
		session.transcript_mut().push(TranscriptElement::Record(record));
		let mut fx = Self {
			session,
			map: PositionMap::new(),
		};
		fx.render(syllable_edit);
		fx
	}

	fn render(&mut self, syllable_edit: bool) {
		let extensions = default_extensions();
		let batch = BatchContext {
			session: &self.session,
			options: &FormatOptions::default(),
			extensions: &extensions,
			focused: Some(0),
			syllable_edit,
		}
		.element(0)
		.unwrap();
		self.map = batch.spans.into_iter().collect();
	}

	fn check(&self, mode: FilterMode, request: EditRequest) -> FilterVerdict {
		let target = EditTarget::resolve(&self.map, &request.range);
		let input = FilterInput {
			session: &self.session,
			map: &self.map,
			target: target.as_ref(),
		};
		run_chain(mode.edit_filters(), request, &input)
	}

	fn content_start(&self, tier: &str) -> usize {
		self.map.content_range(0, tier).unwrap().start
	}

	fn code_offset(&self, phone: usize) -> usize {
		self.map
			.runs()
			.iter()
			.find(|r| r.attrs.syllable.is_some_and(|m| m.is_code && m.phone_index == phone))
			.unwrap()
			.start
	}
}

#[test]
fn default_mode_accepts_content_edits() {
	let fx = Fixture::new(false);
	let at = fx.content_start("Orthography");
	assert_eq!(fx.check(FilterMode::Default, EditRequest::insert(at + 2, "!")), FilterVerdict::Accept);
	assert_eq!(
		fx.check(FilterMode::Default, EditRequest::delete(at..at + 3)),
		FilterVerdict::Accept
	);
}

#[test]
fn labels_and_spanning_edits_are_rejected() {
	let fx = Fixture::new(false);
	let not_editable = FilterVerdict::Reject(RejectReason::NotEditable);
	assert_eq!(fx.check(FilterMode::Default, EditRequest::insert(0, "x")), not_editable);
	let ortho = fx.map.content_range(0, "Orthography").unwrap();
	let ipa = fx.content_start("IPA Target");
	assert_eq!(
		fx.check(FilterMode::Default, EditRequest::delete(ortho.start..ipa)),
		not_editable
	);
	assert_eq!(
		fx.check(FilterMode::Default, EditRequest::insert(fx.code_offset(1), "N")),
		not_editable
	);
}

#[test]
fn locked_tier_is_rejected() {
	let mut fx = Fixture::new(false);
	let mut view = fx.session.tier_view().clone();
	view.get_mut("Orthography").unwrap().locked = true;
	fx.session.set_tier_view(view).unwrap();
	fx.render(false);
	let at = fx.content_start("Orthography");
	assert_eq!(
		fx.check(FilterMode::Default, EditRequest::insert(at, "x")),
		FilterVerdict::Reject(RejectReason::Locked)
	);
}

#[test]
fn line_breaks_are_stripped() {
	let fx = Fixture::new(false);
	let at = fx.content_start("Orthography");
	assert_eq!(
		fx.check(FilterMode::Default, EditRequest::insert(at, "a\nb\r\n")),
		FilterVerdict::Rewrite(Rewrite::Request(EditRequest::insert(at, "ab")))
	);
}

#[test]
fn diphthong_code_pairs_with_partner() {
	let fx = Fixture::new(true);
	let at = fx.code_offset(1);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::replace(at..at + 1, "D")),
		FilterVerdict::Rewrite(Rewrite::Edits(vec![
			ToggleDiphthongEdit::new(0, "IPA Target", 1, 4).into()
		]))
	);
}

#[test]
fn diphthong_code_on_onset_makes_nucleus_first() {
	let fx = Fixture::new(true);
	let at = fx.code_offset(3);
	let FilterVerdict::Rewrite(Rewrite::Edits(edits)) =
		fx.check(FilterMode::SyllabificationEdit, EditRequest::replace(at..at + 1, "d"))
	else {
		panic!("expected session edits");
	};
	assert_eq!(
		edits[0],
		SessionEdit::from(ScTypeEdit::new(0, "IPA Target", 3, SyllableConstituentType::Nucleus))
	);
	assert_eq!(edits.len(), 2);
}

#[test]
fn constituent_codes() {
	let fx = Fixture::new(true);
	let at = fx.code_offset(5);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::insert(at, "a")),
		FilterVerdict::Rewrite(Rewrite::Edits(vec![
			ScTypeEdit::new(0, "IPA Target", 5, SyllableConstituentType::Ambisyllabic).into()
		]))
	);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::insert(at, "C")),
		FilterVerdict::Reject(RejectReason::NoChange)
	);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::insert(at, "x")),
		FilterVerdict::Reject(RejectReason::InvalidCode)
	);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::insert(at, "NN")),
		FilterVerdict::Reject(RejectReason::NotEditable)
	);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::insert(at - 1, "N")),
		FilterVerdict::Reject(RejectReason::NotEditable)
	);
}

#[test]
fn hiatus_splits_members_only() {
	let mut fx = Fixture::new(true);
	let ipa = fx.session.transcript().record(0).unwrap().ipa_target().unwrap();
	assert_eq!(syllable_edits(ipa, 0, "IPA Target", 1, 'H'), None);

	let record = fx.session.transcript_mut().record_mut(0).unwrap();
	let ipa = record.tier_mut("IPA Target").unwrap().ipa_mut().unwrap();
	ipa.set_diphthong_member(1, true).unwrap();
	ipa.set_diphthong_member(4, true).unwrap();
	fx.render(true);
	let at = fx.code_offset(4);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::insert(at, "h")),
		FilterVerdict::Rewrite(Rewrite::Edits(vec![
			ToggleDiphthongEdit::new(0, "IPA Target", 4, 1).into()
		]))
	);
	assert_eq!(
		fx.check(FilterMode::SyllabificationEdit, EditRequest::insert(at, "D")),
		FilterVerdict::Reject(RejectReason::NoChange)
	);
}

#[test]
fn syllable_navigation_steps_between_codes() {
	let fx = Fixture::new(true);
	let nav = FilterMode::SyllabificationEdit.nav_filter();
	let first = fx.code_offset(0);
	let second = fx.code_offset(1);
	let last = fx.code_offset(5);
	let step = |from: usize, to: usize| nav(&NavRequest { from, to, step: true }, &fx.map);
	assert_eq!(step(first, first + 1), second);
	assert_eq!(step(second, second - 1), first);
	assert_eq!(step(first, first - 1), first);
	assert_eq!(step(last, last + 1), last);

	let jump = NavRequest {
		from: first,
		to: 0,
		step: false,
	};
	assert_eq!(nav(&jump, &fx.map), 0);
}
