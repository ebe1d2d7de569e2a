use tierline_model::tier::{ipa_tier_for_syllables, syllable_tier_for};
use tierline_model::{IpaTranscript, Session, TierType};

use super::{DerivedTier, HookContext};
use crate::format::{displayed_content, push_line, tier_label, LINE_END};
use crate::span::{Batch, Span, SpanAttrs, SpanKind, SyllableMeta};

/// Renders a syllabification line under every visible IPA tier.
///
/// Each IPA element is shown followed by `:` and its constituent code.
/// Codes of hidden constituents are omitted. Codes accept edits only while
/// syllabification edit mode is on.
#[derive(Debug, Clone)]
pub struct SyllabificationExtension {
	enabled: bool,
}

impl SyllabificationExtension {
	/// Extension name.
	pub const NAME: &'static str = "syllabification";

	/// Creates the extension, enabled.
	pub fn new() -> Self {
		Self { enabled: true }
	}
}

impl Default for SyllabificationExtension {
	fn default() -> Self {
		Self::new()
	}
}

impl DerivedTier for SyllabificationExtension {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn is_enabled(&self) -> bool {
		self.enabled
	}

	fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	fn depends_on(&self, session: &Session, tier: &str) -> bool {
		ipa_tier_for_syllables(tier).is_none() && session.tier_type(tier) == Some(TierType::Ipa)
	}

	fn after_tier(&self, cx: &HookContext<'_>, tier: &str, batch: &mut Batch) {
		let Some(source) = cx.record.tier(tier) else {
			return;
		};
		if source.tier_type() != TierType::Ipa {
			return;
		}
		let name = syllable_tier_for(tier);
		let mut base = SpanAttrs::new(cx.record.id(), cx.element_index, name.clone(), SpanKind::Content);
		base.parent_tier = Some(tier.to_owned());
		base.locked = cx.session.tier_view().is_locked(tier);

		let content = displayed_content(cx.session, source);
		let label = tier_label(&name, cx.record.speaker(), cx.options);
		match content.value().and_then(|v| v.as_ipa()) {
			Some(ipa) if !ipa.is_empty() => push_syllables(batch, label, ipa, base, cx.syllable_edit),
			_ => push_line(batch, label, Vec::new(), base),
		}
	}
}

fn push_syllables(batch: &mut Batch, label: String, ipa: &IpaTranscript, base: SpanAttrs, editable: bool) {
	let mut label_attrs = base.clone();
	label_attrs.kind = SpanKind::Label;
	batch.push(Span::new(label, label_attrs));

	for (phone_index, element) in ipa.elements().iter().enumerate() {
		let info = element.syllabification();
		let meta = |is_code| SyllableMeta {
			phone_index,
			info,
			is_code,
		};
		let mut attrs = base.clone();
		attrs.syllable = Some(meta(false));
		batch.push(Span::new(element.text(), attrs.clone()));

		if !info.constituent.is_hidden() {
			batch.push(Span::new(":", attrs));
			let mut code = base.clone();
			code.editable = editable;
			code.syllable = Some(meta(true));
			batch.push(Span::new(info.display_code().to_string(), code));
		}
	}

	let mut end = base;
	end.kind = SpanKind::LineEnd;
	batch.push(Span::new(LINE_END, end));
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use tierline_model::{Participant, ParticipantRole, Speaker, TranscriptElement};

	use super::*;
	use crate::format::FormatOptions;

	fn session(ipa: &str) -> Session {
		let mut session = Session::new("corpus", "s1");
		session.add_participant(Participant::new("CHI", ParticipantRole::TargetChild));
		let mut record = session.new_record(Speaker::participant("CHI"));
		record.tier_mut("IPA Target").unwrap().set_text(ipa);
		session.transcript_mut().push(TranscriptElement::Record(record));
		session
	}

	fn render(session: &Session, syllable_edit: bool) -> Batch {
		let record = session.transcript().record(0).unwrap();
		let options = FormatOptions::default();
		let cx = HookContext {
			session,
			record,
			element_index: 0,
			options: &options,
			syllable_edit,
		};
		let mut batch = Batch::default();
		SyllabificationExtension::new().after_tier(&cx, "IPA Target", &mut batch);
		batch
	}

	#[test]
	fn renders_codes_after_phones() {
		let session = session("/hi ðɛr/");
		let batch = render(&session, false);
		assert_eq!(batch.text(), "Target Syllables\th:Oi:N ð:Oɛ:Nr:C\n");
		assert!(batch.spans.iter().all(|s| !s.attrs.editable));
		assert!(batch
			.spans
			.iter()
			.all(|s| s.attrs.parent_tier.as_deref() == Some("IPA Target")));
	}

	#[test]
	fn codes_editable_in_edit_mode() {
		let session = session("/hi/");
		let batch = render(&session, true);
		let codes: Vec<_> = batch
			.spans
			.iter()
			.filter(|s| s.attrs.syllable.is_some_and(|m| m.is_code))
			.collect();
		assert_eq!(codes.len(), 2);
		assert!(codes.iter().all(|s| s.attrs.editable));
		assert_eq!(codes[1].attrs.syllable.unwrap().phone_index, 1);
		assert_eq!(codes[1].attrs.syllable.unwrap().color_class(), 'N');
	}

	#[test]
	fn unvalidated_ipa_renders_empty_line() {
		let session = session("h3");
		assert_eq!(render(&session, false).text(), "Target Syllables\t\n");
	}

	#[test]
	fn depends_only_on_ipa_tiers() {
		let session = session("/hi/");
		let ext = SyllabificationExtension::new();
		assert!(ext.depends_on(&session, "IPA Target"));
		assert!(ext.depends_on(&session, "IPA Actual"));
		assert!(!ext.depends_on(&session, "Target Syllables"));
		assert!(!ext.depends_on(&session, "Alignment"));
		assert!(!ext.depends_on(&session, "Orthography"));
	}
}
