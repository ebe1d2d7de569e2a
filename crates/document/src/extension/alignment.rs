use tierline_model::{Session, SystemTier, TierView};

use super::{DerivedTier, HookContext};
use crate::format::{push_line, tier_label};
use crate::span::{Batch, ComponentOverride, SpanAttrs, SpanKind};

/// Renders the phone alignment line of the focused record.
///
/// The line follows IPA Actual when visible, else IPA Target, else the last
/// visible tier. It is never editable.
#[derive(Debug, Clone)]
pub struct AlignmentExtension {
	enabled: bool,
}

impl AlignmentExtension {
	/// Extension name.
	pub const NAME: &'static str = "alignment";

	/// Creates the extension, enabled.
	pub fn new() -> Self {
		Self { enabled: true }
	}

	/// Tier the alignment line is placed after.
	pub fn parent_tier(view: &TierView) -> Option<&str> {
		[SystemTier::IpaActual, SystemTier::IpaTarget]
			.into_iter()
			.map(SystemTier::name)
			.find(|t| view.is_visible(t))
			.or_else(|| {
				view.visible_tiers()
					.filter(|t| *t != SystemTier::Alignment.name())
					.last()
			})
	}
}

impl Default for AlignmentExtension {
	fn default() -> Self {
		Self::new()
	}
}

impl DerivedTier for AlignmentExtension {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn is_enabled(&self) -> bool {
		self.enabled
	}

	fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	fn depends_on(&self, _session: &Session, tier: &str) -> bool {
		matches!(
			SystemTier::from_name(tier),
			Some(SystemTier::IpaTarget | SystemTier::IpaActual | SystemTier::Alignment)
		)
	}

	fn after_tier(&self, cx: &HookContext<'_>, tier: &str, batch: &mut Batch) {
		if Self::parent_tier(cx.session.tier_view()) != Some(tier) {
			return;
		}
		let name = SystemTier::Alignment.name();
		if !cx.record.has_tier(name) {
			return;
		}

		let alignment = match cx.record.alignment() {
			Some(a) if !a.is_empty() => a.clone(),
			_ => cx.record.compute_alignment(),
		};
		let mut attrs = SpanAttrs::new(cx.record.id(), cx.element_index, name, SpanKind::Content);
		attrs.parent_tier = Some(tier.to_owned());
		attrs.component = Some(ComponentOverride::PhoneAlignment);

		let label = tier_label(name, cx.record.speaker(), cx.options);
		push_line(batch, label, vec![alignment.to_string()], attrs);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use tierline_model::{Participant, ParticipantRole, Speaker, TranscriptElement};

	use super::*;
	use crate::format::FormatOptions;

	fn session() -> Session {
		let mut session = Session::new("corpus", "s1");
		session.add_participant(Participant::new("CHI", ParticipantRole::TargetChild));
		let mut record = session.new_record(Speaker::participant("CHI"));
		record.tier_mut("IPA Target").unwrap().set_text("/hi ðɛr/");
		record.tier_mut("IPA Actual").unwrap().set_text("/hi dɛ/");
		session.transcript_mut().push(TranscriptElement::Record(record));
		session
	}

	fn render(session: &Session, tier: &str) -> Batch {
		let options = FormatOptions::default();
		let cx = HookContext {
			session,
			record: session.transcript().record(0).unwrap(),
			element_index: 0,
			options: &options,
			syllable_edit: false,
		};
		let mut batch = Batch::default();
		AlignmentExtension::new().after_tier(&cx, tier, &mut batch);
		batch
	}

	#[test]
	fn follows_ipa_actual() {
		let session = session();
		assert!(render(&session, "IPA Target").spans.is_empty());
		let batch = render(&session, "IPA Actual");
		assert_eq!(batch.text(), "Alignment\th↔h i↔i ð↔d ɛ↔ɛ r↔∅\n");
		assert!(batch.spans.iter().all(|s| !s.attrs.editable));
		assert_eq!(batch.spans[1].attrs.component, Some(ComponentOverride::PhoneAlignment));
	}

	#[test]
	fn parent_falls_back() {
		let mut session = session();
		let mut view = session.tier_view().clone();
		view.get_mut("IPA Actual").unwrap().visible = false;
		assert_eq!(AlignmentExtension::parent_tier(&view), Some("IPA Target"));
		view.get_mut("IPA Target").unwrap().visible = false;
		assert_eq!(AlignmentExtension::parent_tier(&view), Some("Notes"));
		session.set_tier_view(view).unwrap();
		assert_eq!(render(&session, "Notes").tier_text("Alignment"), "h↔h i↔i ð↔d ɛ↔ɛ r↔∅");
	}
}
