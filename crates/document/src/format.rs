//! Tier content formatting.
//!
//! Converts typed tier values into content pieces and builds the complete
//! [`Batch`] for one transcript element: a label, content and line end per
//! visible tier, with derived-tier extensions appending their lines after
//! the tier they hang off.

use std::borrow::Cow;

use tierline_model::{
	Comment, Gem, Record, Session, Speaker, SystemTier, Tier, TierContent, TierType, TierValue,
	TranscriptElement, TranscriptElementLocation,
};

use crate::extension::{DerivedTier, HookContext};
use crate::span::{Batch, Span, SpanAttrs, SpanKind};

/// Text of the line end span closing every tier line.
pub const LINE_END: &str = "\n";

/// Rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
	/// Label lines CHAT style (`*CHI:`, `%pho:`) instead of by tier name.
	pub chat_tier_names: bool,
}

/// Label text for a line of `tier` spoken by `speaker`.
pub fn tier_label(tier: &str, speaker: &Speaker, options: &FormatOptions) -> String {
	let system = SystemTier::from_name(tier);
	if options.chat_tier_names {
		let name = match system {
			Some(SystemTier::Orthography) => format!("*{}", speaker.id()),
			Some(system) => system.chat_name().to_owned(),
			None => format!("%{tier}"),
		};
		format!("{name}:\t")
	} else {
		match system {
			Some(SystemTier::Orthography) => format!("{}\t", speaker.id()),
			_ => format!("{tier}\t"),
		}
	}
}

/// Content shown for `tier`: the active transcriber's blind value on blind
/// tiers, the shared value otherwise.
pub fn displayed_content<'a>(session: &Session, tier: &'a Tier) -> Cow<'a, TierContent> {
	match session.transcriber() {
		Some(t) if session.is_blind(tier.name()) => match tier.blind_content(&t.username) {
			Some(content) => Cow::Borrowed(content),
			None => Cow::Owned(TierContent::Value(tier.tier_type().empty_value())),
		},
		_ => Cow::Borrowed(tier.content()),
	}
}

/// Returns true if the content of `tier` accepts edits for the active user.
///
/// Computed tiers never do. With a non-validator transcriber only blind
/// tiers do. Locking is reported separately.
pub fn is_editable(session: &Session, tier: &Tier) -> bool {
	if tier.tier_type() == TierType::Alignment {
		return false;
	}
	session.is_validator() || session.is_blind(tier.name())
}

/// Splits tier content into text pieces whose concatenation is the content text.
pub fn content_pieces(content: &TierContent) -> Vec<String> {
	match content {
		TierContent::Value(TierValue::Orthography(ortho)) if !ortho.is_empty() => {
			let mut pieces = Vec::with_capacity(ortho.words().len() * 2);
			for (i, word) in ortho.words().iter().enumerate() {
				if i > 0 {
					pieces.push(" ".to_owned());
				}
				pieces.push(word.clone());
			}
			pieces
		}
		TierContent::Value(TierValue::Ipa(ipa)) if !ipa.is_empty() => {
			ipa.elements().iter().map(|e| e.text().to_owned()).collect()
		}
		other => vec![other.text()],
	}
}

/// Everything needed to render elements.
pub struct BatchContext<'a> {
	/// Source session.
	pub session: &'a Session,
	/// Rendering options.
	pub options: &'a FormatOptions,
	/// Registered extensions, in hook order.
	pub extensions: &'a [Box<dyn DerivedTier>],
	/// Element that receives derived-tier lines.
	pub focused: Option<usize>,
	/// Syllabification edit mode is on.
	pub syllable_edit: bool,
}

impl BatchContext<'_> {
	/// Builds the batch for the element at `element_index`.
	pub fn element(&self, element_index: usize) -> Option<Batch> {
		let mut batch = Batch::default();
		match self.session.transcript().get(element_index)? {
			TranscriptElement::Record(record) => self.record(element_index, record, &mut batch),
			TranscriptElement::Comment(comment) => self.comment(element_index, comment, &mut batch),
			TranscriptElement::Gem(gem) => self.gem(element_index, gem, &mut batch),
		}
		Some(batch)
	}

	fn record(&self, element_index: usize, record: &Record, batch: &mut Batch) {
		let hooks = HookContext {
			session: self.session,
			record,
			element_index,
			options: self.options,
			syllable_edit: self.syllable_edit,
		};
		let focused = self.focused == Some(element_index);
		for item in self.session.tier_view().items() {
			if !item.visible {
				continue;
			}
			let Some(tier) = record.tier(&item.tier_name) else {
				continue;
			};
			if tier.tier_type() == TierType::Alignment {
				continue;
			}
			let content = displayed_content(self.session, tier);
			let mut attrs = SpanAttrs::new(record.id(), element_index, tier.name(), SpanKind::Content);
			attrs.editable = is_editable(self.session, tier);
			attrs.locked = item.locked;
			attrs.unvalidated = !content.is_valid();

			let label = tier_label(tier.name(), record.speaker(), self.options);
			push_line(batch, label, content_pieces(&content), attrs);

			if focused {
				for ext in self.extensions.iter().filter(|e| e.is_enabled()) {
					ext.after_tier(&hooks, tier.name(), batch);
				}
			}
		}
	}

	fn comment(&self, element_index: usize, comment: &Comment, batch: &mut Batch) {
		let label = if self.options.chat_tier_names {
			format!("{}:\t", comment.kind.chat_label())
		} else {
			format!("{}\t", comment.kind)
		};
		let mut attrs = SpanAttrs::new(
			comment.id,
			element_index,
			TranscriptElementLocation::COMMENT_TIER,
			SpanKind::Content,
		);
		attrs.editable = self.session.is_validator();
		push_line(batch, label, vec![comment.text.clone()], attrs);
	}

	fn gem(&self, element_index: usize, gem: &Gem, batch: &mut Batch) {
		let label = if self.options.chat_tier_names {
			format!("{}:\t", gem.kind.chat_label())
		} else {
			format!("{}\t", gem.kind)
		};
		let mut attrs = SpanAttrs::new(
			gem.id,
			element_index,
			TranscriptElementLocation::GEM_TIER,
			SpanKind::Content,
		);
		attrs.editable = self.session.is_validator();
		push_line(batch, label, vec![gem.label.clone()], attrs);
	}
}

/// Appends a label, content pieces and a line end sharing `content` attributes.
pub fn push_line(batch: &mut Batch, label: String, pieces: Vec<String>, content: SpanAttrs) {
	let mut label_attrs = content.clone();
	label_attrs.kind = SpanKind::Label;
	label_attrs.editable = false;
	batch.push(Span::new(label, label_attrs));

	let mut end_attrs = content.clone();
	end_attrs.kind = SpanKind::LineEnd;
	end_attrs.editable = false;

	if pieces.is_empty() {
		batch.push(Span::new(String::new(), content));
	} else {
		for piece in pieces {
			batch.push(Span::new(piece, content.clone()));
		}
	}
	batch.push(Span::new(LINE_END, end_attrs));
}
