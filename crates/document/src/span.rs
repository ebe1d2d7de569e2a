//! Tagged text runs.
//!
//! The document buffer is the concatenation of [`Span`]s. Each span carries
//! [`SpanAttrs`] naming the element and tier it belongs to and whether it
//! accepts edits. A [`Batch`] is the span sequence for one transcript element.

use tierline_model::{ElementId, SyllabificationInfo};

/// Role of a span within a tier line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
	/// Tier or speaker label. Never addressable.
	Label,
	/// Tier content.
	Content,
	/// Terminating line break.
	LineEnd,
}

/// Non-text rendering substitute for a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentOverride {
	/// Rendered as a two-row phone alignment grid.
	PhoneAlignment,
}

/// Syllabification metadata of a span in a syllable tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyllableMeta {
	/// Element index within the IPA transcript.
	pub phone_index: usize,
	/// Syllabification of that element at render time.
	pub info: SyllabificationInfo,
	/// True for the one-character constituent code.
	pub is_code: bool,
}

impl SyllableMeta {
	/// Display class used to colour the span: the rendered code.
	pub fn color_class(&self) -> char {
		self.info.display_code()
	}
}

/// Attributes attached to a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanAttrs {
	/// Owning transcript element.
	pub element_id: ElementId,
	/// Index of the owning element.
	pub element_index: usize,
	/// Owning tier, or the comment/gem pseudo tier.
	pub tier: String,
	/// Source tier of a derived tier.
	pub parent_tier: Option<String>,
	/// Role in the line.
	pub kind: SpanKind,
	/// Accepts edits.
	pub editable: bool,
	/// The tier is locked in the tier view.
	pub locked: bool,
	/// The tier holds unvalidated text.
	pub unvalidated: bool,
	/// Visual substitute, if any.
	pub component: Option<ComponentOverride>,
	/// Syllabification metadata for syllable tier spans.
	pub syllable: Option<SyllableMeta>,
}

impl SpanAttrs {
	/// Attributes for a span of `tier` on element `element_index`.
	pub fn new(element_id: ElementId, element_index: usize, tier: impl Into<String>, kind: SpanKind) -> Self {
		Self {
			element_id,
			element_index,
			tier: tier.into(),
			parent_tier: None,
			kind,
			editable: false,
			locked: false,
			unvalidated: false,
			component: None,
			syllable: None,
		}
	}

	/// Returns true if the span is tier content.
	pub fn is_content(&self) -> bool {
		self.kind == SpanKind::Content
	}
}

/// A run of text with attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
	/// Text of the run. May be empty for an empty tier.
	pub text: String,
	/// Attributes.
	pub attrs: SpanAttrs,
}

impl Span {
	/// Creates a span.
	pub fn new(text: impl Into<String>, attrs: SpanAttrs) -> Self {
		Self {
			text: text.into(),
			attrs,
		}
	}

	/// Length in characters.
	pub fn char_len(&self) -> usize {
		self.text.chars().count()
	}
}

/// Spans rendered for one transcript element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
	/// Spans in buffer order.
	pub spans: Vec<Span>,
}

impl Batch {
	/// Appends a span.
	pub fn push(&mut self, span: Span) {
		self.spans.push(span);
	}

	/// Full text of the batch.
	pub fn text(&self) -> String {
		self.spans.iter().map(|s| s.text.as_str()).collect()
	}

	/// Length in characters.
	pub fn char_len(&self) -> usize {
		self.spans.iter().map(Span::char_len).sum()
	}

	/// Concatenated content text of `tier`.
	pub fn tier_text(&self, tier: &str) -> String {
		self.spans
			.iter()
			.filter(|s| s.attrs.is_content() && s.attrs.tier == tier)
			.map(|s| s.text.as_str())
			.collect()
	}

	/// Spans belonging to `tier`, label and line end included.
	pub fn tier_spans(&self, tier: &str) -> Vec<Span> {
		self.spans
			.iter()
			.filter(|s| s.attrs.tier == tier)
			.cloned()
			.collect()
	}
}
