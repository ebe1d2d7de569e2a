//! The linear transcript document.
//!
//! A session is rendered into one text buffer: one line per visible tier of
//! each record, one line per comment or gem, and derived lines (syllables,
//! phone alignment) after their source tiers on the focused record. Every
//! character of the buffer belongs to a [`Span`] whose attributes tie it to
//! an element and tier, and the [`PositionMap`] converts between buffer
//! offsets and [`TranscriptElementLocation`](tierline_model::TranscriptElementLocation)s.
//!
//! [`TranscriptDocument`] owns the buffer. It never mutates the session:
//! user edits pass its filter chain and come back as session edits for the
//! caller to post, and session changes reach it as events.

/// The document and its update paths.
pub mod document;
/// Error types.
pub mod error;
/// Derived-tier extensions.
pub mod extension;
/// Edit and navigation filters.
pub mod filter;
/// Tier content formatting and element batches.
pub mod format;
/// Caret freezing.
pub mod freeze;
/// Offset to location mapping.
pub mod map;
/// Syllabification edit mode.
pub mod mode;
/// Tagged text runs.
pub mod span;

pub use document::{DocumentOptions, DocumentOutcome, PreparedBatch, TranscriptDocument, ValidationDiagnostic};
pub use error::{DocumentError, Result};
pub use extension::{AlignmentExtension, DerivedTier, SyllabificationExtension, default_extensions};
pub use filter::{EditRequest, FilterMode, RejectReason};
pub use format::FormatOptions;
pub use freeze::FreezeToken;
pub use map::PositionMap;
pub use mode::SyllabificationEditState;
pub use span::{Batch, Span, SpanAttrs, SpanKind};
