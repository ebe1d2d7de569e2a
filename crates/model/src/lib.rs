//! Session data model for tiered linguistic transcripts.
//!
//! A [`Session`] owns an ordered [`Transcript`] of records, comments and
//! gems. Each [`Record`] carries one typed [`Tier`] per declared tier name.
//! Tier text that fails to parse is kept verbatim as an unvalidated value so
//! that every tier can always be rendered and edited.

/// Phone alignment between IPA Target and IPA Actual.
pub mod alignment;
/// Comments and gems.
pub mod element;
/// Error types.
pub mod error;
/// Stable element identifiers.
pub mod ids;
/// IPA transcripts and syllabification.
pub mod ipa;
/// Semantic addresses into the transcript.
pub mod location;
/// Orthography tier values.
pub mod orthography;
/// Participants and speaker references.
pub mod participant;
/// Media time ranges handed to playback.
pub mod playback;
/// Records.
pub mod record;
/// Media segment tier values.
pub mod segment;
/// The session root.
pub mod session;
/// Typed tiers, tier values and system tier names.
pub mod tier;
/// Tier ordering, visibility and lock state.
pub mod tier_view;
/// Tabular clipboard transfer.
pub mod transfer;
/// Ordered transcript elements.
pub mod transcript;

pub use alignment::{AlignedPair, PhoneAlignment, PhoneRef};
pub use element::{Comment, CommentType, Gem, GemKind};
pub use error::{ModelError, ParseError, Result};
pub use ids::ElementId;
pub use ipa::{IpaElement, IpaElementKind, IpaTranscript, SyllabificationInfo, SyllableConstituentType};
pub use location::{TranscriptElementLocation, TranscriptElementRange};
pub use orthography::Orthography;
pub use participant::{Participant, ParticipantRole, Speaker};
pub use playback::PlaybackRange;
pub use record::Record;
pub use segment::MediaSegment;
pub use session::{RemovedTier, Session, Transcriber};
pub use tier::{SystemTier, Tier, TierContent, TierDescription, TierType, TierValue, UnvalidatedValue};
pub use tier_view::{TierView, TierViewItem};
pub use transcript::{Transcript, TranscriptElement};
pub use transfer::RecordTransfer;
