//! Time ranges handed to the media playback collaborator.
//!
//! The core never decodes or plays media; it only computes which interval
//! a playback request covers.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::Record;
use crate::transcript::{Transcript, TranscriptElement};

/// A media interval in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackRange {
	/// Start offset.
	pub start_ms: u64,
	/// End offset.
	pub end_ms: u64,
}

impl PlaybackRange {
	/// A caller-specified range.
	pub fn custom(start_ms: u64, end_ms: u64) -> Result<Self> {
		if end_ms < start_ms {
			return Err(ModelError::InvalidRange { start_ms, end_ms });
		}
		Ok(Self { start_ms, end_ms })
	}

	/// The record's segment, if it has a valid non-empty one.
	pub fn segment(record: &Record) -> Option<Self> {
		let segment = record.segment().filter(|s| !s.is_empty())?;
		Some(Self {
			start_ms: segment.start_ms,
			end_ms: segment.end_ms,
		})
	}

	/// Union of the segments of the contiguous run of records by the same
	/// speaker as the record at `element_index`.
	///
	/// Comments and gems inside the run do not break it; a record by another
	/// speaker does.
	pub fn speaker_turn(transcript: &Transcript, element_index: usize) -> Result<Option<Self>> {
		let speaker = transcript.record(element_index)?.speaker();
		let same_speaker = |e: &TranscriptElement| match e {
			TranscriptElement::Record(r) => Some(r.speaker() == speaker),
			_ => None,
		};

		let elements = transcript.elements();
		let mut first = element_index;
		for i in (0..element_index).rev() {
			match same_speaker(&elements[i]) {
				Some(true) => first = i,
				Some(false) => break,
				None => {}
			}
		}
		let mut last = element_index;
		for (i, element) in elements.iter().enumerate().skip(element_index + 1) {
			match same_speaker(element) {
				Some(true) => last = i,
				Some(false) => break,
				None => {}
			}
		}

		Ok(elements[first..=last]
			.iter()
			.filter_map(TranscriptElement::as_record)
			.filter_map(Self::segment)
			.reduce(|a, b| Self {
				start_ms: a.start_ms.min(b.start_ms),
				end_ms: a.end_ms.max(b.end_ms),
			}))
	}

	/// Duration in milliseconds.
	pub fn duration_ms(&self) -> u64 {
		self.end_ms - self.start_ms
	}
}
