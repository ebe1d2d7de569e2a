//! Tab separated transfer of records for the clipboard.
//!
//! Columns are `Speaker`, `Orthography`, `IPA Target`, `IPA Actual`,
//! `Segment`, `Notes`, then one column per user tier. Fields containing a
//! tab, a line break or a double quote are quoted, with inner quotes
//! doubled.

use tracing::warn;

use crate::error::{ModelError, Result};
use crate::participant::{Participant, Speaker};
use crate::record::Record;
use crate::session::Session;
use crate::tier::{SystemTier, TierDescription};
use crate::tier_view::TierView;

const SPEAKER_COLUMN: &str = "Speaker";

const SYSTEM_COLUMNS: [SystemTier; 5] = [
	SystemTier::Orthography,
	SystemTier::IpaTarget,
	SystemTier::IpaActual,
	SystemTier::Segment,
	SystemTier::Notes,
];

/// Records together with the session context needed to interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTransfer {
	/// Participants referenced by the records.
	pub participants: Vec<Participant>,
	/// Tier view of the source session.
	pub tier_view: TierView,
	/// User tier declarations of the source session.
	pub user_tiers: Vec<TierDescription>,
	/// Cloned records.
	pub records: Vec<Record>,
}

impl RecordTransfer {
	/// Clones the records at `element_indices` with their context.
	pub fn from_session(session: &Session, element_indices: &[usize]) -> Result<Self> {
		let records = element_indices
			.iter()
			.map(|&i| session.transcript().record(i).cloned())
			.collect::<Result<Vec<_>>>()?;

		let mut participants: Vec<Participant> = Vec::new();
		for record in &records {
			if let Speaker::Participant(id) = record.speaker()
				&& !participants.iter().any(|p| p.id == *id)
				&& let Some(p) = session.participant(id)
			{
				participants.push(p.clone());
			}
		}

		Ok(Self {
			participants,
			tier_view: session.tier_view().clone(),
			user_tiers: session.user_tiers().cloned().collect(),
			records,
		})
	}

	/// Column headers in output order.
	pub fn columns(&self) -> Vec<String> {
		std::iter::once(SPEAKER_COLUMN.to_owned())
			.chain(SYSTEM_COLUMNS.iter().map(|t| t.name().to_owned()))
			.chain(self.user_tiers.iter().map(|d| d.name.clone()))
			.collect()
	}

	/// Serializes to tab separated text with a header row.
	pub fn to_tsv(&self) -> String {
		let columns = self.columns();
		let mut out = String::new();
		write_row(&mut out, columns.iter().map(String::as_str));
		for record in &self.records {
			let fields: Vec<String> = columns
				.iter()
				.map(|column| {
					if column == SPEAKER_COLUMN {
						record.speaker().id().to_owned()
					} else {
						record.tier_text(column)
					}
				})
				.collect();
			write_row(&mut out, fields.iter().map(String::as_str));
		}
		out
	}

	/// Parses tab separated text into records shaped for `session`.
	///
	/// Columns naming tiers the session does not declare are ignored.
	/// Speakers not declared in the session become unknown. Tier text that
	/// does not parse is kept as an unvalidated value.
	pub fn from_tsv(session: &Session, text: &str) -> Result<Self> {
		let rows = split_rows(text)?;
		let Some((header, body)) = rows.split_first() else {
			return Err(ModelError::Transfer {
				line: 1,
				message: "missing header row".into(),
			});
		};
		if header.first().map(String::as_str) != Some(SPEAKER_COLUMN) {
			return Err(ModelError::Transfer {
				line: 1,
				message: format!("first column must be '{SPEAKER_COLUMN}'"),
			});
		}
		for column in header.iter().skip(1) {
			if session.tier_type(column).is_none() {
				warn!(column = %column, "transfer column ignored");
			}
		}

		let mut records = Vec::with_capacity(body.len());
		let mut participants: Vec<Participant> = Vec::new();
		for (row_index, row) in body.iter().enumerate() {
			if row.len() != header.len() {
				return Err(ModelError::Transfer {
					line: row_index + 2,
					message: format!("expected {} fields, found {}", header.len(), row.len()),
				});
			}
			let speaker = match session.participant(&row[0]) {
				Some(p) => {
					if !participants.iter().any(|q| q.id == p.id) {
						participants.push(p.clone());
					}
					Speaker::participant(p.id.clone())
				}
				None => Speaker::Unknown,
			};
			let mut record = session.new_record(speaker);
			for (column, value) in header.iter().zip(row).skip(1) {
				if let Some(tier) = record.tier_mut(column) {
					tier.set_text(value);
				}
			}
			records.push(record);
		}

		Ok(Self {
			participants,
			tier_view: session.tier_view().clone(),
			user_tiers: session.user_tiers().cloned().collect(),
			records,
		})
	}
}

fn write_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
	for (i, field) in fields.enumerate() {
		if i > 0 {
			out.push('\t');
		}
		if field.contains(['\t', '\n', '\r', '"']) {
			out.push('"');
			out.push_str(&field.replace('"', "\"\""));
			out.push('"');
		} else {
			out.push_str(field);
		}
	}
	out.push('\n');
}

fn split_rows(text: &str) -> Result<Vec<Vec<String>>> {
	let mut rows = Vec::new();
	let mut row = Vec::new();
	let mut field = String::new();
	let mut quoted = false;
	let mut line = 1;
	let mut chars = text.chars().peekable();

	while let Some(ch) = chars.next() {
		if quoted {
			match ch {
				'"' if chars.peek() == Some(&'"') => {
					chars.next();
					field.push('"');
				}
				'"' => quoted = false,
				'\n' => {
					line += 1;
					field.push(ch);
				}
				_ => field.push(ch),
			}
			continue;
		}
		match ch {
			'"' if field.is_empty() => quoted = true,
			'\t' => row.push(std::mem::take(&mut field)),
			'\r' if chars.peek() == Some(&'\n') => {}
			'\n' => {
				row.push(std::mem::take(&mut field));
				rows.push(std::mem::take(&mut row));
				line += 1;
			}
			_ => field.push(ch),
		}
	}
	if quoted {
		return Err(ModelError::Transfer {
			line,
			message: "unterminated quoted field".into(),
		});
	}
	if !field.is_empty() || !row.is_empty() {
		row.push(field);
		rows.push(row);
	}
	Ok(rows)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::participant::ParticipantRole;
	use crate::tier::TierType;
	use crate::transcript::TranscriptElement;

	fn session() -> Session {
		let mut session = Session::new("c", "s");
		session.add_participant(Participant::new("CHI", ParticipantRole::TargetChild));
		session
			.add_user_tier(TierDescription::new("Morphology", TierType::Text))
			.unwrap();
		let mut record = session.new_record(Speaker::participant("CHI"));
		record.tier_mut("Orthography").unwrap().set_text("hi there");
		record.tier_mut("IPA Target").unwrap().set_text("hi ðɛr");
		record.tier_mut("Notes").unwrap().set_text("said \"hi\"\tloudly");
		record.tier_mut("Morphology").unwrap().set_text("co|hi");
		session.transcript_mut().push(TranscriptElement::Record(record));
		session
	}

	#[test]
	fn tsv_header_and_quoting() {
		let session = session();
		let transfer = RecordTransfer::from_session(&session, &[0]).unwrap();
		let tsv = transfer.to_tsv();
		let mut lines = tsv.lines();
		assert_eq!(
			lines.next(),
			Some("Speaker\tOrthography\tIPA Target\tIPA Actual\tSegment\tNotes\tMorphology")
		);
		assert_eq!(
			lines.next(),
			Some("CHI\thi there\thi ðɛr\t\t0:00.000-0:00.000\t\"said \"\"hi\"\"\tloudly\"\tco|hi")
		);
		assert_eq!(transfer.participants.len(), 1);
	}

	#[test]
	fn tsv_parses_back_into_equal_tiers() {
		let session = session();
		let transfer = RecordTransfer::from_session(&session, &[0]).unwrap();
		let parsed = RecordTransfer::from_tsv(&session, &transfer.to_tsv()).unwrap();
		let (a, b) = (&transfer.records[0], &parsed.records[0]);
		assert_eq!(a.speaker(), b.speaker());
		for tier in a.tiers().filter(|t| t.name() != "Alignment") {
			assert_eq!(tier.content(), b.tier(tier.name()).unwrap().content());
		}
		assert_ne!(a.id(), b.id());
	}

	#[test]
	fn unknown_speaker_and_bad_ipa() {
		let session = session();
		let tsv = "Speaker\tIPA Target\tBogus\nMOT\th3\tx\n";
		let parsed = RecordTransfer::from_tsv(&session, tsv).unwrap();
		let record = &parsed.records[0];
		assert!(record.speaker().is_unknown());
		assert!(!record.tier("IPA Target").unwrap().content().is_valid());
	}

	#[test]
	fn malformed_rows() {
		let session = session();
		assert!(RecordTransfer::from_tsv(&session, "").is_err());
		assert!(RecordTransfer::from_tsv(&session, "Orthography\nhi\n").is_err());
		let err = RecordTransfer::from_tsv(&session, "Speaker\tNotes\nCHI\n").unwrap_err();
		assert_eq!(
			err,
			ModelError::Transfer {
				line: 2,
				message: "expected 2 fields, found 1".into()
			}
		);
		assert!(RecordTransfer::from_tsv(&session, "Speaker\n\"CHI").is_err());
	}

	#[test]
	fn non_record_index_is_error() {
		let session = session();
		assert!(RecordTransfer::from_session(&session, &[3]).is_err());
	}
}
