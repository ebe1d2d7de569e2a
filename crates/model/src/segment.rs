use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Media time interval attached to a record, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaSegment {
	/// Start offset in milliseconds.
	pub start_ms: u64,
	/// End offset in milliseconds.
	pub end_ms: u64,
}

impl MediaSegment {
	/// Creates a segment.
	pub const fn new(start_ms: u64, end_ms: u64) -> Self {
		Self { start_ms, end_ms }
	}

	/// Returns the segment duration.
	pub const fn duration_ms(&self) -> u64 {
		self.end_ms.saturating_sub(self.start_ms)
	}

	/// Returns true for a zero-length segment.
	pub const fn is_empty(&self) -> bool {
		self.end_ms <= self.start_ms
	}

	/// Parses `start-end` where each side is `[h:]m:ss[.fff]` or plain seconds.
	pub fn parse(text: &str) -> Result<Self, ParseError> {
		let trimmed = text.trim();
		let lead = text.len() - text.trim_start().len();
		let Some((start, end)) = trimmed.split_once('-') else {
			return Err(ParseError::new("expected 'start-end'", lead));
		};
		let start_ms = parse_time(start.trim())
			.ok_or_else(|| ParseError::new("invalid start time", lead))?;
		let end_offset = lead + start.chars().count() + 1;
		let end_ms =
			parse_time(end.trim()).ok_or_else(|| ParseError::new("invalid end time", end_offset))?;
		if end_ms < start_ms {
			return Err(ParseError::new("segment ends before it starts", end_offset));
		}
		Ok(Self { start_ms, end_ms })
	}
}

fn parse_time(text: &str) -> Option<u64> {
	let (clock, frac) = match text.split_once('.') {
		Some((clock, frac)) => (clock, frac),
		None => (text, ""),
	};
	if frac.len() > 3 || !frac.chars().all(|c| c.is_ascii_digit()) {
		return None;
	}
	let millis = if frac.is_empty() {
		0
	} else {
		frac.parse::<u64>().ok()? * 10u64.pow(3 - frac.len() as u32)
	};

	let mut seconds = 0u64;
	let parts: Vec<&str> = clock.split(':').collect();
	if parts.is_empty() || parts.len() > 3 {
		return None;
	}
	for (i, part) in parts.iter().enumerate() {
		if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
			return None;
		}
		let value: u64 = part.parse().ok()?;
		if i > 0 && value >= 60 {
			return None;
		}
		seconds = seconds * 60 + value;
	}
	Some(seconds * 1000 + millis)
}

fn write_time(f: &mut fmt::Formatter<'_>, ms: u64) -> fmt::Result {
	let minutes = ms / 60_000;
	let seconds = (ms / 1000) % 60;
	write!(f, "{minutes}:{seconds:02}.{:03}", ms % 1000)
}

impl fmt::Display for MediaSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_time(f, self.start_ms)?;
		f.write_str("-")?;
		write_time(f, self.end_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_clock_format() {
		let seg = MediaSegment::parse("0:01.250-0:02.5").unwrap();
		assert_eq!(seg, MediaSegment::new(1250, 2500));
		assert_eq!(seg.to_string(), "0:01.250-0:02.500");
	}

	#[test]
	fn parse_hours_and_seconds() {
		assert_eq!(
			MediaSegment::parse("1:00:00-1:00:01.5").unwrap(),
			MediaSegment::new(3_600_000, 3_601_500)
		);
		assert_eq!(MediaSegment::parse("3-4").unwrap(), MediaSegment::new(3000, 4000));
	}

	#[test]
	fn reversed_segment_is_error() {
		let err = MediaSegment::parse("0:05.000-0:04.000").unwrap_err();
		assert_eq!(err.offset, 9);
	}

	#[test]
	fn garbage_is_error() {
		assert!(MediaSegment::parse("soon").is_err());
		assert!(MediaSegment::parse("0:61-0:62").is_err());
	}
}
