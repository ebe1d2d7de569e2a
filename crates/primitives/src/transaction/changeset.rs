use thiserror::Error;

use super::types::{Bias, Change, Insertion, Operation, Tendril};
use crate::Rope;
use crate::range::{CharIdx, CharLen};

/// Failure to build or apply a changeset against a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
	/// A change starts before the end of the previous change or ends before it starts.
	#[error("change {start}..{end} is out of order")]
	OutOfOrder {
		/// Start of the offending change.
		start: CharIdx,
		/// End of the offending change.
		end: CharIdx,
	},
	/// A change extends past the end of the buffer.
	#[error("change {start}..{end} exceeds buffer length {len}")]
	OutOfBounds {
		/// Start of the offending change.
		start: CharIdx,
		/// End of the offending change.
		end: CharIdx,
		/// Buffer length in characters.
		len: CharLen,
	},
	/// The changeset was built for a buffer of a different length.
	#[error("changeset expects {expected} chars, buffer has {actual}")]
	LengthMismatch {
		/// Length the changeset was built for.
		expected: CharLen,
		/// Actual buffer length.
		actual: CharLen,
	},
}

/// A sequence of retain/delete/insert operations spanning a whole buffer.
///
/// The document expresses every splice as a changeset so the same value can
/// be applied, inverted for recovery, and used to remap caret offsets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	changes: Vec<Operation>,
	len: usize,
	len_after: usize,
}

impl ChangeSet {
	/// Creates an identity changeset over a buffer of `len` characters.
	pub fn identity(len: CharLen) -> Self {
		let mut cs = Self::default();
		cs.retain(len);
		cs
	}

	/// Builds a changeset from sorted, non-overlapping changes.
	pub fn from_changes(
		len: CharLen,
		changes: impl IntoIterator<Item = Change>,
	) -> Result<Self, SpliceError> {
		let mut cs = Self::default();
		let mut last = 0;
		for change in changes {
			if change.start < last || change.end < change.start {
				return Err(SpliceError::OutOfOrder {
					start: change.start,
					end: change.end,
				});
			}
			if change.end > len {
				return Err(SpliceError::OutOfBounds {
					start: change.start,
					end: change.end,
					len,
				});
			}
			cs.retain(change.start - last);
			if let Some(text) = change.replacement {
				cs.insert(text);
			}
			cs.delete(change.end - change.start);
			last = change.end;
		}
		cs.retain(len - last);
		Ok(cs)
	}

	/// Builds a changeset replacing `[start, end)` with `text`.
	pub fn splice(
		len: CharLen,
		start: CharIdx,
		end: CharIdx,
		text: impl Into<Tendril>,
	) -> Result<Self, SpliceError> {
		Self::from_changes(len, [Change::replace(start, end, text)])
	}

	/// Returns the length of the source buffer (before changes).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns the length of the buffer after applying changes.
	pub fn len_after(&self) -> usize {
		self.len_after
	}

	/// Returns true if applying this changeset leaves the buffer untouched.
	pub fn is_empty(&self) -> bool {
		self.changes
			.iter()
			.all(|op| matches!(op, Operation::Retain(_)))
	}

	/// Returns a slice of all operations in this changeset.
	pub fn changes(&self) -> &[Operation] {
		&self.changes
	}

	fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}
		self.len += n;
		self.len_after += n;
		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}
		self.len += n;
		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	fn insert(&mut self, text: Tendril) {
		if text.is_empty() {
			return;
		}
		let ins = Insertion::new(text);
		self.len_after += ins.char_len();
		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] => prev.push_str(&ins),
			_ => self.changes.push(Operation::Insert(ins)),
		}
	}

	/// Applies this changeset to a buffer in place.
	///
	/// The buffer is left untouched when its length does not match.
	pub fn apply(&self, doc: &mut Rope) -> Result<(), SpliceError> {
		if doc.len_chars() != self.len {
			return Err(SpliceError::LengthMismatch {
				expected: self.len,
				actual: doc.len_chars(),
			});
		}

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => pos += n,
				Operation::Delete(n) => doc.remove(pos..pos + n),
				Operation::Insert(ins) => {
					doc.insert(pos, ins.text());
					pos += ins.char_len();
				}
			}
		}
		Ok(())
	}

	/// Inverts this changeset against the buffer it was built for.
	pub fn invert(&self, doc: &Rope) -> ChangeSet {
		let mut result = ChangeSet::default();
		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					result.retain(*n);
					pos += n;
				}
				Operation::Delete(n) => {
					let deleted: String = doc.slice(pos..pos + n).chars().collect();
					result.insert(deleted);
					pos += n;
				}
				Operation::Insert(ins) => result.delete(ins.char_len()),
			}
		}
		result
	}

	/// Maps a position through this changeset.
	///
	/// Positions inside a deleted range collapse to the deletion point.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		let mut old_pos = 0;
		let mut new_pos = 0;

		for op in &self.changes {
			if old_pos > pos {
				break;
			}
			match op {
				Operation::Retain(n) => {
					if old_pos + n > pos {
						return new_pos + (pos - old_pos);
					}
					old_pos += n;
					new_pos += n;
				}
				Operation::Delete(n) => {
					if old_pos + n > pos {
						return new_pos;
					}
					old_pos += n;
				}
				Operation::Insert(ins) => {
					if !(old_pos == pos && bias == Bias::Left) {
						new_pos += ins.char_len();
					}
				}
			}
		}

		new_pos + pos.saturating_sub(old_pos)
	}

	/// Returns the source range touched by this changeset, if any.
	pub fn touched(&self) -> Option<std::ops::Range<CharIdx>> {
		let mut pos = 0;
		let mut first = None;
		let mut last = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => pos += n,
				Operation::Delete(n) => {
					first.get_or_insert(pos);
					pos += n;
					last = pos;
				}
				Operation::Insert(_) => {
					first.get_or_insert(pos);
					last = pos;
				}
			}
		}
		first.map(|start| start..last)
	}
}
