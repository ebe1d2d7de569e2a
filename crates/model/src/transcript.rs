use serde::{Deserialize, Serialize};

use crate::element::{Comment, Gem};
use crate::error::{ModelError, Result};
use crate::ids::ElementId;
use crate::record::Record;

/// One element of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptElement {
	Record(Record),
	Comment(Comment),
	Gem(Gem),
}

impl TranscriptElement {
	/// Stable id of the element.
	pub fn id(&self) -> ElementId {
		match self {
			Self::Record(r) => r.id(),
			Self::Comment(c) => c.id,
			Self::Gem(g) => g.id,
		}
	}

	/// Returns the record, if this element is one.
	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Self::Record(r) => Some(r),
			_ => None,
		}
	}

	/// Returns the mutable record, if this element is one.
	pub fn as_record_mut(&mut self) -> Option<&mut Record> {
		match self {
			Self::Record(r) => Some(r),
			_ => None,
		}
	}

	/// Returns true for records.
	pub fn is_record(&self) -> bool {
		matches!(self, Self::Record(_))
	}
}

/// Ordered sequence of records, comments and gems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
	elements: Vec<TranscriptElement>,
}

impl Transcript {
	/// Number of elements.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	/// Returns true if there are no elements.
	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Element at `index`.
	pub fn get(&self, index: usize) -> Option<&TranscriptElement> {
		self.elements.get(index)
	}

	/// Mutable element at `index`.
	pub fn get_mut(&mut self, index: usize) -> Option<&mut TranscriptElement> {
		self.elements.get_mut(index)
	}

	/// All elements in order.
	pub fn elements(&self) -> &[TranscriptElement] {
		&self.elements
	}

	/// Record at element `index`.
	pub fn record(&self, index: usize) -> Result<&Record> {
		self.element(index)?
			.as_record()
			.ok_or(ModelError::NotARecord(index))
	}

	/// Mutable record at element `index`.
	pub fn record_mut(&mut self, index: usize) -> Result<&mut Record> {
		self.element_mut(index)?
			.as_record_mut()
			.ok_or(ModelError::NotARecord(index))
	}

	/// Element at `index`, or an index error.
	pub fn element(&self, index: usize) -> Result<&TranscriptElement> {
		let len = self.len();
		self.elements
			.get(index)
			.ok_or(ModelError::ElementIndex { index, len })
	}

	/// Mutable element at `index`, or an index error.
	pub fn element_mut(&mut self, index: usize) -> Result<&mut TranscriptElement> {
		let len = self.len();
		self.elements
			.get_mut(index)
			.ok_or(ModelError::ElementIndex { index, len })
	}

	/// Inserts an element at `index` (may equal the length).
	pub fn insert(&mut self, index: usize, element: TranscriptElement) -> Result<()> {
		if index > self.len() {
			return Err(ModelError::ElementIndex {
				index,
				len: self.len(),
			});
		}
		self.elements.insert(index, element);
		Ok(())
	}

	/// Appends an element, returning its index.
	pub fn push(&mut self, element: TranscriptElement) -> usize {
		self.elements.push(element);
		self.elements.len() - 1
	}

	/// Removes the element at `index`.
	pub fn remove(&mut self, index: usize) -> Result<TranscriptElement> {
		self.element(index)?;
		Ok(self.elements.remove(index))
	}

	/// Moves the element at `from` so that it ends up at index `to`.
	pub fn move_element(&mut self, from: usize, to: usize) -> Result<()> {
		let len = self.len();
		if to >= len {
			return Err(ModelError::ElementIndex { index: to, len });
		}
		let element = self.remove(from)?;
		self.elements.insert(to, element);
		Ok(())
	}

	/// Element index of the element with `id`.
	pub fn index_of(&self, id: ElementId) -> Option<usize> {
		self.elements.iter().position(|e| e.id() == id)
	}

	/// Records with their element indices.
	pub fn records(&self) -> impl Iterator<Item = (usize, &Record)> {
		self.elements
			.iter()
			.enumerate()
			.filter_map(|(i, e)| e.as_record().map(|r| (i, r)))
	}

	/// Number of records.
	pub fn record_count(&self) -> usize {
		self.records().count()
	}

	/// Element index of the `n`th record.
	pub fn element_index_of_record(&self, n: usize) -> Option<usize> {
		self.records().nth(n).map(|(i, _)| i)
	}

	/// Record ordinal of the record at element `index`.
	pub fn record_index_of_element(&self, index: usize) -> Option<usize> {
		self.records().position(|(i, _)| i == index)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::element::{CommentType, GemKind};
	use crate::participant::Speaker;

	fn sample() -> Transcript {
		let mut t = Transcript::default();
		t.push(TranscriptElement::Comment(Comment::new(CommentType::Comment, "start")));
		t.push(TranscriptElement::Record(Record::new(Speaker::Unknown, [])));
		t.push(TranscriptElement::Gem(Gem::new(GemKind::Lazy, "g")));
		t.push(TranscriptElement::Record(Record::new(Speaker::participant("CHI"), [])));
		t
	}

	#[test]
	fn record_index_mapping() {
		let t = sample();
		assert_eq!(t.record_count(), 2);
		assert_eq!(t.element_index_of_record(1), Some(3));
		assert_eq!(t.record_index_of_element(3), Some(1));
		assert_eq!(t.record_index_of_element(2), None);
		assert_eq!(t.record(0).unwrap_err(), ModelError::NotARecord(0));
	}

	#[test]
	fn move_element_keeps_ids() {
		let mut t = sample();
		let id = t.get(3).map(TranscriptElement::id).unwrap();
		t.move_element(3, 0).unwrap();
		assert_eq!(t.index_of(id), Some(0));
		assert!(t.move_element(0, 4).is_err());
	}

	#[test]
	fn insert_out_of_range() {
		let mut t = sample();
		let err = t
			.insert(9, TranscriptElement::Gem(Gem::new(GemKind::End, "")))
			.unwrap_err();
		assert_eq!(err, ModelError::ElementIndex { index: 9, len: 4 });
	}
}
