//! Splice primitives for the linear document buffer.
//!
//! Every buffer mutation the transcript document performs, whether a user
//! keystroke or a scoped rebuild of one element, is expressed as a
//! [`ChangeSet`]. The changeset can be inverted to restore the previous
//! buffer and used to map caret positions across the edit.

mod changeset;
mod types;

pub use changeset::{ChangeSet, SpliceError};
pub use types::{Bias, Change, Insertion, Operation, Tendril};
