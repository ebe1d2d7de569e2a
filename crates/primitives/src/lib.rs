//! Core buffer types shared by the transcript engine: character indices,
//! changesets used to splice the linear document, and generation tokens
//! used to discard superseded work.

/// Character index types.
pub mod range;
/// Generation-scoped cancellation tokens.
pub mod token;
/// Splice primitives for the linear document buffer.
pub mod transaction;

pub use range::{CharIdx, CharLen};
pub use ropey::{Rope, RopeSlice};
pub use token::{GenerationClock, GenerationToken};
pub use transaction::{Bias, Change, ChangeSet, Operation, SpliceError};
