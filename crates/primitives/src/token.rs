use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock.
///
/// Each long-running request (a search, a derived-tier recomputation) takes
/// a fresh generation; starting a newer request supersedes the older one.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
	current: Option<GenerationToken>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a new generation, cancelling the previous one if it is still live.
	pub fn advance(&mut self) -> GenerationToken {
		if let Some(prev) = self.current.take() {
			prev.cancel();
		}
		let generation = self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
		let token = GenerationToken::new(generation, CancellationToken::new());
		self.current = Some(token.clone());
		token
	}

	/// Returns the generation of the most recently started request.
	pub fn current(&self) -> Option<u64> {
		self.current.as_ref().map(GenerationToken::generation)
	}

	/// Returns true if `token` belongs to the latest generation and was not cancelled.
	pub fn is_current(&self, token: &GenerationToken) -> bool {
		self.current() == Some(token.generation()) && !token.is_cancelled()
	}
}

/// Generation-scoped cancellation token.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Creates a new generation token.
	pub fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	/// Creates a token that is never superseded, for synchronous callers.
	pub fn detached() -> Self {
		Self::new(0, CancellationToken::new())
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns the underlying cancellation token, e.g. to hand to a UI cancel button.
	pub fn cancellation(&self) -> &CancellationToken {
		&self.cancel
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn advance_cancels_previous_generation() {
		let mut clock = GenerationClock::new();
		let first = clock.advance();
		let second = clock.advance();
		assert!(first.is_cancelled());
		assert!(!second.is_cancelled());
		assert!(second.generation() > first.generation());
		assert!(clock.is_current(&second));
		assert!(!clock.is_current(&first));
	}

	#[test]
	fn explicit_cancel_is_not_current() {
		let mut clock = GenerationClock::new();
		let token = clock.advance();
		token.cancellation().cancel();
		assert!(!clock.is_current(&token));
	}
}
