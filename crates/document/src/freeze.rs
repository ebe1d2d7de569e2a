//! Caret freezing around programmatic rewrites.
//!
//! While the document rewrites its own buffer the caret moves as a side
//! effect. Those moves must not reach listeners as user caret motion.
//! Freezing is nestable: each [`CaretFreeze::freeze`] returns a token for
//! its level, and the caret thaws only once the outermost level is released.

use tracing::warn;

/// Token for one freeze level.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a freeze lasts until its token is released"]
pub struct FreezeToken {
	level: u32,
	generation: u64,
}

impl FreezeToken {
	/// Generation the freeze was taken at.
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

/// Nestable caret freeze counter.
#[derive(Debug, Default)]
pub struct CaretFreeze {
	level: u32,
	generation: u64,
	suppressed: bool,
}

impl CaretFreeze {
	/// Freezes the caret one level deeper.
	pub fn freeze(&mut self) -> FreezeToken {
		self.level += 1;
		self.generation += 1;
		FreezeToken {
			level: self.level,
			generation: self.generation,
		}
	}

	/// Releases `token` and every level nested inside it.
	///
	/// Returns true if the caret is thawed and a caret change was suppressed
	/// while frozen.
	pub fn release(&mut self, token: FreezeToken) -> bool {
		if token.level > self.level {
			warn!(level = token.level, current = self.level, "stale caret freeze token");
			return false;
		}
		if token.level != self.level {
			warn!(level = token.level, current = self.level, "caret freeze released out of order");
		}
		self.level = token.level - 1;
		self.level == 0 && std::mem::take(&mut self.suppressed)
	}

	/// Returns true while any freeze level is held.
	pub fn is_frozen(&self) -> bool {
		self.level > 0
	}

	/// Number of freezes taken so far.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Records a caret change that was not reported. Returns true if frozen.
	pub fn suppress(&mut self) -> bool {
		if self.is_frozen() {
			self.suppressed = true;
		}
		self.is_frozen()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nested_freezes_thaw_at_outermost() {
		let mut freeze = CaretFreeze::default();
		let outer = freeze.freeze();
		let inner = freeze.freeze();
		assert!(inner.generation() > outer.generation());
		assert!(freeze.suppress());
		assert!(!freeze.release(inner));
		assert!(freeze.is_frozen());
		assert!(freeze.release(outer));
		assert!(!freeze.is_frozen());
		assert!(!freeze.suppress());
	}

	#[test]
	fn releasing_outer_unwinds_inner() {
		let mut freeze = CaretFreeze::default();
		let outer = freeze.freeze();
		let inner = freeze.freeze();
		assert!(!freeze.release(outer));
		assert!(!freeze.is_frozen());
		assert!(!freeze.release(inner));
		assert!(!freeze.is_frozen());
	}
}
