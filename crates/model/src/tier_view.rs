use serde::{Deserialize, Serialize};

/// Display settings of one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierViewItem {
	/// Tier name.
	pub tier_name: String,
	/// Whether the tier is shown in the document.
	pub visible: bool,
	/// Font description handed to the renderer.
	#[serde(default = "default_font")]
	pub font: String,
	/// Locked tiers reject document edits.
	#[serde(default)]
	pub locked: bool,
}

fn default_font() -> String {
	TierViewItem::DEFAULT_FONT.to_owned()
}

impl TierViewItem {
	/// Font used when none is configured.
	pub const DEFAULT_FONT: &'static str = "default";

	/// A visible, unlocked item with the default font.
	pub fn new(tier_name: impl Into<String>) -> Self {
		Self {
			tier_name: tier_name.into(),
			visible: true,
			font: default_font(),
			locked: false,
		}
	}

	/// Builder-style visibility.
	pub fn with_visible(mut self, visible: bool) -> Self {
		self.visible = visible;
		self
	}

	/// Builder-style lock state.
	pub fn with_locked(mut self, locked: bool) -> Self {
		self.locked = locked;
		self
	}
}

/// Ordered tier display settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierView {
	items: Vec<TierViewItem>,
}

impl TierView {
	/// Creates a view from items.
	pub fn new(items: Vec<TierViewItem>) -> Self {
		Self { items }
	}

	/// Items in order.
	pub fn items(&self) -> &[TierViewItem] {
		&self.items
	}

	/// Item for `tier`.
	pub fn get(&self, tier: &str) -> Option<&TierViewItem> {
		self.items.iter().find(|i| i.tier_name == tier)
	}

	/// Mutable item for `tier`.
	pub fn get_mut(&mut self, tier: &str) -> Option<&mut TierViewItem> {
		self.items.iter_mut().find(|i| i.tier_name == tier)
	}

	/// Position of `tier` in the view.
	pub fn index_of(&self, tier: &str) -> Option<usize> {
		self.items.iter().position(|i| i.tier_name == tier)
	}

	/// Returns true if `tier` is visible.
	pub fn is_visible(&self, tier: &str) -> bool {
		self.get(tier).is_some_and(|i| i.visible)
	}

	/// Returns true if `tier` is locked.
	pub fn is_locked(&self, tier: &str) -> bool {
		self.get(tier).is_some_and(|i| i.locked)
	}

	/// Names of visible tiers in order.
	pub fn visible_tiers(&self) -> impl Iterator<Item = &str> {
		self.items
			.iter()
			.filter(|i| i.visible)
			.map(|i| i.tier_name.as_str())
	}

	/// Appends an item.
	pub fn push(&mut self, item: TierViewItem) {
		self.items.push(item);
	}

	/// Removes the item for `tier`.
	pub fn remove(&mut self, tier: &str) -> Option<TierViewItem> {
		let index = self.index_of(tier)?;
		Some(self.items.remove(index))
	}
}
