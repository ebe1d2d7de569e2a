use std::collections::VecDeque;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::{EditorEvent, EventKind};

/// How a subscriber receives events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
	/// Invoked from inside [`EventManager::fire`].
	Sync,
	/// Invoked from the next [`EventManager::pump`].
	Queued,
}

/// Handle returned by [`EventManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Sending half handed to worker tasks.
///
/// Events sent here are delivered to every subscriber on the next pump of
/// the owning manager, never from the worker itself.
pub type EventSender = mpsc::UnboundedSender<EditorEvent>;

type Handler = Box<dyn FnMut(&EditorEvent)>;

struct Subscription {
	id: SubscriptionId,
	kinds: Option<Vec<EventKind>>,
	delivery: Delivery,
	handler: Handler,
}

impl Subscription {
	fn wants(&self, kind: EventKind) -> bool {
		self.kinds.as_ref().is_none_or(|k| k.contains(&kind))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Audience {
	QueuedOnly,
	All,
}

/// Ordered event bus owned by the editor thread.
///
/// Subscribers are invoked in subscription order. Events queued for a later
/// cycle are delivered in the order they were fired or sent.
pub struct EventManager {
	subscriptions: Vec<Subscription>,
	next_id: u64,
	pending: VecDeque<(EditorEvent, Audience)>,
	tx: EventSender,
	rx: mpsc::UnboundedReceiver<EditorEvent>,
}

impl Default for EventManager {
	fn default() -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		Self {
			subscriptions: Vec::new(),
			next_id: 0,
			pending: VecDeque::new(),
			tx,
			rx,
		}
	}
}

impl std::fmt::Debug for EventManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventManager")
			.field("subscriptions", &self.subscriptions.len())
			.field("pending", &self.pending.len())
			.finish()
	}
}

impl EventManager {
	/// Creates a manager with no subscribers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for `kinds` (every kind when empty).
	pub fn subscribe(
		&mut self,
		kinds: &[EventKind],
		delivery: Delivery,
		handler: impl FnMut(&EditorEvent) + 'static,
	) -> SubscriptionId {
		let id = SubscriptionId(self.next_id);
		self.next_id += 1;
		self.subscriptions.push(Subscription {
			id,
			kinds: (!kinds.is_empty()).then(|| kinds.to_vec()),
			delivery,
			handler: Box::new(handler),
		});
		id
	}

	/// Removes a subscription. Returns false if it was already gone.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.subscriptions.len();
		self.subscriptions.retain(|s| s.id != id);
		before != self.subscriptions.len()
	}

	/// Delivers `event` to synchronous subscribers now and queues it for the
	/// queued ones.
	pub fn fire(&mut self, event: EditorEvent) {
		let kind = event.kind();
		trace!(kind = %kind, "event fired");
		for sub in &mut self.subscriptions {
			if sub.delivery == Delivery::Sync && sub.wants(kind) {
				(sub.handler)(&event);
			}
		}
		if self
			.subscriptions
			.iter()
			.any(|s| s.delivery == Delivery::Queued && s.wants(kind))
		{
			self.pending.push_back((event, Audience::QueuedOnly));
		}
	}

	/// Defers delivery of `event` to every subscriber until the next pump.
	pub fn queue(&mut self, event: EditorEvent) {
		self.pending.push_back((event, Audience::All));
	}

	/// Returns a sender for worker tasks.
	pub fn sender(&self) -> EventSender {
		self.tx.clone()
	}

	/// Number of events awaiting delivery, excluding unread worker sends.
	pub fn pending(&self) -> usize {
		self.pending.len()
	}

	/// Takes the events workers sent since the last call, without delivering them.
	///
	/// An owner that keeps derived state routes these through its own update
	/// path and then fires them.
	pub fn drain_received(&mut self) -> Vec<EditorEvent> {
		let mut received = Vec::new();
		while let Ok(event) = self.rx.try_recv() {
			received.push(event);
		}
		if !received.is_empty() {
			trace!(count = received.len(), "worker events received");
		}
		received
	}

	/// Delivers everything queued so far, including events sent by workers.
	///
	/// Returns the number of events delivered.
	pub fn pump(&mut self) -> usize {
		while let Ok(event) = self.rx.try_recv() {
			self.pending.push_back((event, Audience::All));
		}
		let mut delivered = 0;
		while let Some((event, audience)) = self.pending.pop_front() {
			let kind = event.kind();
			for sub in &mut self.subscriptions {
				let eligible = audience == Audience::All || sub.delivery == Delivery::Queued;
				if eligible && sub.wants(kind) {
					(sub.handler)(&event);
				}
			}
			delivered += 1;
		}
		if delivered > 0 {
			debug!(delivered, "event queue drained");
		}
		delivered
	}
}
