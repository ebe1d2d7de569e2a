use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn FnMut(&EditorEvent)>) {
	let log = Rc::new(RefCell::new(Vec::new()));
	let make = {
		let log = Rc::clone(&log);
		move |name: &'static str| -> Box<dyn FnMut(&EditorEvent)> {
			let log = Rc::clone(&log);
			Box::new(move |e: &EditorEvent| log.borrow_mut().push(format!("{name}:{}", e.kind())))
		}
	};
	(log, make)
}

#[test]
fn sync_delivery_is_immediate_and_ordered() {
	let (log, make) = recorder();
	let mut events = EventManager::new();
	events.subscribe(&[], Delivery::Sync, make("a"));
	events.subscribe(&[], Delivery::Sync, make("b"));
	events.fire(EditorEvent::TierViewChanged);
	assert_eq!(*log.borrow(), ["a:TierViewChanged", "b:TierViewChanged"]);
	assert_eq!(events.pending(), 0);
}

#[test]
fn queued_delivery_waits_for_pump() {
	let (log, make) = recorder();
	let mut events = EventManager::new();
	events.subscribe(&[], Delivery::Queued, make("q"));
	events.subscribe(&[], Delivery::Sync, make("s"));
	events.fire(EditorEvent::SessionChanged);
	assert_eq!(*log.borrow(), ["s:SessionChanged"]);

	assert_eq!(events.pump(), 1);
	assert_eq!(*log.borrow(), ["s:SessionChanged", "q:SessionChanged"]);
	assert_eq!(events.pump(), 0);
}

#[test]
fn kind_filter() {
	let (log, make) = recorder();
	let mut events = EventManager::new();
	events.subscribe(&[EventKind::TierChange], Delivery::Sync, make("t"));
	events.fire(EditorEvent::TierViewChanged);
	events.fire(EditorEvent::TierChange {
		element_index: 0,
		tier: "Orthography".into(),
		value_adjusting: false,
	});
	assert_eq!(*log.borrow(), ["t:TierChange"]);
}

#[test]
fn queue_reaches_sync_subscribers_on_pump() {
	let (log, make) = recorder();
	let mut events = EventManager::new();
	events.subscribe(&[], Delivery::Sync, make("s"));
	events.queue(EditorEvent::ModifiedFlagChanged(true));
	assert!(log.borrow().is_empty());
	events.pump();
	assert_eq!(*log.borrow(), ["s:ModifiedFlagChanged"]);
}

#[test]
fn worker_sends_arrive_through_pump() {
	let (log, make) = recorder();
	let mut events = EventManager::new();
	events.subscribe(&[], Delivery::Sync, make("s"));
	let tx = events.sender();
	std::thread::spawn(move || {
		tx.send(EditorEvent::EditorReloadFromDisk).unwrap();
	})
	.join()
	.unwrap();
	assert!(log.borrow().is_empty());
	assert_eq!(events.pump(), 1);
	assert_eq!(*log.borrow(), ["s:EditorReloadFromDisk"]);
}

#[test]
fn drained_worker_events_are_not_delivered() {
	let (log, make) = recorder();
	let mut events = EventManager::new();
	events.subscribe(&[], Delivery::Sync, make("s"));
	let tx = events.sender();
	tx.send(EditorEvent::TierViewChanged).unwrap();
	tx.send(EditorEvent::SessionChanged).unwrap();
	assert_eq!(
		events.drain_received(),
		vec![EditorEvent::TierViewChanged, EditorEvent::SessionChanged]
	);
	assert_eq!(events.pump(), 0);
	assert!(log.borrow().is_empty());
}

#[test]
fn unsubscribe_stops_delivery() {
	let (log, make) = recorder();
	let mut events = EventManager::new();
	let id = events.subscribe(&[], Delivery::Sync, make("s"));
	assert!(events.unsubscribe(id));
	assert!(!events.unsubscribe(id));
	events.fire(EditorEvent::SessionChanged);
	assert!(log.borrow().is_empty());
}

#[test]
fn structural_classification() {
	assert!(EditorEvent::TierViewChanged.is_structural());
	assert!(
		!EditorEvent::TierChange {
			element_index: 0,
			tier: "Notes".into(),
			value_adjusting: false
		}
		.is_structural()
	);
}
