use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{EventError, EventResult};
use crate::event::{ChaincodeEvent, EventEmitter};

/// Default capacity of per-subscriber broadcast channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Filter for subscribing to a subset of chaincode events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events with one of these names are delivered.
    pub names: Option<Vec<String>>,
}

impl EventFilter {
    /// Filter matching a single event name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            names: Some(vec![name.into()]),
        }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &ChaincodeEvent) -> bool {
        match self.names {
            Some(ref names) => names.iter().any(|n| *n == event.name),
            None => true,
        }
    }
}

/// A broadcast channel receiver for chaincode events.
pub type EventStream = broadcast::Receiver<ChaincodeEvent>;

struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<ChaincodeEvent>,
}

/// In-process event bus: fans accepted events out to matching subscribers
/// and keeps the most recent ones in a bounded log.
///
/// Delivery never blocks the emitter. The log holds at most `capacity`
/// events; older entries are dropped first.
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
    log: RwLock<VecDeque<ChaincodeEvent>>,
    closed: AtomicBool,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus whose subscriber channels and log hold `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            log: RwLock::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to events matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.capacity);
        self.subscribers
            .write()
            .expect("bus lock poisoned")
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// The most recent accepted events, oldest first.
    pub fn emitted(&self) -> Vec<ChaincodeEvent> {
        self.log
            .read()
            .expect("bus lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Remove and return the logged events.
    pub fn drain(&self) -> Vec<ChaincodeEvent> {
        self.log
            .write()
            .expect("bus lock poisoned")
            .drain(..)
            .collect()
    }

    /// Maximum number of events kept in the log.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stop accepting events. Subsequent emits fail with [`EventError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.subscribers.write().expect("bus lock poisoned").clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("bus lock poisoned").len()
    }

    /// Subscribers whose receivers are gone are pruned.
    fn route(&self, event: &ChaincodeEvent) {
        let mut subs = self.subscribers.write().expect("bus lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter for EventBus {
    fn emit(&self, event: ChaincodeEvent) -> EventResult<()> {
        if self.is_closed() {
            return Err(EventError::Closed);
        }
        if event.name.is_empty() {
            return Err(EventError::EmptyName);
        }
        self.route(&event);
        debug!(event = %event, "event emitted");
        let mut log = self.log.write().expect("bus lock poisoned");
        if log.len() == self.capacity {
            log.pop_front();
        }
        log.push_back(event);
        Ok(())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}
