//! Pub/Sub event bus for decoupled component communication.
//!
//! Two modes that work together:
//! - subscribe() + emit(): callbacks fire immediately, in FIFO
//!   subscription order within an event type
//! - emit() also queues the event; poll() drains the queue for batch
//!   processing in the main loop
//!
//! Loader threads emit through a cloned [`EventEmitter`]; the app polls on
//! the UI thread once per frame, so all reel mutations stay run-to-completion.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use log::warn;

/// Queue cap; oldest half is evicted beyond this.
const MAX_QUEUE_SIZE: usize = 256;

/// Marker trait for events. Blanket-implemented for any `Send + Sync` type.
pub trait Event: Any + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync + 'static> Event for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

type Callback = Arc<dyn Fn(&dyn Any) + Send + Sync>;
type Subscribers = Arc<RwLock<HashMap<TypeId, Vec<Callback>>>>;

/// Boxed event as stored in the deferred queue.
pub type BoxedEvent = Box<dyn Event>;

/// Event bus handle. Cloning shares the same subscribers and queue.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Subscribers,
    queue: Arc<Mutex<Vec<BoxedEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events of type `E`; the callback runs synchronously
    /// inside every emit of that type.
    pub fn subscribe<E, F>(&self, callback: F)
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let wrapped: Callback = Arc::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Invoke immediate callbacks and queue the event for poll().
    pub fn emit<E: Event + Clone>(&self, event: E) {
        dispatch(&self.subscribers, &self.queue, Box::new(event));
    }

    /// Drain all queued events since the last poll.
    pub fn poll(&self) -> Vec<BoxedEvent> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Lightweight emitter for loader threads and widgets.
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            subscribers: Arc::clone(&self.subscribers),
            queue: Arc::clone(&self.queue),
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Clonable emit-only handle, safe to hand to background threads.
#[derive(Clone)]
pub struct EventEmitter {
    subscribers: Subscribers,
    queue: Arc<Mutex<Vec<BoxedEvent>>>,
}

impl EventEmitter {
    pub fn emit<E: Event + Clone>(&self, event: E) {
        dispatch(&self.subscribers, &self.queue, Box::new(event));
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("queue_len", &self.queue.lock().map(|q| q.len()).unwrap_or(0))
            .finish()
    }
}

fn dispatch(subscribers: &Subscribers, queue: &Arc<Mutex<Vec<BoxedEvent>>>, event: BoxedEvent) {
    // Immediate callbacks. Deref through dyn Event so the downcast sees the
    // concrete type, not Box<dyn Event> via the blanket impl.
    let type_id = (*event).as_any().type_id();
    if let Some(cbs) = subscribers
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(&type_id)
    {
        for cb in cbs {
            cb((*event).as_any());
        }
    }

    let mut queue = queue.lock().unwrap_or_else(|e| e.into_inner());
    if queue.len() >= MAX_QUEUE_SIZE {
        let evict = queue.len() / 2;
        warn!("Event queue full ({} events), evicting oldest {}", queue.len(), evict);
        queue.drain(0..evict);
    }
    queue.push(event);
}

/// Downcast a queued event to a concrete type.
///
/// Must deref to `dyn Event` before `as_any()`, otherwise the blanket impl
/// on `Box<dyn Event>` wraps the box itself and the downcast always fails.
#[inline]
pub fn downcast_event<E: Event>(event: &BoxedEvent) -> Option<&E> {
    (**event).as_any().downcast_ref::<E>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Clone, Debug)]
    struct Ping(u32);

    #[derive(Clone, Debug)]
    struct Pong;

    #[test]
    fn test_subscribe_emit_immediate() {
        let bus = EventBus::new();
        let total = Arc::new(AtomicU32::new(0));
        let t = Arc::clone(&total);

        bus.subscribe::<Ping, _>(move |e| {
            t.fetch_add(e.0, Ordering::SeqCst);
        });

        bus.emit(Ping(10));
        assert_eq!(total.load(Ordering::SeqCst), 10);
        bus.emit(Ping(5));
        assert_eq!(total.load(Ordering::SeqCst), 15);
    }

    #[test]
    fn test_emit_queues_for_poll() {
        let bus = EventBus::new();
        bus.emit(Ping(1));
        bus.emit(Pong);
        bus.emit(Ping(2));

        let events = bus.poll();
        assert_eq!(events.len(), 3);
        assert_eq!(bus.poll().len(), 0);
    }

    #[test]
    fn test_downcast_queued_event() {
        let bus = EventBus::new();
        bus.emit(Ping(42));
        bus.emit(Pong);

        let events = bus.poll();
        assert_eq!(downcast_event::<Ping>(&events[0]).map(|p| p.0), Some(42));
        assert!(downcast_event::<Ping>(&events[1]).is_none());
        assert!(downcast_event::<Pong>(&events[1]).is_some());
    }

    #[test]
    fn test_emitter_handle_reaches_subscribers_and_queue() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&count);
        bus.subscribe::<Pong, _>(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let emitter = bus.emitter();
        std::thread::spawn(move || emitter.emit(Pong))
            .join()
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.poll().len(), 1);
    }

    #[test]
    fn test_subscribers_only_see_their_type() {
        let bus = EventBus::new();
        let pings = Arc::new(AtomicU32::new(0));
        let p = Arc::clone(&pings);
        bus.subscribe::<Ping, _>(move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(Pong);
        bus.emit(Ping(0));
        bus.emit(Pong);
        assert_eq!(pings.load(Ordering::SeqCst), 1);
    }
}
