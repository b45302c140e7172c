//! Multi-listener publish/subscribe channel.
//!
//! The channel holds listeners weakly: subscribing does not keep a listener
//! alive, and a dropped listener is pruned on the next emit. Owners that
//! outlive their interest should still call `unsubscribe` explicitly.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Receives events from an [`EventChannel`].
pub trait Listener<E> {
    /// Handle one event. Must not re-enter the emitting engine.
    fn on_event(&mut self, event: &E);
}

/// Handle returned by [`EventChannel::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

struct Slot<E> {
    id: ListenerId,
    listener: Weak<RefCell<dyn Listener<E>>>,
}

impl<E> Slot<E> {
    fn points_to(&self, addr: *const ()) -> bool {
        self.listener
            .upgrade()
            .is_some_and(|rc| Rc::as_ptr(&rc) as *const () == addr)
    }
}

/// Publish/subscribe channel for one event type.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use rust_pairs::events::{EventChannel, EventLog};
///
/// let mut channel: EventChannel<u32> = EventChannel::new();
/// let log = Rc::new(RefCell::new(EventLog::new()));
///
/// let id = channel.subscribe(&log);
/// channel.emit(&7);
/// assert_eq!(log.borrow().events(), &[7]);
///
/// channel.unsubscribe(id);
/// channel.emit(&8);
/// assert_eq!(log.borrow().len(), 1);
/// ```
pub struct EventChannel<E> {
    /// Most games have a handful of listeners.
    slots: SmallVec<[Slot<E>; 4]>,
    next_id: u32,
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self {
            slots: SmallVec::new(),
            next_id: 0,
        }
    }
}

impl<E> std::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.slots.iter().map(|s| s.id).collect::<Vec<_>>())
            .finish()
    }
}

impl<E> EventChannel<E> {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// Subscribing the same listener twice returns the existing id.
    pub fn subscribe<L>(&mut self, listener: &Rc<RefCell<L>>) -> ListenerId
    where
        L: Listener<E> + 'static,
    {
        let strong: Rc<RefCell<dyn Listener<E>>> = listener.clone();
        let addr = Rc::as_ptr(&strong) as *const ();

        if let Some(slot) = self.slots.iter().find(|s| s.points_to(addr)) {
            return slot.id;
        }

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            listener: Rc::downgrade(&strong),
        });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of listeners still alive.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.listener.strong_count() > 0)
            .count()
    }

    /// Deliver `event` to every live listener, in subscription order.
    ///
    /// All listeners have returned when this returns. A listener that is
    /// already borrowed elsewhere is skipped with a warning.
    pub fn emit(&mut self, event: &E) {
        self.slots.retain(|slot| slot.listener.strong_count() > 0);

        for slot in &self.slots {
            let Some(listener) = slot.listener.upgrade() else {
                continue;
            };
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.on_event(event),
                Err(_) => log::warn!("{} is busy; event not delivered", slot.id),
            };
        }
    }
}

/// Listener that records every event it sees.
#[derive(Clone, Debug)]
pub struct EventLog<E> {
    events: Vec<E>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventLog<E> {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log ready to subscribe.
    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[E] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take all recorded events, leaving the log empty.
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

impl<E: Clone> Listener<E> for EventLog<E> {
    fn on_event(&mut self, event: &E) {
        self.events.push(event.clone());
    }
}
