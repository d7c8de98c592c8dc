//! Two-tier broadcast bus.
//!
//! # Responsibility
//! - Deliver one event to every registered listener per publish.
//! - Run privileged listeners strictly before ordinary listeners.
//!
//! # Invariants
//! - Within a tier, delivery order is registration order.
//! - Every listener receives the same event reference.
//! - Registration is never deduplicated; registering twice delivers twice.
//! - A panicking listener aborts delivery to the listeners after it.

use crate::model::timestamp::Timestamp;

type Listener<E> = Box<dyn FnMut(&E)>;

/// Bus carrying clock ticks.
pub type TimeBus = EventBus<Timestamp>;

/// Fixed-priority broadcast with an ordinary and a privileged tier.
pub struct EventBus<E> {
    privileged: Vec<Listener<E>>,
    ordinary: Vec<Listener<E>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            privileged: Vec::new(),
            ordinary: Vec::new(),
        }
    }

    /// Registers a listener that runs on every publish after all privileged
    /// listeners.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) {
        self.ordinary.push(Box::new(listener));
    }

    /// Registers a listener that runs before any ordinary listener.
    ///
    /// One privileged listener is expected per bus; more are accepted and run
    /// in registration order.
    pub fn subscribe_privileged(&mut self, listener: impl FnMut(&E) + 'static) {
        self.privileged.push(Box::new(listener));
    }

    /// Delivers `event` to the privileged tier, then the ordinary tier.
    pub fn publish(&mut self, event: &E) {
        for listener in self.privileged.iter_mut() {
            listener(event);
        }
        for listener in self.ordinary.iter_mut() {
            listener(event);
        }
    }

    pub fn ordinary_count(&self) -> usize {
        self.ordinary.len()
    }

    pub fn privileged_count(&self) -> usize {
        self.privileged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.privileged.is_empty() && self.ordinary.is_empty()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn empty_bus_publish_is_noop() {
        let mut bus: EventBus<u32> = EventBus::new();
        assert!(bus.is_empty());
        bus.publish(&7);
    }

    #[test]
    fn duplicate_registration_duplicates_delivery() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        for _ in 0..2 {
            let hits = Rc::clone(&hits);
            bus.subscribe(move |_: &u32| *hits.borrow_mut() += 1);
        }
        bus.publish(&1);
        assert_eq!(*hits.borrow(), 2);
        assert_eq!(bus.ordinary_count(), 2);
        assert_eq!(bus.privileged_count(), 0);
    }
}
