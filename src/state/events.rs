//! One-shot "countdown completed" notification.
//!
//! The bus is latched: it fires at most once, and a subscriber that arrives
//! after the fact is called immediately on subscribe.

use std::cell::RefCell;
use std::rc::Rc;

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Inner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    fired: bool,
}

#[derive(Clone, Default)]
pub struct CompletionBus {
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for CompletionBus {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    inner: Rc<RefCell<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl CompletionBus {
    pub fn has_fired(&self) -> bool {
        self.inner.borrow().fired
    }

    pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription {
        let listener: Listener = Rc::new(f);
        let (id, fired) = {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.listeners.push((id, listener.clone()));
            (id, inner.fired)
        };
        if fired {
            listener();
        }
        Subscription {
            id,
            inner: self.inner.clone(),
        }
    }

    /// Notifies every subscriber once. Returns false if already fired.
    pub fn publish(&self) -> bool {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            if inner.fired {
                return false;
            }
            inner.fired = true;
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        log::info!("countdown completed, notifying {} subscriber(s)", listeners.len());
        for l in listeners {
            l();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fires_once() {
        let bus = CompletionBus::default();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = bus.subscribe(move || h.set(h.get() + 1));
        assert!(bus.publish());
        assert!(!bus.publish());
        assert_eq!(hits.get(), 1);
        assert!(bus.has_fired());
    }

    #[test]
    fn dropped_subscription_is_not_called() {
        let bus = CompletionBus::default();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        drop(bus.subscribe(move || h.set(h.get() + 1)));
        bus.publish();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn late_subscriber_is_called_on_subscribe() {
        let bus = CompletionBus::default();
        bus.publish();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = bus.subscribe(move || h.set(h.get() + 1));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn subscriber_may_touch_the_bus() {
        let bus = CompletionBus::default();
        let inner_bus = bus.clone();
        let seen = Rc::new(Cell::new(false));
        let s = seen.clone();
        let _sub = bus.subscribe(move || s.set(inner_bus.has_fired()));
        bus.publish();
        assert!(seen.get());
    }
}
