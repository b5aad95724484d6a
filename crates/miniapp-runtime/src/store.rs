//! Observable snapshot store
//!
//! Holds the current [`StateRef`]. Replacing it with the same `Rc` is a
//! no-op, so subscribers are only woken for real changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use miniapp_core::{MiniappRuntimeState, StateRef};

use crate::events::SubscriptionId;

type StateListener = Rc<dyn Fn(&StateRef)>;

/// Single-writer store for the runtime snapshot
pub struct RuntimeStore {
    state: RefCell<StateRef>,
    listeners: RefCell<Vec<(SubscriptionId, StateListener)>>,
    next_id: Cell<u64>,
    version: Cell<u64>,
}

impl RuntimeStore {
    pub fn new(initial: MiniappRuntimeState) -> Self {
        Self {
            state: RefCell::new(Rc::new(initial)),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            version: Cell::new(0),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> StateRef {
        Rc::clone(&self.state.borrow())
    }

    /// Number of real replacements so far
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Swap in a new snapshot and notify subscribers.
    ///
    /// Returns `false` when `next` is the current snapshot.
    pub fn replace(&self, next: StateRef) -> bool {
        if Rc::ptr_eq(&self.state.borrow(), &next) {
            return false;
        }
        *self.state.borrow_mut() = Rc::clone(&next);
        self.version.set(self.version.get() + 1);

        let listeners: Vec<StateListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&next);
        }
        true
    }

    pub fn subscribe(&self, listener: impl Fn(&StateRef) + 'static) -> SubscriptionId {
        let id = SubscriptionId::from_raw(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniapp_core::step::set_stack_view_open;

    #[test]
    fn test_replace_skips_same_reference() {
        let store = RuntimeStore::new(MiniappRuntimeState::default());
        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        let current = store.get();
        assert!(!store.replace(set_stack_view_open(&current, false)));
        assert_eq!(notified.get(), 0);

        assert!(store.replace(set_stack_view_open(&current, true)));
        assert_eq!(notified.get(), 1);
        assert_eq!(store.version(), 1);
        assert!(store.get().is_stack_view_open);
    }

    #[test]
    fn test_old_snapshot_survives_replacement() {
        let store = RuntimeStore::new(MiniappRuntimeState::default());
        let old = store.get();
        store.replace(set_stack_view_open(&old, true));
        assert!(!old.is_stack_view_open);
        assert!(store.get().is_stack_view_open);
    }

    #[test]
    fn test_unsubscribe() {
        let store = RuntimeStore::new(MiniappRuntimeState::default());
        let id = store.subscribe(|_| {});
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
    }
}
