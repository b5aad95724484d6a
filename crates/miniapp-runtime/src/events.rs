//! Lifecycle event stream
//!
//! Events are emitted after the snapshot has been replaced, so listeners
//! always observe the state the event describes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use miniapp_core::{AppId, MiniappCtx, MiniappFlow, MiniappState};

/// Why an app left the runtime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CloseReason {
    /// Closed by request after its dismiss transition finished
    Dismissed,
    /// Evicted by the background limit
    Evicted,
}

/// Lifecycle event
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RuntimeEvent {
    #[serde(rename = "app:launch", rename_all = "camelCase")]
    Launch { app_id: AppId },

    #[serde(rename = "app:activate", rename_all = "camelCase")]
    Activate {
        app_id: AppId,
        previous_app_id: Option<AppId>,
    },

    #[serde(rename = "app:deactivate", rename_all = "camelCase")]
    Deactivate { app_id: AppId },

    #[serde(rename = "app:close", rename_all = "camelCase")]
    Close { app_id: AppId, reason: CloseReason },

    #[serde(rename = "app:state-change", rename_all = "camelCase")]
    StateChange {
        app_id: AppId,
        from: Option<MiniappState>,
        to: MiniappState,
        flow: MiniappFlow,
    },

    #[serde(rename = "app:ctx-change", rename_all = "camelCase")]
    CtxChange { app_id: AppId, ctx: MiniappCtx },

    #[serde(rename = "stack-view:open")]
    StackViewOpen,

    #[serde(rename = "stack-view:close")]
    StackViewClose,
}

impl RuntimeEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeEvent::Launch { .. } => "app:launch",
            RuntimeEvent::Activate { .. } => "app:activate",
            RuntimeEvent::Deactivate { .. } => "app:deactivate",
            RuntimeEvent::Close { .. } => "app:close",
            RuntimeEvent::StateChange { .. } => "app:state-change",
            RuntimeEvent::CtxChange { .. } => "app:ctx-change",
            RuntimeEvent::StackViewOpen => "stack-view:open",
            RuntimeEvent::StackViewClose => "stack-view:close",
        }
    }

    /// App the event concerns, if any
    pub fn app_id(&self) -> Option<&AppId> {
        match self {
            RuntimeEvent::Launch { app_id }
            | RuntimeEvent::Activate { app_id, .. }
            | RuntimeEvent::Deactivate { app_id }
            | RuntimeEvent::Close { app_id, .. }
            | RuntimeEvent::StateChange { app_id, .. }
            | RuntimeEvent::CtxChange { app_id, .. } => Some(app_id),
            RuntimeEvent::StackViewOpen | RuntimeEvent::StackViewClose => None,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

type Listener = Rc<dyn Fn(&RuntimeEvent)>;

/// Synchronous fan-out of runtime events
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every event
    pub fn subscribe(&self, listener: impl Fn(&RuntimeEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|(existing, _)| *existing == id) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Deliver an event to every listener registered at call time.
    ///
    /// Listeners may subscribe or unsubscribe while being called.
    pub fn emit(&self, event: &RuntimeEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}
