//! Runtime orchestration
//!
//! `MiniappRuntime` is the only writer of the snapshot store. Every
//! operation runs in two phases:
//!
//! 1. compute the next snapshot locally with the pure step functions,
//!    including focus release and eviction
//! 2. replace the snapshot once, then run side effects (DOM commands,
//!    container relocation and removal) and emit lifecycle events
//!
//! Subscribers only ever see finished snapshots.
//!
//! This module is split into focused submodules:
//! - `lifecycle`: launch, load signal, close and settle
//! - `activation`: activation, deactivation, readiness and eviction
//! - `splash`: splash screen timers
//! - `surface`: stack view, context updates, motion tokens and export

mod activation;
mod lifecycle;
mod splash;
mod surface;

use std::rc::Rc;

use miniapp_core::step::remove_app;
use miniapp_core::{
    check_all_invariants, transition_app_state, AppId, ChromeTheme, DomCommand,
    MiniappRuntimeState, MiniappState, StateRef,
};
use serde::Deserialize;
use tracing::debug;

use crate::binding::DomBinding;
use crate::bridge::PermissionBridge;
use crate::clock::Clock;
use crate::config::RuntimeConfig;
use crate::container::{select_evictions, ContainerHost, ContainerManager};
use crate::error::RuntimeResult;
use crate::events::{CloseReason, EventBus, RuntimeEvent};
use crate::stack::WindowStack;
use crate::store::RuntimeStore;

pub use splash::SplashTimers;

/// Platform collaborators injected into the runtime
#[derive(Clone)]
pub struct RuntimeDeps {
    pub host: Rc<dyn ContainerHost>,
    pub stack: Rc<dyn WindowStack>,
    pub bridge: Rc<dyn PermissionBridge>,
    pub clock: Rc<dyn Clock>,
}

/// Per-launch options
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaunchOptions {
    /// Initial chrome theme, passed to the container as `theme`
    pub theme: ChromeTheme,
    /// Overrides the configured locale
    pub locale: Option<String>,
}

/// Mini-app runtime coordinating the store, containers and DOM binding
pub struct MiniappRuntime {
    config: RuntimeConfig,
    store: RuntimeStore,
    events: EventBus,
    containers: ContainerManager,
    binding: DomBinding,
    bridge: Rc<dyn PermissionBridge>,
    clock: Rc<dyn Clock>,
    splash: SplashTimers,
}

impl MiniappRuntime {
    /// Create a runtime with a validated config
    pub fn new(config: RuntimeConfig, deps: RuntimeDeps) -> RuntimeResult<Self> {
        config.validate()?;
        let store = RuntimeStore::new(MiniappRuntimeState::new(config.max_background_apps));
        Ok(Self {
            containers: ContainerManager::new(deps.host, config.base_url.clone()),
            binding: DomBinding::new(deps.stack),
            bridge: deps.bridge,
            clock: deps.clock,
            store,
            events: EventBus::new(),
            splash: SplashTimers::new(),
            config,
        })
    }

    /// Current snapshot
    pub fn state(&self) -> StateRef {
        self.store.get()
    }

    /// Snapshot store, for subscribing to replacements
    pub fn store(&self) -> &RuntimeStore {
        &self.store
    }

    /// Lifecycle event stream
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Pending splash deadlines
    pub fn splash_timers(&self) -> &SplashTimers {
        &self.splash
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Publish an operation's snapshot with a single store replacement.
    ///
    /// Applies the queued slot commands, drops splash timers of apps that
    /// left `splash` and destroys evicted containers. Returns the queued
    /// events; the caller emits them with [`finish`](Self::finish) after its
    /// own side effects.
    fn publish(&mut self, pending: Pending) -> Vec<RuntimeEvent> {
        let Pending {
            state,
            commands,
            events,
            eviction,
        } = pending;

        self.store.replace(Rc::clone(&state));
        self.binding.apply_commands(&commands);
        self.splash.retain(|id| {
            state
                .app(id.as_str())
                .is_some_and(|app| app.state == MiniappState::Splash)
        });

        if let Some(Eviction { before, evicted }) = eviction {
            let destroyed = self.containers.enforce_background_limit(
                &before.apps,
                before.active_app_id.as_ref(),
                before.max_background_apps,
            );
            debug_assert_eq!(destroyed, evicted);
        }
        events
    }

    /// Emit an operation's events and check the invariants
    fn finish(&mut self, events: Vec<RuntimeEvent>) {
        for event in &events {
            self.events.emit(event);
        }
        self.assert_invariants();
    }

    fn emit(&self, event: RuntimeEvent) {
        self.events.emit(&event);
    }

    fn assert_invariants(&self) {
        if cfg!(debug_assertions) {
            let violations = check_all_invariants(&self.store.get());
            debug_assert!(
                violations.is_empty(),
                "runtime invariants violated: {:?}",
                violations
            );
        }
    }
}

// ============================================================================
// Pending snapshot
// ============================================================================

/// Snapshot before an eviction pass and the ids it dropped
struct Eviction {
    before: StateRef,
    evicted: Vec<AppId>,
}

/// The next snapshot of one operation, built locally.
///
/// Nothing here is visible to subscribers until
/// [`MiniappRuntime::publish`] swaps it in, so intermediate steps may break
/// invariants that the finished snapshot restores.
struct Pending {
    state: StateRef,
    commands: Vec<DomCommand>,
    events: Vec<RuntimeEvent>,
    eviction: Option<Eviction>,
}

impl Pending {
    fn new(state: StateRef) -> Self {
        Self {
            state,
            commands: Vec::new(),
            events: Vec::new(),
            eviction: None,
        }
    }

    /// Move one app to `next`, queueing its slot command and
    /// `app:state-change`. Returns `false` for unknown apps.
    fn transition(&mut self, app_id: &str, next: MiniappState) -> bool {
        let from = self.state.app(app_id).map(|app| app.state);
        let transition = transition_app_state(&self.state, app_id, next);
        if !transition.changed {
            return false;
        }
        self.state = transition.next_state;
        self.commands.extend(transition.dom_command);
        self.push_state_change(app_id, from);
        true
    }

    /// Queue `app:state-change` describing the app's pending state
    fn push_state_change(&mut self, app_id: &str, from: Option<MiniappState>) {
        if let Some(app) = self.state.app(app_id) {
            debug!(app_id, ?from, to = ?app.state, flow = ?app.flow, "state change");
            self.events.push(RuntimeEvent::StateChange {
                app_id: app.app_id.clone(),
                from,
                to: app.state,
                flow: app.flow,
            });
        }
    }

    fn update(&mut self, step: impl FnOnce(&StateRef) -> StateRef) {
        self.state = step(&self.state);
    }

    fn push(&mut self, event: RuntimeEvent) {
        self.events.push(event);
    }

    fn app_id(&self, app_id: &str) -> Option<AppId> {
        self.state.app(app_id).map(|app| app.app_id.clone())
    }

    /// Drop the least recently active background apps above the cap,
    /// queueing `app:close` for each
    fn evict(&mut self) {
        let evicted = select_evictions(
            &self.state.apps,
            self.state.active_app_id.as_ref(),
            self.state.max_background_apps,
        );
        if evicted.is_empty() {
            return;
        }

        let before = Rc::clone(&self.state);
        for app_id in &evicted {
            self.state = remove_app(&self.state, app_id.as_str());
            self.events.push(RuntimeEvent::Close {
                app_id: app_id.clone(),
                reason: CloseReason::Evicted,
            });
        }
        self.eviction = Some(Eviction { before, evicted });
    }
}
