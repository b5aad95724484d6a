//! Activation, deactivation and readiness

use miniapp_core::step::{release_focus, touch};
use miniapp_core::{plan_activation, transition_readiness, MiniappState, Readiness, StateRef};
use tracing::{debug, info};

use super::{MiniappRuntime, Pending};
use crate::events::RuntimeEvent;

impl MiniappRuntime {
    /// Make `app_id` the single active app.
    ///
    /// The previously active app is demoted to `background` and moved
    /// off-screen, the target gets the next z-order and is moved to the
    /// visible region. Activating the active app again still raises it.
    /// Background apps above the cap are evicted in the same snapshot.
    /// Unknown and closing apps are ignored. Returns whether the activation
    /// happened.
    pub fn activate_app(&mut self, app_id: &str) -> bool {
        let state = self.store.get();
        self.activate_from(state, app_id)
    }

    /// Activate `app_id` starting from `base`, which may hold changes that
    /// are not published yet
    fn activate_from(&mut self, base: StateRef, app_id: &str) -> bool {
        let app = match base.app(app_id) {
            Some(app) => app,
            None => {
                debug!(app_id, "activate: unknown app");
                return false;
            }
        };
        if app.state == MiniappState::Closing {
            debug!(app_id, "activate: app is closing");
            return false;
        }

        let previous = base
            .active_app_id
            .clone()
            .filter(|id| id.as_str() != app_id);
        let now = self.clock.now_ms();
        let activation = plan_activation(&base, app_id, now);
        if !activation.changed {
            return false;
        }

        let mut pending = Pending::new(activation.next_state);
        pending.commands = activation.commands;
        pending.push_state_change(app_id, Some(app.state));
        for id in &activation.demoted {
            let from = base.app(id.as_str()).map(|app| app.state);
            pending.push_state_change(id.as_str(), from);
            pending.push(RuntimeEvent::Deactivate { app_id: id.clone() });
        }
        pending.push(RuntimeEvent::Activate {
            app_id: app.app_id.clone(),
            previous_app_id: previous.clone(),
        });
        pending.evict();

        // Phase two: side effects against the published snapshot
        let events = self.publish(pending);
        let state = self.store.get();
        if let (Some(app), Some(presentation)) = (state.app(app_id), state.presentation(app_id)) {
            if let Some(container) = &app.container {
                self.binding.sync_mount_target(app, presentation);
                self.containers.move_to_foreground(container);
            }
        }
        for id in &activation.demoted {
            if let Some(container) = state.app(id.as_str()).and_then(|app| app.container.as_ref()) {
                self.containers.move_to_background(container);
            }
        }

        info!(app_id, previous = ?previous, demoted = activation.demoted.len(), "app activated");
        self.finish(events);
        true
    }

    /// Send the active app to the background without activating another.
    pub fn deactivate_app(&mut self, app_id: &str) -> bool {
        let state = self.store.get();
        let is_active = state
            .app(app_id)
            .is_some_and(|app| app.state == MiniappState::Active);
        if !is_active {
            return false;
        }

        let now = self.clock.now_ms();
        let mut pending = Pending::new(state);
        pending.transition(app_id, MiniappState::Background);
        pending.update(|state| release_focus(state, app_id));
        pending.update(|state| touch(state, app_id, now));
        if let Some(id) = pending.app_id(app_id) {
            pending.push(RuntimeEvent::Deactivate { app_id: id });
        }
        pending.evict();

        let events = self.publish(pending);
        if let Some(container) = self.store.get().app(app_id).and_then(|app| app.container.clone()) {
            self.containers.move_to_background(&container);
        }
        info!(app_id, "app deactivated");
        self.finish(events);
        true
    }

    /// The app signalled it can be shown.
    ///
    /// Readiness is one-way. Apps without a splash screen that are still
    /// `launching` or `splash` are activated right away, in the same
    /// snapshot. Returns whether the snapshot changed.
    pub fn ready_gate_opened(&mut self, app_id: &str) -> bool {
        let state = self.store.get();
        let next = transition_readiness(&state, app_id, Readiness::Ready);
        let changed = !StateRef::ptr_eq(&next, &state);

        let should_activate = next.app(app_id).is_some_and(|app| {
            !app.manifest.has_splash_screen()
                && matches!(app.state, MiniappState::Launching | MiniappState::Splash)
        });
        if should_activate && self.activate_from(StateRef::clone(&next), app_id) {
            return true;
        }

        if changed {
            self.store.replace(next);
            debug!(app_id, "ready gate opened");
        }
        changed
    }
}
