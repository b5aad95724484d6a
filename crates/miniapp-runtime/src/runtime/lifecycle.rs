//! Launch, load signal, close and settle

use miniapp_core::step::{begin_presentation_transition, insert_app, release_focus, remove_app, settle_app_flow};
use miniapp_core::{
    transition_process_status, AppId, MiniappInstance, MiniappManifest, MiniappPresentation,
    MiniappState, PresentationState, ProcessStatus, TransitionKind,
};
use tracing::{debug, info};

use super::{LaunchOptions, MiniappRuntime, Pending};
use crate::error::{RuntimeError, RuntimeResult};
use crate::events::{CloseReason, RuntimeEvent};

impl MiniappRuntime {
    /// Launch a mini-app.
    ///
    /// Builds its container, inserts the instance and a presenting
    /// presentation, mounts the container into its slot and attaches the
    /// permission bridge. The app ends in `splash` when its manifest asks
    /// for a splash screen, `launching` otherwise. Activation happens later
    /// through [`ready_gate_opened`](Self::ready_gate_opened) or
    /// [`activate_app`](Self::activate_app).
    pub fn launch_app(&mut self, manifest: MiniappManifest, options: LaunchOptions) -> RuntimeResult<AppId> {
        manifest.validate()?;
        let app_id = manifest.id.clone();
        if self.store.get().apps.contains_key(&app_id) {
            return Err(RuntimeError::AlreadyRunning(app_id));
        }

        let desktop = manifest.target_desktop.clone();
        if !self.binding.stack().is_stack_registered(&desktop) {
            return Err(RuntimeError::UnknownSurface(desktop));
        }

        // Container first: a failed launch must not leave a slot behind
        let params = self.context_params(&app_id, &options);
        let container = self
            .containers
            .create_container(&app_id, &manifest.url, &params)?;
        let slot = match self.binding.stack().get_or_create_slot(&desktop, &app_id) {
            Some(slot) => slot,
            None => {
                self.containers.remove_container(&container);
                return Err(RuntimeError::UnknownSurface(desktop));
            }
        };

        let now = self.clock.now_ms();
        let has_splash = manifest.has_splash_screen();
        let name = manifest.name.clone();
        let permissions = manifest.permissions().to_vec();

        let mut instance = MiniappInstance::new(manifest, Some(container.clone()), now);
        instance.ctx.theme = options.theme;
        let presentation = MiniappPresentation::new(app_id.clone(), desktop);

        let mut pending = Pending::new(insert_app(&self.store.get(), instance, presentation));
        let (state, transition_id) =
            begin_presentation_transition(&pending.state, app_id.as_str(), TransitionKind::Present);
        pending.state = state;
        pending.push(RuntimeEvent::Launch {
            app_id: app_id.clone(),
        });
        let initial = if has_splash {
            MiniappState::Splash
        } else {
            MiniappState::Launching
        };
        pending.transition(app_id.as_str(), initial);

        let events = self.publish(pending);
        self.containers.mount_visible(&container, &slot);
        self.bridge.attach(&container, &app_id, &name, &permissions);
        if has_splash {
            self.arm_splash(&app_id, now);
        }

        info!(app_id = %app_id, ?transition_id, "app launched");
        self.finish(events);
        Ok(app_id)
    }

    /// The container finished loading its document
    pub fn container_loaded(&mut self, app_id: &str) -> bool {
        let state = self.store.get();
        let next = transition_process_status(&state, app_id, ProcessStatus::Loaded);
        let changed = self.store.replace(next);
        if changed {
            debug!(app_id, "container loaded");
        }
        changed
    }

    /// Start closing an app.
    ///
    /// The app moves to `closing` and its presentation starts a dismiss
    /// transition. It is removed by [`settle_flow`](Self::settle_flow) once
    /// that transition finishes.
    pub fn close_app(&mut self, app_id: &str) -> bool {
        let state = self.store.get();
        let was_active = match state.app(app_id) {
            Some(app) if app.state == MiniappState::Closing => return false,
            Some(app) => app.state == MiniappState::Active,
            None => return false,
        };

        let mut pending = Pending::new(state);
        pending.transition(app_id, MiniappState::Closing);
        pending.update(|state| release_focus(state, app_id));
        let (state, transition_id) =
            begin_presentation_transition(&pending.state, app_id, TransitionKind::Dismiss);
        pending.state = state;
        if was_active {
            if let Some(id) = pending.app_id(app_id) {
                pending.push(RuntimeEvent::Deactivate { app_id: id });
            }
        }

        let events = self.publish(pending);
        info!(app_id, ?transition_id, "app closing");
        self.finish(events);
        true
    }

    /// Settle an app after its animation finished.
    ///
    /// Directional flows settle (`opening` → `opened` and so on) and a
    /// presenting presentation becomes presented. A closing app whose
    /// dismiss transition finished is removed. Returns whether anything
    /// changed.
    pub fn settle_flow(&mut self, app_id: &str) -> bool {
        let state = self.store.get();
        let app = match state.app(app_id) {
            Some(app) => app,
            None => return false,
        };
        let dismissing = state
            .presentation(app_id)
            .map_or(true, |p| p.state == PresentationState::Dismissing);

        if app.state == MiniappState::Closing && dismissing {
            let mut pending = Pending::new(remove_app(&state, app_id));
            pending.push(RuntimeEvent::Close {
                app_id: app.app_id.clone(),
                reason: CloseReason::Dismissed,
            });

            let events = self.publish(pending);
            if let Some(container) = &app.container {
                self.containers.remove_container(container);
            }
            info!(app_id, "app closed");
            self.finish(events);
            return true;
        }

        self.store.replace(settle_app_flow(&state, app_id))
    }

    /// Context values appended to the container URL
    fn context_params(&self, app_id: &AppId, options: &LaunchOptions) -> Vec<(String, String)> {
        let mut params = vec![
            ("appId".to_string(), app_id.to_string()),
            ("theme".to_string(), options.theme.as_str().to_string()),
        ];
        if let Some(locale) = options.locale.as_ref().or(self.config.locale.as_ref()) {
            params.push(("locale".to_string(), locale.clone()));
        }
        params
    }
}
