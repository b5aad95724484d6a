//! Stack view, context updates, motion tokens and snapshot export

use miniapp_core::step::{set_stack_view_open, update_ctx};
use miniapp_core::CtxPatch;
use tracing::debug;

use super::MiniappRuntime;
use crate::error::{ConfigError, RuntimeError, RuntimeResult};
use crate::events::RuntimeEvent;
use crate::motion::MotionConfig;

impl MiniappRuntime {
    /// Show the multi-app overview. Idempotent.
    pub fn open_stack_view(&mut self) -> bool {
        self.set_stack_view(true)
    }

    /// Hide the multi-app overview. Idempotent.
    pub fn close_stack_view(&mut self) -> bool {
        self.set_stack_view(false)
    }

    fn set_stack_view(&mut self, open: bool) -> bool {
        let next = set_stack_view_open(&self.store.get(), open);
        if !self.store.replace(next) {
            return false;
        }
        debug!(open, "stack view");
        self.emit(if open {
            RuntimeEvent::StackViewOpen
        } else {
            RuntimeEvent::StackViewClose
        });
        true
    }

    /// Merge a context patch, emitting `app:ctx-change` when it changed
    /// anything
    pub fn update_ctx(&mut self, app_id: &str, patch: &CtxPatch) -> bool {
        let next = update_ctx(&self.store.get(), app_id, patch);
        if !self.store.replace(next) {
            return false;
        }
        let state = self.store.get();
        if let Some(app) = state.app(app_id) {
            self.emit(RuntimeEvent::CtxChange {
                app_id: app.app_id.clone(),
                ctx: app.ctx.clone(),
            });
        }
        true
    }

    /// Current motion tokens
    pub fn motion(&self) -> &MotionConfig {
        &self.config.motion
    }

    /// Replace the motion tokens, returning the new CSS custom properties
    pub fn set_motion(&mut self, motion: MotionConfig) -> RuntimeResult<Vec<(String, String)>> {
        if !motion.is_valid() {
            return Err(ConfigError::Invalid {
                field: "motion",
                reason: format!(
                    "durations must be between 1 and {} ms",
                    MotionConfig::MAX_DURATION_MS
                ),
            }
            .into());
        }
        self.config.motion = motion;
        Ok(self.motion_css_variables())
    }

    /// Motion tokens as CSS custom properties
    pub fn motion_css_variables(&self) -> Vec<(String, String)> {
        self.config.motion.css_variables()
    }

    /// Serialize the current snapshot (without container handles)
    pub fn snapshot_json(&self) -> RuntimeResult<String> {
        serde_json::to_string(&*self.store.get()).map_err(RuntimeError::Snapshot)
    }
}
