//! Runtime state snapshot
//!
//! `MiniappRuntimeState` is treated as immutable once shared: the step
//! functions copy it, change the copy, and hand back a new `Rc`. Holders of
//! the previous `Rc` keep seeing the previous version.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use serde::Serialize;

use crate::instance::{MiniappInstance, MiniappPresentation};
use crate::types::{AppId, MiniappState, SurfaceId};

/// Default cap on warm background instances
pub const DEFAULT_MAX_BACKGROUND_APPS: usize = 3;

/// The whole runtime snapshot
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniappRuntimeState {
    /// Running instances
    pub apps: BTreeMap<AppId, MiniappInstance>,
    /// Presentation slots keyed by app
    pub presentations: BTreeMap<AppId, MiniappPresentation>,
    /// The single globally-active app
    pub active_app_id: Option<AppId>,
    /// App holding input focus (tracks `active_app_id`)
    pub focused_app_id: Option<AppId>,
    /// Monotonic stacking counter
    pub z_order_seed: u64,
    /// Monotonic presentation transition counter
    pub transition_seed: u64,
    /// Whether the multi-app overview is shown
    pub is_stack_view_open: bool,
    /// Eviction cap for background instances
    pub max_background_apps: usize,
}

impl Default for MiniappRuntimeState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BACKGROUND_APPS)
    }
}

impl MiniappRuntimeState {
    /// Create an empty snapshot
    pub fn new(max_background_apps: usize) -> Self {
        Self {
            apps: BTreeMap::new(),
            presentations: BTreeMap::new(),
            active_app_id: None,
            focused_app_id: None,
            z_order_seed: 0,
            transition_seed: 0,
            is_stack_view_open: false,
            max_background_apps,
        }
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// Get an instance
    pub fn app(&self, app_id: &str) -> Option<&MiniappInstance> {
        self.apps.get(app_id)
    }

    /// Get a presentation
    pub fn presentation(&self, app_id: &str) -> Option<&MiniappPresentation> {
        self.presentations.get(app_id)
    }

    /// The active instance, if any
    pub fn active_app(&self) -> Option<&MiniappInstance> {
        self.active_app_id.as_ref().and_then(|id| self.apps.get(id))
    }

    /// Surface an app is presented on, falling back to its manifest
    pub fn desktop_of(&self, app_id: &str) -> Option<SurfaceId> {
        if let Some(presentation) = self.presentations.get(app_id) {
            return Some(presentation.desktop.clone());
        }
        self.apps
            .get(app_id)
            .map(|app| app.manifest.target_desktop.clone())
    }

    /// Ids of instances in `state`, in key order
    pub fn app_ids_in(&self, state: MiniappState) -> Vec<AppId> {
        self.apps
            .values()
            .filter(|app| app.state == state)
            .map(|app| app.app_id.clone())
            .collect()
    }

    /// All app ids, in key order
    pub fn app_ids(&self) -> Vec<AppId> {
        self.apps.keys().cloned().collect()
    }

    /// Presentations sorted by z-order (back to front)
    pub fn presentations_by_z(&self) -> Vec<&MiniappPresentation> {
        let mut presentations: Vec<&MiniappPresentation> = self.presentations.values().collect();
        presentations.sort_by_key(|p| p.z_order);
        presentations
    }

    /// Number of instances
    pub fn count(&self) -> usize {
        self.apps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MiniappManifest;

    fn state_with(ids: &[(&str, MiniappState)]) -> MiniappRuntimeState {
        let mut state = MiniappRuntimeState::default();
        for (id, app_state) in ids {
            let mut instance = MiniappInstance::new(MiniappManifest::new(*id, *id, "/x"), None, 0);
            instance.state = *app_state;
            state.apps.insert(AppId::from(*id), instance);
        }
        state
    }

    #[test]
    fn test_app_ids_in_state() {
        let state = state_with(&[
            ("a", MiniappState::Background),
            ("b", MiniappState::Active),
            ("c", MiniappState::Background),
        ]);
        assert_eq!(
            state.app_ids_in(MiniappState::Background),
            alloc::vec![AppId::from("a"), AppId::from("c")]
        );
        assert_eq!(state.count(), 3);
    }

    #[test]
    fn test_desktop_falls_back_to_manifest() {
        let mut state = state_with(&[("a", MiniappState::Launching)]);
        assert_eq!(state.desktop_of("a"), Some(SurfaceId::main()));

        state.presentations.insert(
            AppId::from("a"),
            MiniappPresentation::new(AppId::from("a"), SurfaceId::from("stack")),
        );
        assert_eq!(state.desktop_of("a"), Some(SurfaceId::from("stack")));
        assert_eq!(state.desktop_of("missing"), None);
    }

    #[test]
    fn test_presentations_by_z() {
        let mut state = MiniappRuntimeState::default();
        for (id, z) in [("a", 3), ("b", 1), ("c", 2)] {
            let mut p = MiniappPresentation::new(AppId::from(id), SurfaceId::main());
            p.z_order = z;
            state.presentations.insert(AppId::from(id), p);
        }
        let order: Vec<&str> = state
            .presentations_by_z()
            .iter()
            .map(|p| p.app_id.as_str())
            .collect();
        assert_eq!(order, alloc::vec!["b", "c", "a"]);
    }
}
