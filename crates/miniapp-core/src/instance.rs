//! Running instances and their presentation slots

use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::handle::SharedContainer;
use crate::manifest::MiniappManifest;
use crate::types::{
    AppId, ContainerType, MiniappFlow, MiniappState, PresentationState, ProcessStatus, Readiness,
    SurfaceId, Timestamp, TransitionKind,
};

/// Chrome theme hint requested by a mini-app
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChromeTheme {
    #[default]
    Auto,
    Light,
    Dark,
}

impl ChromeTheme {
    /// Wire name, also used as a container context parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ChromeTheme::Auto => "auto",
            ChromeTheme::Light => "light",
            ChromeTheme::Dark => "dark",
        }
    }
}

/// Runtime-controlled context a mini-app may ask to change
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniappCtx {
    /// Chrome theme hint
    pub theme: ChromeTheme,
    /// Title shown in the chrome, overriding the manifest name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Hide the host status bar while the app is foreground
    #[serde(default)]
    pub status_bar_hidden: bool,
}

/// Partial update to a [`MiniappCtx`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtxPatch {
    #[serde(default)]
    pub theme: Option<ChromeTheme>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status_bar_hidden: Option<bool>,
}

impl MiniappCtx {
    /// Apply a patch, returning `None` when nothing would change
    pub fn patched(&self, patch: &CtxPatch) -> Option<MiniappCtx> {
        let mut next = self.clone();
        if let Some(theme) = patch.theme {
            next.theme = theme;
        }
        if let Some(title) = &patch.title {
            next.title = Some(title.clone());
        }
        if let Some(hidden) = patch.status_bar_hidden {
            next.status_bar_hidden = hidden;
        }
        (next != *self).then_some(next)
    }
}

/// One running mini-app
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniappInstance {
    pub app_id: AppId,
    pub manifest: MiniappManifest,
    pub state: MiniappState,
    pub flow: MiniappFlow,
    pub ctx: MiniappCtx,
    pub process_status: ProcessStatus,
    pub readiness: Readiness,
    pub launched_at: Timestamp,
    /// Drives eviction ordering
    pub last_active_at: Timestamp,
    pub container_type: ContainerType,
    #[serde(skip)]
    pub container: Option<SharedContainer>,
}

impl MiniappInstance {
    /// Create an instance in `preparing`
    pub fn new(manifest: MiniappManifest, container: Option<SharedContainer>, now: Timestamp) -> Self {
        let container_type = container
            .as_ref()
            .map(|c| c.container_type())
            .unwrap_or_default();
        Self {
            app_id: manifest.id.clone(),
            manifest,
            state: MiniappState::Preparing,
            flow: MiniappFlow::Closed,
            ctx: MiniappCtx::default(),
            process_status: ProcessStatus::Loading,
            readiness: Readiness::NotReady,
            launched_at: now,
            last_active_at: now,
            container_type,
            container,
        }
    }

    /// Whether a container handle is still attached to this instance
    #[inline]
    pub fn has_container(&self) -> bool {
        self.container.is_some()
    }
}

impl fmt::Debug for MiniappInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniappInstance")
            .field("app_id", &self.app_id)
            .field("state", &self.state)
            .field("flow", &self.flow)
            .field("process_status", &self.process_status)
            .field("readiness", &self.readiness)
            .field("last_active_at", &self.last_active_at)
            .field("has_container", &self.container.is_some())
            .finish()
    }
}

/// Presentational slot for an app on one surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniappPresentation {
    pub app_id: AppId,
    pub desktop: SurfaceId,
    pub state: PresentationState,
    /// Stacking key, rewritten only on activation
    pub z_order: u64,
    pub transition_id: Option<u64>,
    pub transition_kind: Option<TransitionKind>,
}

impl MiniappPresentation {
    /// Hidden presentation at the bottom of the stack
    pub fn new(app_id: AppId, desktop: SurfaceId) -> Self {
        Self {
            app_id,
            desktop,
            state: PresentationState::Hidden,
            z_order: 0,
            transition_id: None,
            transition_kind: None,
        }
    }

    /// Whether a present/dismiss transition is in flight
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition_id.is_some()
    }
}
