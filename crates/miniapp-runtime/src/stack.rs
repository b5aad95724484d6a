//! Window stack / surface registry
//!
//! The registry is owned by the rendering layer. The runtime only asks it
//! for mount slots and toggles their interactivity.

use miniapp_core::{AppId, MountSlot, SurfaceId};

/// Surface registry consumed by the binding layer and the launcher
pub trait WindowStack {
    /// Whether a surface with this id has been registered
    fn is_stack_registered(&self, desktop: &SurfaceId) -> bool;

    /// Existing slot for an app on a surface
    fn get_slot(&self, desktop: &SurfaceId, app_id: &AppId) -> Option<MountSlot>;

    /// Existing slot, or a new one. `None` when the surface is unknown.
    fn get_or_create_slot(&self, desktop: &SurfaceId, app_id: &AppId) -> Option<MountSlot>;

    /// Enable or disable input on an app's slot
    fn set_slot_interactive(&self, desktop: &SurfaceId, app_id: &AppId, interactive: bool);
}
