//! Container handle capability
//!
//! The state snapshot stores container handles as trait objects so the
//! reducer never depends on a concrete browsing-container type. Platform
//! adapters (DOM iframes, in-memory test doubles) implement the trait.

use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

use crate::types::{AppId, ContainerType, SurfaceId};

/// Slot a container can be mounted into.
///
/// `node` is an opaque platform object (for example a DOM element) that the
/// matching container adapter downcasts.
#[derive(Clone)]
pub struct MountSlot {
    /// Surface owning the slot
    pub desktop: SurfaceId,
    /// App the slot was created for
    pub app_id: AppId,
    /// Platform node backing the slot
    pub node: Option<Rc<dyn Any>>,
}

impl MountSlot {
    /// Slot with no platform node
    pub fn detached(desktop: SurfaceId, app_id: AppId) -> Self {
        Self {
            desktop,
            app_id,
            node: None,
        }
    }

    /// Whether two slots address the same mount point
    pub fn same_target(&self, other: &MountSlot) -> bool {
        if self.desktop != other.desktop || self.app_id != other.app_id {
            return false;
        }
        match (&self.node, &other.node) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for MountSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountSlot")
            .field("desktop", &self.desktop)
            .field("app_id", &self.app_id)
            .field("has_node", &self.node.is_some())
            .finish()
    }
}

/// Capability interface over one browsing container
pub trait ContainerHandle {
    /// Container implementation kind
    fn container_type(&self) -> ContainerType;

    /// Move the container into the visible region (or its mount slot)
    fn move_to_foreground(&self);

    /// Move the container into the off-screen region without destroying it
    fn move_to_background(&self);

    /// Re-parent the container into `slot`
    fn set_mount_target(&self, slot: &MountSlot);

    /// Current mount target, if any
    fn mount_target(&self) -> Option<MountSlot>;

    /// Blank the content source and detach the container
    fn destroy(&self);

    /// Whether the container is still attached to the document
    fn is_connected(&self) -> bool;
}

/// Shared container handle stored in the runtime state
pub type SharedContainer = Rc<dyn ContainerHandle>;
