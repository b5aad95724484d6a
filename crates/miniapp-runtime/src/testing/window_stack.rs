//! In-memory window stack

use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use miniapp_core::{AppId, MountSlot, SurfaceId};

use crate::stack::WindowStack;

type SlotKey = (SurfaceId, AppId);

/// Window stack backed by maps, with opaque unit nodes as slots
#[derive(Default)]
pub struct MemoryWindowStack {
    surfaces: RefCell<BTreeSet<SurfaceId>>,
    slots: RefCell<BTreeMap<SlotKey, MountSlot>>,
    interactive: RefCell<BTreeMap<SlotKey, bool>>,
}

impl MemoryWindowStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack with the given surfaces registered
    pub fn with_surfaces(surfaces: &[&str]) -> Self {
        let stack = Self::new();
        for surface in surfaces {
            stack.register(SurfaceId::from(*surface));
        }
        stack
    }

    pub fn register(&self, surface: SurfaceId) {
        self.surfaces.borrow_mut().insert(surface);
    }

    /// Last interactivity set for a slot
    pub fn is_interactive(&self, desktop: &SurfaceId, app_id: &AppId) -> Option<bool> {
        self.interactive
            .borrow()
            .get(&(desktop.clone(), app_id.clone()))
            .copied()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.borrow().len()
    }
}

impl WindowStack for MemoryWindowStack {
    fn is_stack_registered(&self, desktop: &SurfaceId) -> bool {
        self.surfaces.borrow().contains(desktop)
    }

    fn get_slot(&self, desktop: &SurfaceId, app_id: &AppId) -> Option<MountSlot> {
        self.slots
            .borrow()
            .get(&(desktop.clone(), app_id.clone()))
            .cloned()
    }

    fn get_or_create_slot(&self, desktop: &SurfaceId, app_id: &AppId) -> Option<MountSlot> {
        if !self.is_stack_registered(desktop) {
            return None;
        }
        let slot = self
            .slots
            .borrow_mut()
            .entry((desktop.clone(), app_id.clone()))
            .or_insert_with(|| {
                let node: Rc<dyn Any> = Rc::new(());
                MountSlot {
                    desktop: desktop.clone(),
                    app_id: app_id.clone(),
                    node: Some(node),
                }
            })
            .clone();
        Some(slot)
    }

    fn set_slot_interactive(&self, desktop: &SurfaceId, app_id: &AppId, interactive: bool) {
        self.interactive
            .borrow_mut()
            .insert((desktop.clone(), app_id.clone()), interactive);
    }
}
