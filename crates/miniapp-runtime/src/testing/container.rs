//! Recording container host

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use miniapp_core::{AppId, ContainerHandle, ContainerType, MountSlot, SharedContainer};

use crate::container::{ContainerHost, ContainerSpec, BLANK_SOURCE};
use crate::error::ContainerError;

/// Which region a container currently lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Offscreen,
    Visible,
    Detached,
}

/// Container double counting every call
pub struct RecordingContainer {
    app_id: AppId,
    src: RefCell<String>,
    region: Cell<Region>,
    mount: RefCell<Option<MountSlot>>,
    foreground_calls: Cell<usize>,
    background_calls: Cell<usize>,
    mount_calls: Cell<usize>,
    destroy_calls: Cell<usize>,
}

impl RecordingContainer {
    /// Off-screen container with an empty source
    pub fn new(app_id: impl Into<AppId>) -> Self {
        Self {
            app_id: app_id.into(),
            src: RefCell::new(String::new()),
            region: Cell::new(Region::Offscreen),
            mount: RefCell::new(None),
            foreground_calls: Cell::new(0),
            background_calls: Cell::new(0),
            mount_calls: Cell::new(0),
            destroy_calls: Cell::new(0),
        }
    }

    fn with_src(app_id: AppId, src: String) -> Self {
        let container = Self::new(app_id);
        *container.src.borrow_mut() = src;
        container
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn src(&self) -> String {
        self.src.borrow().clone()
    }

    pub fn region(&self) -> Region {
        self.region.get()
    }

    pub fn foreground_count(&self) -> usize {
        self.foreground_calls.get()
    }

    pub fn background_count(&self) -> usize {
        self.background_calls.get()
    }

    pub fn mount_count(&self) -> usize {
        self.mount_calls.get()
    }

    pub fn destroy_count(&self) -> usize {
        self.destroy_calls.get()
    }
}

impl ContainerHandle for RecordingContainer {
    fn container_type(&self) -> ContainerType {
        ContainerType::Iframe
    }

    fn move_to_foreground(&self) {
        self.foreground_calls.set(self.foreground_calls.get() + 1);
        if self.region.get() != Region::Detached {
            self.region.set(Region::Visible);
        }
    }

    fn move_to_background(&self) {
        self.background_calls.set(self.background_calls.get() + 1);
        if self.region.get() != Region::Detached {
            self.region.set(Region::Offscreen);
        }
    }

    fn set_mount_target(&self, slot: &MountSlot) {
        self.mount_calls.set(self.mount_calls.get() + 1);
        *self.mount.borrow_mut() = Some(slot.clone());
    }

    fn mount_target(&self) -> Option<MountSlot> {
        self.mount.borrow().clone()
    }

    fn destroy(&self) {
        self.destroy_calls.set(self.destroy_calls.get() + 1);
        *self.src.borrow_mut() = BLANK_SOURCE.to_string();
        self.region.set(Region::Detached);
        *self.mount.borrow_mut() = None;
    }

    fn is_connected(&self) -> bool {
        self.region.get() != Region::Detached
    }
}

/// Container host keeping every container it built
#[derive(Default)]
pub struct MemoryContainerHost {
    containers: RefCell<BTreeMap<AppId, Rc<RecordingContainer>>>,
    specs: RefCell<Vec<ContainerSpec>>,
    failure: RefCell<Option<String>>,
}

impl MemoryContainerHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create` call fail with a platform error
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.failure.borrow_mut() = Some(message.into());
    }

    /// Latest container built for an app
    pub fn container(&self, app_id: &AppId) -> Option<Rc<RecordingContainer>> {
        self.containers.borrow().get(app_id).cloned()
    }

    /// Every spec passed to `create`, in call order
    pub fn created(&self) -> Vec<ContainerSpec> {
        self.specs.borrow().clone()
    }
}

impl ContainerHost for MemoryContainerHost {
    fn create(&self, spec: &ContainerSpec) -> Result<SharedContainer, ContainerError> {
        if let Some(message) = self.failure.borrow_mut().take() {
            return Err(ContainerError::Platform(message));
        }
        let container = Rc::new(RecordingContainer::with_src(spec.app_id.clone(), spec.src.clone()));
        self.specs.borrow_mut().push(spec.clone());
        self.containers
            .borrow_mut()
            .insert(spec.app_id.clone(), Rc::clone(&container));
        let shared: SharedContainer = container;
        Ok(shared)
    }
}
