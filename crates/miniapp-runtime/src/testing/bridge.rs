//! Recording permission bridge

use std::cell::RefCell;

use miniapp_core::{AppId, SharedContainer};

use crate::bridge::PermissionBridge;

/// One `attach` call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub app_id: AppId,
    pub name: String,
    pub permissions: Vec<String>,
    /// Whether the container was connected at attach time
    pub connected: bool,
}

#[derive(Default)]
pub struct RecordingBridge {
    attachments: RefCell<Vec<Attachment>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments(&self) -> Vec<Attachment> {
        self.attachments.borrow().clone()
    }
}

impl PermissionBridge for RecordingBridge {
    fn attach(&self, container: &SharedContainer, app_id: &AppId, name: &str, permissions: &[String]) {
        self.attachments.borrow_mut().push(Attachment {
            app_id: app_id.clone(),
            name: name.to_string(),
            permissions: permissions.to_vec(),
            connected: container.is_connected(),
        });
    }
}
