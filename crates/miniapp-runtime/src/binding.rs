//! DOM binding layer
//!
//! The only place where [`DomCommand`]s turn into window stack calls, and
//! where containers are re-parented into the slot of their current surface.

use std::rc::Rc;

use miniapp_core::{DomCommand, MiniappInstance, MiniappPresentation};
use tracing::{debug, warn};

use crate::stack::WindowStack;

/// Applies state machine output to the window stack
pub struct DomBinding {
    stack: Rc<dyn WindowStack>,
}

impl DomBinding {
    pub fn new(stack: Rc<dyn WindowStack>) -> Self {
        Self { stack }
    }

    /// Window stack this binding writes to
    pub fn stack(&self) -> &Rc<dyn WindowStack> {
        &self.stack
    }

    /// Apply one command. Returns `false` when the target surface is not
    /// registered and the command was skipped.
    pub fn apply_command(&self, command: &DomCommand) -> bool {
        match command {
            DomCommand::SlotInteractive {
                desktop,
                app_id,
                interactive,
            } => {
                if !self.stack.is_stack_registered(desktop) {
                    warn!(%desktop, %app_id, "slot command for unregistered surface");
                    return false;
                }
                self.stack.set_slot_interactive(desktop, app_id, *interactive);
                debug!(%desktop, %app_id, interactive, "slot interactivity");
                true
            }
        }
    }

    /// Apply a batch of commands in order
    pub fn apply_commands(&self, commands: &[DomCommand]) {
        for command in commands {
            self.apply_command(command);
        }
    }

    /// Point the app's container at the slot of its presentation surface.
    ///
    /// Idempotent: returns `false` when the container already targets that
    /// slot, has no container, or the surface has no slot.
    pub fn sync_mount_target(&self, app: &MiniappInstance, presentation: &MiniappPresentation) -> bool {
        let container = match &app.container {
            Some(container) => container,
            None => return false,
        };
        let slot = match self
            .stack
            .get_or_create_slot(&presentation.desktop, &app.app_id)
        {
            Some(slot) => slot,
            None => {
                warn!(desktop = %presentation.desktop, app_id = %app.app_id, "no slot for container");
                return false;
            }
        };

        if container
            .mount_target()
            .is_some_and(|current| current.same_target(&slot))
        {
            return false;
        }
        container.set_mount_target(&slot);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryWindowStack, RecordingContainer};
    use miniapp_core::{AppId, ContainerHandle, MiniappManifest, SharedContainer, SurfaceId};

    fn command(desktop: &str, interactive: bool) -> DomCommand {
        DomCommand::SlotInteractive {
            desktop: SurfaceId::from(desktop),
            app_id: AppId::from("wallet"),
            interactive,
        }
    }

    #[test]
    fn test_apply_command_registered_surface() {
        let stack = Rc::new(MemoryWindowStack::with_surfaces(&["main"]));
        let binding = DomBinding::new(stack.clone());

        assert!(binding.apply_command(&command("main", true)));
        assert_eq!(
            stack.is_interactive(&SurfaceId::main(), &AppId::from("wallet")),
            Some(true)
        );

        binding.apply_command(&command("main", false));
        assert_eq!(
            stack.is_interactive(&SurfaceId::main(), &AppId::from("wallet")),
            Some(false)
        );
    }

    #[test]
    fn test_apply_command_unregistered_surface_is_skipped() {
        let stack = Rc::new(MemoryWindowStack::with_surfaces(&["main"]));
        let binding = DomBinding::new(stack.clone());

        assert!(!binding.apply_command(&command("stack", true)));
        assert_eq!(
            stack.is_interactive(&SurfaceId::from("stack"), &AppId::from("wallet")),
            None
        );
    }

    #[test]
    fn test_sync_mount_target_is_idempotent() {
        let stack = Rc::new(MemoryWindowStack::with_surfaces(&["main", "stack"]));
        let binding = DomBinding::new(stack.clone());
        let recording = Rc::new(RecordingContainer::new("wallet"));
        let container: SharedContainer = recording.clone();
        let app = MiniappInstance::new(
            MiniappManifest::new("wallet", "Wallet", "/wallet"),
            Some(container),
            0,
        );
        let mut presentation = MiniappPresentation::new(AppId::from("wallet"), SurfaceId::main());

        assert!(binding.sync_mount_target(&app, &presentation));
        assert!(!binding.sync_mount_target(&app, &presentation));
        assert_eq!(recording.mount_count(), 1);

        presentation.desktop = SurfaceId::from("stack");
        assert!(binding.sync_mount_target(&app, &presentation));
        assert_eq!(recording.mount_count(), 2);
        assert_eq!(
            recording.mount_target().map(|slot| slot.desktop),
            Some(SurfaceId::from("stack"))
        );
    }

    #[test]
    fn test_sync_mount_target_without_container() {
        let stack = Rc::new(MemoryWindowStack::with_surfaces(&["main"]));
        let binding = DomBinding::new(stack);
        let app = MiniappInstance::new(MiniappManifest::new("a", "A", "/a"), None, 0);
        let presentation = MiniappPresentation::new(AppId::from("a"), SurfaceId::main());
        assert!(!binding.sync_mount_target(&app, &presentation));
    }
}
