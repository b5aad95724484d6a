//! DOM commands emitted by the state machine
//!
//! Commands are plain data. The runtime's binding layer is the only place
//! they turn into calls on the window stack.

use serde::{Deserialize, Serialize};

use crate::types::{AppId, SurfaceId};

/// Side effect requested by a state transition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomCommand {
    /// Toggle whether an app's slot accepts input
    #[serde(rename = "slot:interactive", rename_all = "camelCase")]
    SlotInteractive {
        desktop: SurfaceId,
        app_id: AppId,
        interactive: bool,
    },
}

impl DomCommand {
    /// App the command targets
    pub fn app_id(&self) -> &AppId {
        match self {
            DomCommand::SlotInteractive { app_id, .. } => app_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_shape() {
        let command = DomCommand::SlotInteractive {
            desktop: SurfaceId::main(),
            app_id: AppId::from("wallet"),
            interactive: true,
        };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(
            json,
            r#"{"type":"slot:interactive","desktop":"main","appId":"wallet","interactive":true}"#
        );
        let back: DomCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }
}
