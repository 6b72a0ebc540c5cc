use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::types::{ElementAction, UIElement};
use crate::errors::UiScopeResult;
use crate::executor::command::{build_command, ActionParams, UIActionCommand};

/// Seam to the execution collaborator: something that can run a command on
/// a device and report success. Implemented outside this crate (ADB shell,
/// an emulator bridge, a test double).
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    async fn execute(&self, device_id: &str, command: &UIActionCommand) -> UiScopeResult<()>;
}

/// Outcome of one dispatched element action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub command: UIActionCommand,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Builds and validates the command for `action`, then forwards it.
///
/// Validation happens before the dispatcher is touched, so an unsupported
/// action never reaches the device. Execution failures are reported in the
/// returned `ActionResult`, not as an `Err` — only command construction
/// can fail here.
pub async fn dispatch_element_action(
    dispatcher: &dyn ActionDispatcher,
    device_id: &str,
    element: &UIElement,
    action: ElementAction,
    params: &ActionParams,
) -> UiScopeResult<ActionResult> {
    let command = build_command(element, action, params)?;
    debug!(device = device_id, element = %element.id, action = %action, "dispatching");

    let outcome = dispatcher.execute(device_id, &command).await;
    Ok(ActionResult {
        command,
        success: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
        timestamp: Utc::now(),
    })
}
