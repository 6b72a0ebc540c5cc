use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::page::ScreenResolution;
use crate::errors::UiScopeResult;

/// One capture instant from a device: the raw UiAutomator dump plus the
/// app/activity and screen metadata taken at the same moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub xml: String,
    pub package_name: String,
    pub activity_name: String,
    pub screen_resolution: ScreenResolution,
    pub captured_at: DateTime<Utc>,
}

/// Seam to the device collaborator that produces UI dumps. Implemented
/// outside this crate (an ADB bridge, an emulator, a fixture in tests).
#[async_trait]
pub trait UiSnapshotProvider: Send + Sync {
    async fn capture(&self, device_id: &str) -> UiScopeResult<UiSnapshot>;
}
