use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::analysis::orchestrator::PageAnalysisOrchestrator;
use crate::analysis::page::PageAnalysis;
use crate::analysis::types::{ElementAction, UIElement};
use crate::config::PageAnalysisConfig;
use crate::device::{UiSnapshot, UiSnapshotProvider};
use crate::errors::UiScopeResult;
use crate::executor::{dispatch_element_action, ActionDispatcher, ActionParams, ActionResult};
use crate::repository::PageAnalysisRepository;

/// Application-level facade wiring the collaborator seams to the core
/// pipeline: capture from the device, analyze synchronously, persist,
/// dispatch element actions.
pub struct PageAnalysisService {
    provider: Arc<dyn UiSnapshotProvider>,
    dispatcher: Arc<dyn ActionDispatcher>,
    repository: Arc<dyn PageAnalysisRepository>,
    orchestrator: PageAnalysisOrchestrator,
    config: PageAnalysisConfig,
}

impl PageAnalysisService {
    pub fn new(
        provider: Arc<dyn UiSnapshotProvider>,
        dispatcher: Arc<dyn ActionDispatcher>,
        repository: Arc<dyn PageAnalysisRepository>,
        config: PageAnalysisConfig,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            repository,
            orchestrator: PageAnalysisOrchestrator::new(),
            config,
        }
    }

    /// Captures the device's current screen, analyzes it, and saves the
    /// result. A failed analysis (unusable dump) is still saved and
    /// returned as a normal value; only collaborator failures (capture,
    /// persistence) become `Err` and they surface unchanged.
    pub async fn analyze_device(&self, device_id: &str) -> UiScopeResult<PageAnalysis> {
        let snapshot = self.provider.capture(device_id).await?;
        let mut analysis = self.analyze_snapshot(&snapshot);
        analysis.device_id = Some(device_id.to_string());

        self.repository.save(&analysis).await?;
        info!(
            device = device_id,
            analysis = %analysis.id,
            success = analysis.success,
            "analysis stored"
        );
        Ok(analysis)
    }

    /// Analyzes a pre-captured snapshot without touching the device or the
    /// repository. The core computation never suspends.
    pub fn analyze_snapshot(&self, snapshot: &UiSnapshot) -> PageAnalysis {
        self.orchestrator.analyze(
            &snapshot.xml,
            &snapshot.package_name,
            &snapshot.activity_name,
            snapshot.screen_resolution,
            &self.config,
        )
    }

    /// Analyzes every listed device independently. Runs are sequential and
    /// fully isolated — nothing is shared between them.
    pub async fn batch_analyze(
        &self,
        device_ids: &[String],
    ) -> HashMap<String, UiScopeResult<PageAnalysis>> {
        let mut results = HashMap::new();
        for device_id in device_ids {
            let result = self.analyze_device(device_id).await;
            results.insert(device_id.clone(), result);
        }
        results
    }

    /// Validates and dispatches one element action on a device.
    pub async fn execute_element_action(
        &self,
        device_id: &str,
        element: &UIElement,
        action: ElementAction,
        params: &ActionParams,
    ) -> UiScopeResult<ActionResult> {
        dispatch_element_action(self.dispatcher.as_ref(), device_id, element, action, params).await
    }

    pub async fn analysis_by_id(&self, analysis_id: &str) -> UiScopeResult<Option<PageAnalysis>> {
        self.repository.find_by_id(analysis_id).await
    }

    pub async fn analysis_history(
        &self,
        device_id: &str,
        limit: usize,
    ) -> UiScopeResult<Vec<PageAnalysis>> {
        self.repository.find_by_device(device_id, limit).await
    }

    /// Substring search inside a stored analysis. `None` when the id is
    /// unknown.
    pub async fn search_elements(
        &self,
        analysis_id: &str,
        query: &str,
    ) -> UiScopeResult<Option<Vec<UIElement>>> {
        let analysis = self.repository.find_by_id(analysis_id).await?;
        Ok(analysis.map(|a| a.search_elements(query).into_iter().cloned().collect()))
    }
}
