pub mod analysis;
pub mod config;
pub mod device;
pub mod errors;
pub mod executor;
pub mod geometry;
pub mod parser;
pub mod repository;
pub mod service;

pub use analysis::{
    ElementAction, ElementClassifier, ElementDeduplicationService, ElementGroupInfo,
    ElementGroupType, ElementStatistics, ElementType, PageAnalysis, PageAnalysisOrchestrator,
    PageInfo, PageType, PageTypeIdentifier, ScreenResolution, UIElement,
};
pub use config::PageAnalysisConfig;
pub use device::{UiSnapshot, UiSnapshotProvider};
pub use errors::{UiScopeError, UiScopeResult};
pub use executor::{ActionDispatcher, ActionParams, ActionResult, UIActionCommand};
pub use geometry::{ElementBounds, ScreenRegion};
pub use repository::{InMemoryRepository, JsonFileRepository, PageAnalysisRepository};
pub use service::PageAnalysisService;

/// Installs the default tracing subscriber. Call once at startup from the
/// embedding application; library consumers that bring their own
/// subscriber skip this.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// One-call convenience over the orchestrator for pre-captured dumps.
pub fn analyze_page(
    xml: &str,
    app_package: &str,
    activity_name: &str,
    screen_resolution: ScreenResolution,
    config: &PageAnalysisConfig,
) -> PageAnalysis {
    PageAnalysisOrchestrator::new().analyze(xml, app_package, activity_name, screen_resolution, config)
}
