pub mod classifier;
pub mod dedup;
pub mod orchestrator;
pub mod page;
pub mod page_type;
pub mod types;

pub use classifier::ElementClassifier;
pub use dedup::ElementDeduplicationService;
pub use orchestrator::PageAnalysisOrchestrator;
pub use page::{
    ElementHierarchyNode, ElementStatistics, ElementTypeGroup, PageAnalysis, PageInfo,
    RegionDistribution, ScreenResolution,
};
pub use page_type::{PageType, PageTypeIdentifier};
pub use types::{ElementAction, ElementGroupInfo, ElementGroupType, ElementType, UIElement};
