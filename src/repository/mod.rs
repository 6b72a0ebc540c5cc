pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::analysis::page::PageAnalysis;
use crate::errors::UiScopeResult;

pub use file::JsonFileRepository;
pub use memory::InMemoryRepository;

/// Seam to the persistence collaborator. Analyses are plain serializable
/// snapshots; the repository holds them for history and lookup and never
/// mutates them. Failures surface to the caller unchanged — they are never
/// swallowed into an empty result.
#[async_trait]
pub trait PageAnalysisRepository: Send + Sync {
    async fn save(&self, analysis: &PageAnalysis) -> UiScopeResult<()>;
    async fn find_by_id(&self, analysis_id: &str) -> UiScopeResult<Option<PageAnalysis>>;
    /// Most recent analyses for a device, newest first.
    async fn find_by_device(&self, device_id: &str, limit: usize)
        -> UiScopeResult<Vec<PageAnalysis>>;
    /// Returns whether an entry was removed.
    async fn delete(&self, analysis_id: &str) -> UiScopeResult<bool>;
}
