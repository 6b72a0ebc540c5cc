use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::analysis::page::PageAnalysis;
use crate::errors::UiScopeResult;
use crate::repository::PageAnalysisRepository;

/// In-process repository, mainly for tests and short-lived sessions.
/// Entries are kept in insertion order; saving an existing id replaces it.
#[derive(Default)]
pub struct InMemoryRepository {
    entries: Mutex<Vec<PageAnalysis>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageAnalysisRepository for InMemoryRepository {
    async fn save(&self, analysis: &PageAnalysis) -> UiScopeResult<()> {
        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.iter_mut().find(|a| a.id == analysis.id) {
            *existing = analysis.clone();
        } else {
            entries.push(analysis.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, analysis_id: &str) -> UiScopeResult<Option<PageAnalysis>> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().find(|a| a.id == analysis_id).cloned())
    }

    async fn find_by_device(
        &self,
        device_id: &str,
        limit: usize,
    ) -> UiScopeResult<Vec<PageAnalysis>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|a| a.device_id.as_deref() == Some(device_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete(&self, analysis_id: &str) -> UiScopeResult<bool> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|a| a.id != analysis_id);
        Ok(entries.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::page::{PageInfo, ScreenResolution};
    use crate::analysis::page_type::PageType;
    use crate::config::PageAnalysisConfig;
    use chrono::Utc;

    fn analysis(device_id: Option<&str>) -> PageAnalysis {
        let mut analysis = PageAnalysis::new(
            PageInfo {
                page_name: "未知页面".to_string(),
                app_package: "com.example".to_string(),
                activity_name: "MainActivity".to_string(),
                page_type: PageType::Unknown,
                screen_resolution: ScreenResolution {
                    width: 1080,
                    height: 1920,
                },
                captured_at: Utc::now(),
            },
            Vec::new(),
            PageAnalysisConfig::default(),
            1.0,
        );
        analysis.device_id = device_id.map(str::to_string);
        analysis
    }

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let repo = InMemoryRepository::new();
        let a = analysis(Some("emulator-5554"));
        repo.save(&a).await.unwrap();

        let found = repo.find_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(found.id, a.id);
        assert!(repo.find_by_id("analysis_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn device_history_is_newest_first_and_limited() {
        let repo = InMemoryRepository::new();
        let first = analysis(Some("emulator-5554"));
        let second = analysis(Some("emulator-5554"));
        let other = analysis(Some("emulator-5556"));
        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();
        repo.save(&other).await.unwrap();

        let history = repo.find_by_device("emulator-5554", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);

        let limited = repo.find_by_device("emulator-5554", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_something_was_removed() {
        let repo = InMemoryRepository::new();
        let a = analysis(None);
        repo.save(&a).await.unwrap();

        assert!(repo.delete(&a.id).await.unwrap());
        assert!(!repo.delete(&a.id).await.unwrap());
    }
}
