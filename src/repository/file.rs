use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::analysis::page::PageAnalysis;
use crate::errors::{UiScopeError, UiScopeResult};
use crate::repository::PageAnalysisRepository;

/// Simple key/value store: one pretty-printed JSON file per analysis under
/// a single directory. Good enough for history and lookup; anything
/// fancier belongs to an external collaborator.
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.local/share/uiscope/analyses` (or the platform equivalent),
    /// falling back to the working directory.
    pub fn default_location() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        Self::new(base.join("uiscope").join("analyses"))
    }

    fn path_for(&self, analysis_id: &str) -> PathBuf {
        self.dir.join(format!("{analysis_id}.json"))
    }

    fn read_analysis(path: &Path) -> UiScopeResult<PageAnalysis> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| UiScopeError::Repository(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| UiScopeError::Repository(format!("decode {}: {e}", path.display())))
    }
}

#[async_trait]
impl PageAnalysisRepository for JsonFileRepository {
    async fn save(&self, analysis: &PageAnalysis) -> UiScopeResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| UiScopeError::Repository(format!("create {}: {e}", self.dir.display())))?;
        let path = self.path_for(&analysis.id);
        let content = serde_json::to_string_pretty(analysis)?;
        std::fs::write(&path, content)
            .map_err(|e| UiScopeError::Repository(format!("write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "analysis saved");
        Ok(())
    }

    async fn find_by_id(&self, analysis_id: &str) -> UiScopeResult<Option<PageAnalysis>> {
        let path = self.path_for(analysis_id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_analysis(&path).map(Some)
    }

    async fn find_by_device(
        &self,
        device_id: &str,
        limit: usize,
    ) -> UiScopeResult<Vec<PageAnalysis>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(UiScopeError::Repository(format!(
                    "list {}: {e}",
                    self.dir.display()
                )))
            }
        };

        let mut matches: Vec<PageAnalysis> = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let analysis = Self::read_analysis(&path)?;
            if analysis.device_id.as_deref() == Some(device_id) {
                matches.push(analysis);
            }
        }
        matches.sort_by(|a, b| b.page_info.captured_at.cmp(&a.page_info.captured_at));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn delete(&self, analysis_id: &str) -> UiScopeResult<bool> {
        let path = self.path_for(analysis_id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(UiScopeError::Repository(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::page::{PageInfo, ScreenResolution};
    use crate::analysis::page_type::PageType;
    use crate::config::PageAnalysisConfig;
    use chrono::Utc;

    fn analysis(device_id: &str) -> PageAnalysis {
        let mut analysis = PageAnalysis::new(
            PageInfo {
                page_name: "小红书首页".to_string(),
                app_package: "com.xingin.xhs".to_string(),
                activity_name: "MainActivity".to_string(),
                page_type: PageType::XiaohongshuHome,
                screen_resolution: ScreenResolution {
                    width: 1080,
                    height: 2244,
                },
                captured_at: Utc::now(),
            },
            Vec::new(),
            PageAnalysisConfig::default(),
            2.0,
        );
        analysis.device_id = Some(device_id.to_string());
        analysis
    }

    #[tokio::test]
    async fn json_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        let a = analysis("emulator-5554");
        repo.save(&a).await.unwrap();

        let found = repo.find_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(found.id, a.id);
        assert_eq!(found.page_info.page_name, "小红书首页");
        assert!(found.success);
    }

    #[tokio::test]
    async fn missing_ids_are_none_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert!(repo.find_by_id("analysis_nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn device_filter_ignores_other_devices() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        repo.save(&analysis("emulator-5554")).await.unwrap();
        repo.save(&analysis("emulator-5554")).await.unwrap();
        repo.save(&analysis("emulator-5556")).await.unwrap();

        let history = repo.find_by_device("emulator-5554", 10).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        let a = analysis("emulator-5554");
        repo.save(&a).await.unwrap();

        assert!(repo.delete(&a.id).await.unwrap());
        assert!(repo.find_by_id(&a.id).await.unwrap().is_none());
        assert!(!repo.delete(&a.id).await.unwrap());
    }

    #[tokio::test]
    async fn listing_an_unwritten_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("never-created"));
        assert!(repo
            .find_by_device("emulator-5554", 10)
            .await
            .unwrap()
            .is_empty());
    }
}
