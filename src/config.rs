use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analysis::types::ElementType;
use crate::errors::{UiScopeError, UiScopeResult};

/// Analysis tuning knobs. Defaults are applied once at the orchestration
/// boundary; internal stages receive the fully resolved struct, never a
/// partial map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysisConfig {
    /// Keep elements that are neither clickable, editable, nor scrollable.
    #[serde(default)]
    pub include_non_clickable: bool,
    #[serde(default = "default_true")]
    pub enable_deduplication: bool,
    /// Upper bound on the element list after deduplication; `None` keeps
    /// everything.
    #[serde(default = "default_max_elements")]
    pub max_elements: Option<usize>,
    /// Similarity threshold handed to the deduplication service.
    #[serde(default = "default_similarity_threshold")]
    pub min_similarity_threshold: f64,
    /// Keep zero-area nodes instead of filtering them before
    /// classification.
    #[serde(default)]
    pub include_invisible_elements: bool,
    /// When non-empty, only these element types survive classification.
    #[serde(default = "default_type_filters")]
    pub element_type_filters: Vec<ElementType>,
    /// Reserve a screenshot slot per element for the device collaborator
    /// to fill.
    #[serde(default)]
    pub screenshot_elements: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_elements() -> Option<usize> {
    Some(50)
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_type_filters() -> Vec<ElementType> {
    vec![
        ElementType::Button,
        ElementType::EditText,
        ElementType::TextView,
        ElementType::ImageView,
        ElementType::NavigationButton,
    ]
}

impl Default for PageAnalysisConfig {
    fn default() -> Self {
        Self {
            include_non_clickable: false,
            enable_deduplication: true,
            max_elements: default_max_elements(),
            min_similarity_threshold: default_similarity_threshold(),
            include_invisible_elements: false,
            element_type_filters: default_type_filters(),
            screenshot_elements: false,
        }
    }
}

impl PageAnalysisConfig {
    /// A configuration that keeps every parseable element: no type filter,
    /// no interactivity requirement, no cap. Useful for inspectors that
    /// want the raw picture.
    pub fn unfiltered() -> Self {
        Self {
            include_non_clickable: true,
            enable_deduplication: true,
            max_elements: None,
            min_similarity_threshold: default_similarity_threshold(),
            include_invisible_elements: false,
            element_type_filters: Vec::new(),
            screenshot_elements: false,
        }
    }
}

fn resolve_config_path() -> UiScopeResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("uiscope.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("uiscope.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(UiScopeError::Config(
        "uiscope.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> UiScopeResult<PageAnalysisConfig> {
    let path = resolve_config_path()?;
    let content = std::fs::read_to_string(&path)?;
    let config: PageAnalysisConfig = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn save_config(config: &PageAnalysisConfig) -> UiScopeResult<()> {
    let path = resolve_config_path()?;
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
