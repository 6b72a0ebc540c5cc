use std::time::Instant;

use chrono::Utc;
use tracing::{error, info};

use crate::analysis::classifier::ElementClassifier;
use crate::analysis::dedup::ElementDeduplicationService;
use crate::analysis::page::{PageAnalysis, PageInfo, ScreenResolution};
use crate::analysis::page_type::PageTypeIdentifier;
use crate::analysis::types::{element_fingerprint, ElementGroupInfo, UIElement};
use crate::config::PageAnalysisConfig;
use crate::errors::UiScopeResult;
use crate::parser::{HierarchyBuilder, IndexedNode, NodeParser};

/// Runs the full pipeline: parse → hierarchy → classify → deduplicate →
/// aggregate. Synchronous and allocation-scoped per call; concurrent
/// analyses for different devices share nothing.
pub struct PageAnalysisOrchestrator;

impl PageAnalysisOrchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes one captured screen. Never returns an `Err`: a fatal stage
    /// failure (an unusable document) is reported through a `PageAnalysis`
    /// with `success = false` so callers and persistence stay uniform.
    pub fn analyze(
        &self,
        xml: &str,
        app_package: &str,
        activity_name: &str,
        screen_resolution: ScreenResolution,
        config: &PageAnalysisConfig,
    ) -> PageAnalysis {
        let started = Instant::now();

        let (page_type, page_name) = PageTypeIdentifier::identify(app_package, activity_name);
        let mut page_info = PageInfo {
            page_name,
            app_package: app_package.to_string(),
            activity_name: activity_name.to_string(),
            page_type,
            screen_resolution,
            captured_at: Utc::now(),
        };

        let nodes = match NodeParser::parse(xml) {
            Ok(nodes) => nodes,
            Err(e) => {
                error!(package = app_package, error = %e, "page analysis failed");
                page_info.page_name = "分析失败".to_string();
                return PageAnalysis::failed(
                    page_info,
                    config.clone(),
                    elapsed_ms(started),
                    e.to_string(),
                );
            }
        };

        let indexed = HierarchyBuilder::build(nodes);
        let mut elements = Vec::new();

        for node in &indexed {
            let raw = &node.raw;
            if !config.include_invisible_elements && !raw.bounds.is_visible() {
                continue;
            }

            let element_type = ElementClassifier::classify_element_type(
                &raw.class_name,
                &raw.text,
                &raw.content_desc,
                &raw.resource_id,
            );
            let is_editable = raw.class_name.contains("EditText");

            if !config.include_non_clickable
                && !(raw.clickable || is_editable || raw.scrollable)
            {
                continue;
            }
            if !config.element_type_filters.is_empty()
                && !config.element_type_filters.contains(&element_type)
            {
                continue;
            }

            let supported_actions = ElementClassifier::determine_supported_actions(
                element_type,
                raw.clickable,
                raw.scrollable,
                is_editable,
                raw.checkable,
            );

            elements.push(UIElement {
                id: format!("element_{}", elements.len()),
                text: raw.text.clone(),
                element_type,
                bounds: raw.bounds,
                resource_id: (!raw.resource_id.is_empty()).then(|| raw.resource_id.clone()),
                class_name: raw.class_name.clone(),
                is_clickable: raw.clickable,
                is_editable,
                is_enabled: raw.enabled,
                is_scrollable: raw.scrollable,
                supported_actions,
                group_info: ElementGroupInfo::ungrouped(),
                description: ElementClassifier::describe(element_type, &raw.text, &raw.content_desc),
                xpath: Some(raw.xpath.clone()),
                node_path: Some(raw.node_path.clone()),
                fingerprint: element_fingerprint(&raw.class_name, &raw.text, &raw.bounds),
                screenshot: None,
            });
        }

        let elements = if config.enable_deduplication {
            ElementDeduplicationService::deduplicate_and_group(
                elements,
                config.min_similarity_threshold,
            )
        } else {
            elements
        };

        let elements: Vec<UIElement> = match config.max_elements {
            Some(max) => elements.into_iter().take(max).collect(),
            None => elements,
        };

        info!(
            package = app_package,
            elements = elements.len(),
            elapsed_ms = elapsed_ms(started),
            "page analysis complete"
        );
        PageAnalysis::new(page_info, elements, config.clone(), elapsed_ms(started))
    }

    /// Structural view for inspectors: every parseable node with its
    /// bounds-derived parent, children, and depth. Unlike [`Self::analyze`]
    /// this propagates the parse error, since there is no aggregate to
    /// carry it.
    pub fn index_nodes(&self, xml: &str) -> UiScopeResult<Vec<IndexedNode>> {
        Ok(HierarchyBuilder::build(NodeParser::parse(xml)?))
    }
}

impl Default for PageAnalysisOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::ElementType;

    const SCREEN: ScreenResolution = ScreenResolution {
        width: 1080,
        height: 2244,
    };

    fn analyze(xml: &str, config: &PageAnalysisConfig) -> PageAnalysis {
        PageAnalysisOrchestrator::new().analyze(
            xml,
            "com.xingin.xhs",
            "MainActivity",
            SCREEN,
            config,
        )
    }

    const HOME_XML: &str = r#"<hierarchy rotation="0">
  <node class="android.widget.FrameLayout" package="com.xingin.xhs" bounds="[0,0][1080,2244]">
    <node text="搜索" class="android.widget.Button" bounds="[900,60][1060,150]" clickable="true"/>
    <node text="笔记一" class="android.widget.TextView" bounds="[0,300][1080,700]" clickable="true"/>
    <node text="首页" class="android.view.ViewGroup" resource-id="com.xingin.xhs:id/tab_home" bounds="[0,2100][270,2244]" clickable="true"/>
    <node text="我" class="android.view.ViewGroup" resource-id="com.xingin.xhs:id/tab_me" bounds="[810,2100][1080,2244]" clickable="true"/>
  </node>
</hierarchy>"#;

    #[test]
    fn analyzes_a_home_screen_end_to_end() {
        let analysis = analyze(HOME_XML, &PageAnalysisConfig::unfiltered());

        assert!(analysis.success);
        assert_eq!(analysis.page_info.page_name, "小红书首页");
        // the full-screen FrameLayout is not clickable but unfiltered keeps it
        assert_eq!(analysis.elements.len(), 5);
        assert_eq!(analysis.statistics.total_elements, 5);
        assert!(analysis.statistics.actionable_elements >= 4);
        assert!(analysis.elements.iter().all(|e| e.xpath.is_some()));
    }

    #[test]
    fn default_config_keeps_only_interactive_elements() {
        let analysis = analyze(HOME_XML, &PageAnalysisConfig::default());

        assert!(analysis.success);
        assert_eq!(analysis.elements.len(), 4);
        assert!(analysis.elements.iter().all(|e| e.is_clickable));
    }

    #[test]
    fn missing_bounds_drops_one_node_but_succeeds() {
        let xml = r#"<hierarchy>
  <node text="a" class="android.widget.Button" bounds="[0,0][100,50]" clickable="true"/>
  <node text="b" class="android.widget.Button" clickable="true"/>
  <node text="c" class="android.widget.Button" bounds="[200,0][300,50]" clickable="true"/>
  <node text="d" class="android.widget.Button" bounds="[400,0][500,50]" clickable="true"/>
</hierarchy>"#;
        let analysis = analyze(xml, &PageAnalysisConfig::unfiltered());

        assert!(analysis.success);
        assert_eq!(analysis.elements.len(), 3);
    }

    #[test]
    fn garbage_input_yields_a_failed_analysis_value() {
        let analysis = analyze("not xml", &PageAnalysisConfig::default());

        assert!(!analysis.success);
        assert!(analysis.elements.is_empty());
        assert!(analysis.error_message.is_some());
        assert_eq!(analysis.page_info.page_name, "分析失败");
    }

    #[test]
    fn max_elements_caps_the_final_list() {
        let mut config = PageAnalysisConfig::unfiltered();
        config.max_elements = Some(2);
        let analysis = analyze(HOME_XML, &config);

        assert_eq!(analysis.elements.len(), 2);
        assert_eq!(analysis.statistics.total_elements, 2);
    }

    #[test]
    fn type_filters_restrict_classification_output() {
        let mut config = PageAnalysisConfig::unfiltered();
        config.element_type_filters = vec![ElementType::NavigationButton];
        let analysis = analyze(HOME_XML, &config);

        assert!(analysis
            .elements
            .iter()
            .all(|e| e.element_type == ElementType::NavigationButton));
        assert_eq!(analysis.elements.len(), 2);
    }

    #[test]
    fn zero_area_nodes_are_filtered_before_classification() {
        let xml = r#"<hierarchy>
  <node text="ghost" class="android.widget.Button" bounds="[10,10][10,60]" clickable="true"/>
  <node text="real" class="android.widget.Button" bounds="[0,0][100,50]" clickable="true"/>
</hierarchy>"#;
        let analysis = analyze(xml, &PageAnalysisConfig::unfiltered());

        assert_eq!(analysis.elements.len(), 1);
        assert_eq!(analysis.elements[0].text, "real");
    }

    #[test]
    fn disabling_deduplication_leaves_elements_ungrouped() {
        let analysis = {
            let mut config = PageAnalysisConfig::unfiltered();
            config.enable_deduplication = false;
            analyze(HOME_XML, &config)
        };

        assert!(analysis
            .elements
            .iter()
            .all(|e| e.group_info.group_key.is_empty() && e.group_info.group_total == 1));
    }

    #[test]
    fn ids_are_a_per_analysis_sequence() {
        let analysis = analyze(HOME_XML, &PageAnalysisConfig::unfiltered());
        let mut ids: Vec<&str> = analysis.elements.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), analysis.elements.len());
        assert!(ids.iter().all(|id| id.starts_with("element_")));
    }

    #[test]
    fn index_nodes_exposes_bounds_derived_structure() {
        let nodes = PageAnalysisOrchestrator::new().index_nodes(HOME_XML).unwrap();

        assert_eq!(nodes.len(), 5);
        // every child of the root FrameLayout resolves to it by bounds
        assert_eq!(nodes[1].parent_index, Some(0));
        assert_eq!(nodes[1].depth, 1);
        assert_eq!(nodes[0].child_indices.len(), 4);
    }
}
