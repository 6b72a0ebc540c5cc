use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::page_type::PageType;
use crate::analysis::types::{ElementType, UIElement};
use crate::config::PageAnalysisConfig;
use crate::geometry::ScreenRegion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenResolution {
    pub width: u32,
    pub height: u32,
}

/// Identity of the captured page: app, activity, resolution, and capture
/// instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub page_name: String,
    pub app_package: String,
    pub activity_name: String,
    pub page_type: PageType,
    pub screen_resolution: ScreenResolution,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDistribution {
    pub top: usize,
    pub middle: usize,
    pub bottom: usize,
}

impl RegionDistribution {
    pub fn total(&self) -> usize {
        self.top + self.middle + self.bottom
    }
}

/// Derived counters over the final element list, computed once at
/// aggregate construction. Never recomputed incrementally — the aggregate
/// is immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementStatistics {
    pub total_elements: usize,
    /// Count of group representatives (equals total minus collapsed
    /// duplicates).
    pub unique_elements: usize,
    /// Distinct group keys with more than one member.
    pub duplicate_groups: usize,
    pub type_distribution: HashMap<String, usize>,
    /// Elements with at least one supported action.
    pub actionable_elements: usize,
    pub region_distribution: RegionDistribution,
}

impl ElementStatistics {
    /// Fraction of elements that survive deduplication; 1.0 for an empty
    /// or fully unique list.
    pub fn dedup_ratio(&self) -> f64 {
        if self.total_elements == 0 {
            1.0
        } else {
            self.unique_elements as f64 / self.total_elements as f64
        }
    }
}

/// Elements of one type within a region, for the hierarchy view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementTypeGroup {
    pub element_type: ElementType,
    pub count: usize,
    pub elements: Vec<UIElement>,
}

/// One region's slice of the hierarchy view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementHierarchyNode {
    pub region: ScreenRegion,
    pub groups: Vec<ElementTypeGroup>,
}

/// Result of one analysis run. Constructed atomically from a completed
/// pipeline pass; a failed run still produces a valid value with
/// `success = false` so downstream consumers render the error state
/// without special-casing a second type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub id: String,
    /// Device the dump came from, when the capture went through the device
    /// seam. Absent for analyses of pre-captured XML.
    pub device_id: Option<String>,
    pub page_info: PageInfo,
    pub elements: Vec<UIElement>,
    pub statistics: ElementStatistics,
    pub config: PageAnalysisConfig,
    pub analysis_time_ms: f64,
    pub success: bool,
    pub error_message: Option<String>,
}

impl PageAnalysis {
    pub fn new(
        page_info: PageInfo,
        elements: Vec<UIElement>,
        config: PageAnalysisConfig,
        analysis_time_ms: f64,
    ) -> Self {
        let statistics = Self::calculate_statistics(&elements);
        Self {
            id: generate_analysis_id(),
            device_id: None,
            page_info,
            elements,
            statistics,
            config,
            analysis_time_ms,
            success: true,
            error_message: None,
        }
    }

    pub fn failed(
        page_info: PageInfo,
        config: PageAnalysisConfig,
        analysis_time_ms: f64,
        message: String,
    ) -> Self {
        Self {
            id: generate_analysis_id(),
            device_id: None,
            page_info,
            elements: Vec::new(),
            statistics: Self::calculate_statistics(&[]),
            config,
            analysis_time_ms,
            success: false,
            error_message: Some(message),
        }
    }

    fn calculate_statistics(elements: &[UIElement]) -> ElementStatistics {
        let mut type_distribution: HashMap<String, usize> = HashMap::new();
        let mut region_distribution = RegionDistribution::default();
        let mut actionable_elements = 0;
        let mut unique_elements = 0;
        let mut duplicate_keys: HashSet<&str> = HashSet::new();

        for element in elements {
            *type_distribution
                .entry(element.element_type.as_str().to_string())
                .or_insert(0) += 1;

            if !element.supported_actions.is_empty() {
                actionable_elements += 1;
            }
            if element.group_info.is_representative {
                unique_elements += 1;
            }
            if element.group_info.group_total > 1 {
                duplicate_keys.insert(element.group_info.group_key.as_str());
            }

            match element.region() {
                ScreenRegion::Top => region_distribution.top += 1,
                ScreenRegion::Middle => region_distribution.middle += 1,
                ScreenRegion::Bottom => region_distribution.bottom += 1,
            }
        }

        ElementStatistics {
            total_elements: elements.len(),
            unique_elements,
            duplicate_groups: duplicate_keys.len(),
            type_distribution,
            actionable_elements,
            region_distribution,
        }
    }

    /// The deduplicated view: one element per group.
    pub fn representative_elements(&self) -> Vec<&UIElement> {
        self.elements
            .iter()
            .filter(|e| e.group_info.is_representative)
            .collect()
    }

    pub fn elements_by_type(&self, element_type: ElementType) -> Vec<&UIElement> {
        self.elements
            .iter()
            .filter(|e| e.element_type == element_type)
            .collect()
    }

    pub fn navigation_buttons(&self) -> Vec<&UIElement> {
        self.elements
            .iter()
            .filter(|e| e.is_navigation_button())
            .collect()
    }

    pub fn clickable_elements(&self) -> Vec<&UIElement> {
        self.elements.iter().filter(|e| e.is_clickable).collect()
    }

    pub fn editable_elements(&self) -> Vec<&UIElement> {
        self.elements.iter().filter(|e| e.is_editable).collect()
    }

    pub fn elements_by_region(&self, region: ScreenRegion) -> Vec<&UIElement> {
        self.elements
            .iter()
            .filter(|e| e.region() == region)
            .collect()
    }

    /// Case-insensitive substring search over text, description, and
    /// resource id.
    pub fn search_elements(&self, query: &str) -> Vec<&UIElement> {
        let query = query.to_lowercase();
        self.elements
            .iter()
            .filter(|e| {
                e.text.to_lowercase().contains(&query)
                    || e.description.to_lowercase().contains(&query)
                    || e.resource_id
                        .as_deref()
                        .is_some_and(|id| id.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Region → type view of the element list, for tree displays.
    pub fn element_hierarchy(&self) -> Vec<ElementHierarchyNode> {
        [ScreenRegion::Top, ScreenRegion::Middle, ScreenRegion::Bottom]
            .into_iter()
            .map(|region| ElementHierarchyNode {
                region,
                groups: Self::group_by_type(self.elements_by_region(region)),
            })
            .collect()
    }

    fn group_by_type(elements: Vec<&UIElement>) -> Vec<ElementTypeGroup> {
        let mut order: Vec<ElementType> = Vec::new();
        let mut groups: HashMap<ElementType, Vec<UIElement>> = HashMap::new();
        for element in elements {
            let bucket = groups.entry(element.element_type).or_default();
            if bucket.is_empty() {
                order.push(element.element_type);
            }
            bucket.push(element.clone());
        }
        order
            .into_iter()
            .map(|element_type| {
                let elements = groups.remove(&element_type).unwrap_or_default();
                ElementTypeGroup {
                    element_type,
                    count: elements.len(),
                    elements,
                }
            })
            .collect()
    }
}

fn generate_analysis_id() -> String {
    format!("analysis_{}", Uuid::new_v4().simple())
}
