use std::collections::HashMap;

use tracing::debug;

use crate::analysis::types::{ElementGroupInfo, ElementGroupType, ElementType, UIElement};
use crate::geometry::ScreenRegion;

/// Collapses visually repeated elements (list rows, repeated follow
/// buttons) into representative groups while every instance keeps its
/// identity and position within the group.
pub struct ElementDeduplicationService;

impl ElementDeduplicationService {
    /// Buckets elements by group key, then annotates every member with its
    /// group info. Exactly one member per bucket is the representative.
    ///
    /// Bucket membership is decided by the exact group key. The
    /// `_threshold` parameter is accepted for interface stability with
    /// configs that carry a similarity threshold; it does not influence
    /// membership (see the design notes in DESIGN.md).
    pub fn deduplicate_and_group(elements: Vec<UIElement>, _threshold: f64) -> Vec<UIElement> {
        // Buckets keep first-seen key order so output order and group
        // indices are deterministic run to run.
        let mut key_order: Vec<String> = Vec::new();
        let mut buckets: HashMap<String, Vec<UIElement>> = HashMap::new();

        for element in elements {
            let key = Self::generate_group_key(&element);
            let bucket = buckets.entry(key.clone()).or_default();
            if bucket.is_empty() {
                key_order.push(key);
            }
            bucket.push(element);
        }

        let mut result = Vec::new();
        for key in key_order {
            let bucket = buckets.remove(&key).expect("bucket exists for ordered key");
            let total = bucket.len();

            if total == 1 {
                let mut element = bucket.into_iter().next().expect("singleton bucket");
                element.group_info = ElementGroupInfo {
                    group_key: key,
                    group_type: ElementGroupType::Individual,
                    group_index: 0,
                    group_total: 1,
                    is_representative: true,
                };
                result.push(element);
                continue;
            }

            let group_type = Self::determine_group_type(&bucket[0]);
            let representative = Self::select_representative(&bucket);
            debug!(key = %key, total, "collapsed duplicate group");

            for (index, mut element) in bucket.into_iter().enumerate() {
                element.group_info = ElementGroupInfo {
                    group_key: key.clone(),
                    group_type,
                    group_index: index,
                    group_total: total,
                    is_representative: index == representative,
                };
                result.push(element);
            }
        }

        result
    }

    /// Similarity signature: type, normalized text, class, and coarse
    /// vertical region of the element's center.
    pub fn generate_group_key(element: &UIElement) -> String {
        let region = ScreenRegion::from_center_y(element.center_point().1);
        format!(
            "{}_{}_{}_{}",
            element.element_type.as_str(),
            Self::normalize_text(&element.text),
            element.class_name,
            region.as_str()
        )
    }

    fn normalize_text(text: &str) -> String {
        text.trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Strict priority: non-empty text beats none, clickable beats not,
    /// then the element appearing higher on screen wins.
    fn select_representative(bucket: &[UIElement]) -> usize {
        let mut best = 0;
        for index in 1..bucket.len() {
            if Self::outranks(&bucket[index], &bucket[best]) {
                best = index;
            }
        }
        best
    }

    fn outranks(challenger: &UIElement, incumbent: &UIElement) -> bool {
        let c = (!challenger.text.is_empty(), challenger.is_clickable);
        let i = (!incumbent.text.is_empty(), incumbent.is_clickable);
        if c != i {
            return c > i;
        }
        challenger.center_point().1 < incumbent.center_point().1
    }

    /// Semantic label for a bucket, derived from its first element with
    /// the same heuristics as element-level classification.
    fn determine_group_type(element: &UIElement) -> ElementGroupType {
        if element.is_navigation_button() {
            return ElementGroupType::NavigationButtons;
        }
        if element.is_social_button() {
            return ElementGroupType::SocialButtons;
        }
        match element.element_type {
            ElementType::TabButton => ElementGroupType::TabItems,
            ElementType::EditText => ElementGroupType::InputFields,
            ElementType::Button => ElementGroupType::ActionButtons,
            ElementType::ListItem => ElementGroupType::ListItems,
            _ => ElementGroupType::Individual,
        }
    }
}
