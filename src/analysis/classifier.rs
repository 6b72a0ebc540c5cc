use crate::analysis::types::{ElementAction, ElementType};

const NAV_KEYWORDS: [&str; 11] = [
    "首页", "我", "消息", "关注", "发现", "购物", "视频", "home", "profile", "message", "follow",
];
const NAV_RESOURCE_IDS: [&str; 3] = ["tab_", "nav_", "bottom_"];
const TAB_KEYWORDS: [&str; 3] = ["tab", "选项", "标签"];

/// Maps a node's class name, texts, and resource id to a semantic element
/// type and the action set it supports.
pub struct ElementClassifier;

impl ElementClassifier {
    /// Ordered rule cascade. The class name is authoritative when it
    /// matches a known widget; only then do keyword and resource-id
    /// heuristics get a say.
    pub fn classify_element_type(
        class_name: &str,
        text: &str,
        content_desc: &str,
        resource_id: &str,
    ) -> ElementType {
        if class_name.contains("Button") {
            return ElementType::Button;
        }
        if class_name.contains("EditText") {
            return ElementType::EditText;
        }
        if class_name.contains("TextView") {
            return ElementType::TextView;
        }
        if class_name.contains("ImageView") {
            return ElementType::ImageView;
        }
        if class_name.contains("CheckBox") {
            return ElementType::Checkbox;
        }
        if class_name.contains("Switch") {
            return ElementType::Switch;
        }
        if class_name.contains("Spinner") {
            return ElementType::Spinner;
        }
        if class_name.contains("WebView") {
            return ElementType::WebView;
        }

        let combined = format!("{} {}", text, content_desc).to_lowercase();
        let resource_id = resource_id.to_lowercase();

        if Self::is_navigation_button(&combined, &resource_id) {
            return ElementType::NavigationButton;
        }
        if Self::is_tab_button(&combined, &resource_id) {
            return ElementType::TabButton;
        }
        if Self::is_list_item(class_name, &resource_id) {
            return ElementType::ListItem;
        }

        ElementType::Other
    }

    fn is_navigation_button(text: &str, resource_id: &str) -> bool {
        NAV_KEYWORDS.iter().any(|k| text.contains(k))
            || NAV_RESOURCE_IDS.iter().any(|id| resource_id.contains(id))
    }

    fn is_tab_button(text: &str, resource_id: &str) -> bool {
        TAB_KEYWORDS
            .iter()
            .any(|k| text.contains(k) || resource_id.contains(k))
    }

    fn is_list_item(class_name: &str, resource_id: &str) -> bool {
        class_name.contains("ListView")
            || class_name.contains("RecyclerView")
            || resource_id.contains("list_item")
            || resource_id.contains("recycler_item")
    }

    /// Pure derivation table from type and flags to the supported action
    /// set. `_checkable` is part of the signature for callers that track
    /// it; the current table derives toggling from the Switch type alone.
    pub fn determine_supported_actions(
        element_type: ElementType,
        clickable: bool,
        scrollable: bool,
        editable: bool,
        _checkable: bool,
    ) -> Vec<ElementAction> {
        let mut actions = Vec::new();

        if clickable {
            actions.push(ElementAction::Click);
            actions.push(ElementAction::LongClick);
        }
        if editable || element_type == ElementType::EditText {
            actions.push(ElementAction::InputText);
            actions.push(ElementAction::ClearText);
        }
        if scrollable {
            actions.extend([
                ElementAction::SwipeUp,
                ElementAction::SwipeDown,
                ElementAction::SwipeLeft,
                ElementAction::SwipeRight,
                ElementAction::ScrollTo,
            ]);
        }
        if element_type == ElementType::Switch {
            actions.push(ElementAction::SetSwitchState);
        }
        if element_type == ElementType::Spinner {
            actions.push(ElementAction::SelectOption);
        }

        actions
    }

    /// Human-readable caption for display lists.
    pub fn describe(element_type: ElementType, text: &str, content_desc: &str) -> String {
        let base = if !text.is_empty() {
            text
        } else if !content_desc.is_empty() {
            content_desc
        } else {
            "无文本"
        };

        match element_type {
            ElementType::Button => format!("按钮: {base}"),
            ElementType::EditText => format!("输入框: {base}"),
            ElementType::TextView => format!("文本: {base}"),
            ElementType::NavigationButton => format!("导航按钮: {base}"),
            ElementType::ImageView => format!("图片: {base}"),
            other => format!("{other}: {base}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_name_wins_over_keywords() {
        // "首页" would match the navigation keywords, but the class name
        // decides first.
        assert_eq!(
            ElementClassifier::classify_element_type("android.widget.Button", "首页", "", ""),
            ElementType::Button
        );
        assert_eq!(
            ElementClassifier::classify_element_type("android.widget.ImageButton", "", "", ""),
            ElementType::Button
        );
        assert_eq!(
            ElementClassifier::classify_element_type("android.widget.EditText", "", "", ""),
            ElementType::EditText
        );
        assert_eq!(
            ElementClassifier::classify_element_type("android.webkit.WebView", "", "", ""),
            ElementType::WebView
        );
    }

    #[test]
    fn navigation_keywords_and_resource_prefixes() {
        assert_eq!(
            ElementClassifier::classify_element_type("android.view.View", "消息", "", ""),
            ElementType::NavigationButton
        );
        assert_eq!(
            ElementClassifier::classify_element_type("android.view.View", "", "Home", ""),
            ElementType::NavigationButton
        );
        assert_eq!(
            ElementClassifier::classify_element_type(
                "android.view.View",
                "",
                "",
                "com.xingin.xhs:id/tab_discover"
            ),
            ElementType::NavigationButton
        );
    }

    #[test]
    fn tab_and_list_heuristics_come_after_navigation() {
        assert_eq!(
            ElementClassifier::classify_element_type("android.view.View", "标签一", "", ""),
            ElementType::TabButton
        );
        assert_eq!(
            ElementClassifier::classify_element_type(
                "androidx.recyclerview.widget.RecyclerView",
                "",
                "",
                ""
            ),
            ElementType::ListItem
        );
        assert_eq!(
            ElementClassifier::classify_element_type(
                "android.view.View",
                "",
                "",
                "com.app:id/list_item_container"
            ),
            ElementType::ListItem
        );
        assert_eq!(
            ElementClassifier::classify_element_type("android.view.View", "", "", ""),
            ElementType::Other
        );
    }

    #[test]
    fn action_table_follows_flags() {
        let actions = ElementClassifier::determine_supported_actions(
            ElementType::Button,
            true,
            false,
            false,
            false,
        );
        assert_eq!(actions, vec![ElementAction::Click, ElementAction::LongClick]);

        let actions = ElementClassifier::determine_supported_actions(
            ElementType::EditText,
            false,
            false,
            true,
            false,
        );
        assert_eq!(
            actions,
            vec![ElementAction::InputText, ElementAction::ClearText]
        );

        let actions = ElementClassifier::determine_supported_actions(
            ElementType::Other,
            false,
            true,
            false,
            false,
        );
        assert!(actions.contains(&ElementAction::SwipeUp));
        assert!(actions.contains(&ElementAction::ScrollTo));
        assert_eq!(actions.len(), 5);
    }

    #[test]
    fn switch_and_spinner_gain_their_specific_actions() {
        let actions = ElementClassifier::determine_supported_actions(
            ElementType::Switch,
            true,
            false,
            false,
            true,
        );
        assert!(actions.contains(&ElementAction::SetSwitchState));

        let actions = ElementClassifier::determine_supported_actions(
            ElementType::Spinner,
            true,
            false,
            false,
            false,
        );
        assert!(actions.contains(&ElementAction::SelectOption));
    }

    #[test]
    fn non_interactive_elements_support_nothing() {
        let actions = ElementClassifier::determine_supported_actions(
            ElementType::TextView,
            false,
            false,
            false,
            false,
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn descriptions_fall_back_from_text_to_desc() {
        assert_eq!(
            ElementClassifier::describe(ElementType::Button, "确定", ""),
            "按钮: 确定"
        );
        assert_eq!(
            ElementClassifier::describe(ElementType::ImageView, "", "头像"),
            "图片: 头像"
        );
        assert_eq!(
            ElementClassifier::describe(ElementType::Other, "", ""),
            "other: 无文本"
        );
    }
}
