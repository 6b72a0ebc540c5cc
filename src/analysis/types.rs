use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::geometry::{ElementBounds, ScreenRegion};

/// Semantic classification of a screen element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Button,
    EditText,
    TextView,
    ImageView,
    ListItem,
    NavigationButton,
    TabButton,
    Switch,
    Checkbox,
    Spinner,
    WebView,
    Other,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Button => "button",
            ElementType::EditText => "edit_text",
            ElementType::TextView => "text_view",
            ElementType::ImageView => "image_view",
            ElementType::ListItem => "list_item",
            ElementType::NavigationButton => "navigation_button",
            ElementType::TabButton => "tab_button",
            ElementType::Switch => "switch",
            ElementType::Checkbox => "checkbox",
            ElementType::Spinner => "spinner",
            ElementType::WebView => "web_view",
            ElementType::Other => "other",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation an element can perform. The set is derived from the
/// element's type and flags, never authored by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementAction {
    Click,
    LongClick,
    InputText,
    ClearText,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
    ScrollTo,
    SetSwitchState,
    SelectOption,
}

impl ElementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementAction::Click => "click",
            ElementAction::LongClick => "long_click",
            ElementAction::InputText => "input_text",
            ElementAction::ClearText => "clear_text",
            ElementAction::SwipeUp => "swipe_up",
            ElementAction::SwipeDown => "swipe_down",
            ElementAction::SwipeLeft => "swipe_left",
            ElementAction::SwipeRight => "swipe_right",
            ElementAction::ScrollTo => "scroll_to",
            ElementAction::SetSwitchState => "set_switch_state",
            ElementAction::SelectOption => "select_option",
        }
    }
}

impl std::fmt::Display for ElementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic label of a deduplication group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementGroupType {
    NavigationButtons,
    ActionButtons,
    ListItems,
    TabItems,
    SocialButtons,
    InputFields,
    Individual,
}

/// Group membership produced by deduplication. Exactly one member per
/// `group_key` is the representative; `group_index` is a stable 0-based
/// position within the group and `group_total` is the bucket size at dedup
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementGroupInfo {
    pub group_key: String,
    pub group_type: ElementGroupType,
    pub group_index: usize,
    pub group_total: usize,
    pub is_representative: bool,
}

impl ElementGroupInfo {
    /// Placeholder for elements that have not been through deduplication
    /// (or were deduplicated into a bucket of one).
    pub fn ungrouped() -> Self {
        Self {
            group_key: String::new(),
            group_type: ElementGroupType::Individual,
            group_index: 0,
            group_total: 1,
            is_representative: true,
        }
    }
}

/// Texts that mark bottom-bar navigation entries in the apps this pipeline
/// targets.
pub(crate) const NAV_TEXTS: [&str; 7] = ["首页", "我", "消息", "关注", "发现", "购物", "视频"];

const SOCIAL_TEXTS: [&str; 6] = ["点赞", "评论", "分享", "收藏", "关注", "取消关注"];

/// Classified, group-annotated view of one screen element. Created once per
/// analysis run and read-only afterward; a re-analysis produces fresh
/// instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIElement {
    /// Per-analysis sequence id (`element_{n}`). The content hash lives in
    /// `fingerprint`; it is a similarity signal, not an identity, because
    /// identical list rows collide on content.
    pub id: String,
    pub text: String,
    pub element_type: ElementType,
    pub bounds: ElementBounds,
    pub resource_id: Option<String>,
    pub class_name: String,
    pub is_clickable: bool,
    pub is_editable: bool,
    pub is_enabled: bool,
    pub is_scrollable: bool,
    pub supported_actions: Vec<ElementAction>,
    pub group_info: ElementGroupInfo,
    pub description: String,
    pub xpath: Option<String>,
    pub node_path: Option<String>,
    pub fingerprint: String,
    /// Base64-encoded crop supplied by the device collaborator, if any.
    pub screenshot: Option<String>,
}

impl UIElement {
    pub fn center_point(&self) -> (i32, i32) {
        self.bounds.center()
    }

    pub fn size(&self) -> (i32, i32) {
        (self.bounds.width(), self.bounds.height())
    }

    pub fn is_visible(&self) -> bool {
        self.bounds.is_visible()
    }

    pub fn region(&self) -> ScreenRegion {
        ScreenRegion::from_center_y(self.center_point().1)
    }

    pub fn is_navigation_button(&self) -> bool {
        self.element_type == ElementType::NavigationButton
            || NAV_TEXTS.iter().any(|t| self.text.contains(t))
    }

    pub fn is_social_button(&self) -> bool {
        SOCIAL_TEXTS.iter().any(|t| self.text.contains(t))
    }

    /// The most sensible default action for this element.
    pub fn recommended_action(&self) -> ElementAction {
        if self.is_editable {
            ElementAction::InputText
        } else if self.is_clickable {
            ElementAction::Click
        } else if self.is_scrollable {
            ElementAction::SwipeDown
        } else {
            ElementAction::Click
        }
    }

    pub fn attach_screenshot(&mut self, image_bytes: &[u8]) {
        self.screenshot = Some(base64::engine::general_purpose::STANDARD.encode(image_bytes));
    }
}

/// Content hash over class, text, and geometry. Secondary similarity
/// signal only — two identical list rows share a fingerprint.
pub fn element_fingerprint(class_name: &str, text: &str, bounds: &ElementBounds) -> String {
    let mut hasher = Sha1::new();
    hasher.update(class_name.as_bytes());
    hasher.update(text.as_bytes());
    hasher.update(bounds.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
