use serde::{Deserialize, Serialize};

/// Coarse page classification used for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    XiaohongshuHome,
    XiaohongshuProfile,
    XiaohongshuMessages,
    XiaohongshuSearch,
    XiaohongshuDetail,
    WechatChat,
    WechatContacts,
    Contacts,
    Settings,
    Unknown,
}

/// Maps package + activity to a page type and a display name.
pub struct PageTypeIdentifier;

impl PageTypeIdentifier {
    pub fn identify(app_package: &str, activity_name: &str) -> (PageType, String) {
        if app_package == "com.xingin.xhs" {
            if activity_name.contains("MainActivity") {
                return (PageType::XiaohongshuHome, "小红书首页".to_string());
            }
            if activity_name.contains("ProfileActivity") || activity_name.contains("UserActivity") {
                return (PageType::XiaohongshuProfile, "小红书个人中心".to_string());
            }
            if activity_name.contains("MessageActivity") || activity_name.contains("ChatActivity") {
                return (PageType::XiaohongshuMessages, "小红书消息页".to_string());
            }
            if activity_name.contains("SearchActivity") {
                return (PageType::XiaohongshuSearch, "小红书搜索页".to_string());
            }
            if activity_name.contains("DetailActivity") || activity_name.contains("NoteActivity") {
                return (PageType::XiaohongshuDetail, "小红书详情页".to_string());
            }
            return (PageType::Unknown, "小红书未知页面".to_string());
        }

        if app_package == "com.tencent.mm" {
            if activity_name.contains("ChatActivity") {
                return (PageType::WechatChat, "微信聊天页".to_string());
            }
            if activity_name.contains("ContactActivity") {
                return (PageType::WechatContacts, "微信通讯录".to_string());
            }
            return (PageType::Unknown, "微信未知页面".to_string());
        }

        if app_package.contains("contact") {
            return (PageType::Contacts, "系统通讯录".to_string());
        }

        if app_package.contains("settings") || activity_name.contains("Settings") {
            return (PageType::Settings, "设置页面".to_string());
        }

        (PageType::Unknown, "未知页面".to_string())
    }
}
