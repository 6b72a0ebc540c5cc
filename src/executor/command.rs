use serde::{Deserialize, Serialize};

use crate::analysis::types::{ElementAction, UIElement};
use crate::errors::{UiScopeError, UiScopeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Command value handed to the execution collaborator. This crate never
/// calls the device itself; it only produces the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UIActionCommand {
    Click { x: i32, y: i32 },
    LongClick { x: i32, y: i32, duration_ms: u32 },
    Input { x: i32, y: i32, text: String, clear_first: bool },
    Swipe { x: i32, y: i32, direction: SwipeDirection },
}

/// Optional caller-supplied parameters for command construction.
#[derive(Debug, Clone, Default)]
pub struct ActionParams {
    pub text: Option<String>,
    pub duration_ms: Option<u32>,
}

const DEFAULT_LONG_CLICK_MS: u32 = 1000;

/// Builds the device command for `action` on `element`, anchored at the
/// element's center point.
///
/// An action outside the element's supported set is rejected here, before
/// any command value exists. Toggle and select actions reduce to a center
/// tap; scroll-to reduces to an upward swipe.
pub fn build_command(
    element: &UIElement,
    action: ElementAction,
    params: &ActionParams,
) -> UiScopeResult<UIActionCommand> {
    if !element.supported_actions.contains(&action) {
        return Err(UiScopeError::UnsupportedAction {
            element_id: element.id.clone(),
            action: action.to_string(),
        });
    }

    let (x, y) = element.center_point();
    let command = match action {
        ElementAction::Click | ElementAction::SetSwitchState | ElementAction::SelectOption => {
            UIActionCommand::Click { x, y }
        }
        ElementAction::LongClick => UIActionCommand::LongClick {
            x,
            y,
            duration_ms: params.duration_ms.unwrap_or(DEFAULT_LONG_CLICK_MS),
        },
        ElementAction::InputText => UIActionCommand::Input {
            x,
            y,
            text: params.text.clone().unwrap_or_default(),
            clear_first: false,
        },
        ElementAction::ClearText => UIActionCommand::Input {
            x,
            y,
            text: String::new(),
            clear_first: true,
        },
        ElementAction::SwipeUp | ElementAction::ScrollTo => UIActionCommand::Swipe {
            x,
            y,
            direction: SwipeDirection::Up,
        },
        ElementAction::SwipeDown => UIActionCommand::Swipe {
            x,
            y,
            direction: SwipeDirection::Down,
        },
        ElementAction::SwipeLeft => UIActionCommand::Swipe {
            x,
            y,
            direction: SwipeDirection::Left,
        },
        ElementAction::SwipeRight => UIActionCommand::Swipe {
            x,
            y,
            direction: SwipeDirection::Right,
        },
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{ElementGroupInfo, ElementType};
    use crate::geometry::ElementBounds;

    fn element(actions: Vec<ElementAction>) -> UIElement {
        UIElement {
            id: "element_7".to_string(),
            text: "确定".to_string(),
            element_type: ElementType::Button,
            bounds: ElementBounds::new(100, 200, 300, 260),
            resource_id: None,
            class_name: "android.widget.Button".to_string(),
            is_clickable: true,
            is_editable: false,
            is_enabled: true,
            is_scrollable: false,
            supported_actions: actions,
            group_info: ElementGroupInfo::ungrouped(),
            description: String::new(),
            xpath: None,
            node_path: None,
            fingerprint: String::new(),
            screenshot: None,
        }
    }

    #[test]
    fn click_targets_the_element_center() {
        let e = element(vec![ElementAction::Click]);
        let command = build_command(&e, ElementAction::Click, &ActionParams::default()).unwrap();
        assert_eq!(command, UIActionCommand::Click { x: 200, y: 230 });
    }

    #[test]
    fn unsupported_actions_are_rejected_before_a_command_exists() {
        let e = element(vec![ElementAction::Click]);
        let err = build_command(&e, ElementAction::InputText, &ActionParams::default())
            .unwrap_err();
        match err {
            UiScopeError::UnsupportedAction { element_id, action } => {
                assert_eq!(element_id, "element_7");
                assert_eq!(action, "input_text");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn clear_text_is_an_empty_clearing_input() {
        let e = element(vec![ElementAction::InputText, ElementAction::ClearText]);
        let command =
            build_command(&e, ElementAction::ClearText, &ActionParams::default()).unwrap();
        assert_eq!(
            command,
            UIActionCommand::Input {
                x: 200,
                y: 230,
                text: String::new(),
                clear_first: true
            }
        );
    }

    #[test]
    fn scroll_to_becomes_an_upward_swipe() {
        let e = element(vec![ElementAction::ScrollTo]);
        let command =
            build_command(&e, ElementAction::ScrollTo, &ActionParams::default()).unwrap();
        assert!(matches!(
            command,
            UIActionCommand::Swipe {
                direction: SwipeDirection::Up,
                ..
            }
        ));
    }

    #[test]
    fn commands_serialize_with_snake_case_tags() {
        let e = element(vec![ElementAction::LongClick]);
        let command = build_command(
            &e,
            ElementAction::LongClick,
            &ActionParams {
                duration_ms: Some(800),
                ..Default::default()
            },
        )
        .unwrap();
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], "long_click");
        assert_eq!(json["duration_ms"], 800);
    }
}
