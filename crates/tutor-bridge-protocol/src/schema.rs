//! Wire messages exchanged with the remote agent.
//!
//! Field layout (proto3):
//!
//! ```text
//! message ActionRequest  { string request_id = 1; ActionType action_type = 2;
//!                          string target_element_id = 3; map<string,string> parameters = 4; }
//! message ActionResponse { string request_id = 1; bool success = 2; string message = 3; }
//! ```

use std::collections::HashMap;

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActionRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(enumeration = "ActionType", tag = "2")]
    pub action_type: i32,
    #[prost(string, tag = "3")]
    pub target_element_id: String,
    #[prost(map = "string, string", tag = "4")]
    pub parameters: HashMap<String, String>,
}

impl ActionRequest {
    pub fn new(request_id: impl Into<String>, action: ActionType, target: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            action_type: action as i32,
            target_element_id: target.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct ActionResponse {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(string, tag = "3")]
    pub message: String,
}

impl ActionResponse {
    pub fn ok(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(request_id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            message: format!("Error: {error}"),
        }
    }
}

macro_rules! action_types {
    ($($variant:ident = $ordinal:literal => $name:literal,)+) => {
        /// The closed set of remote commands
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
        #[repr(i32)]
        pub enum ActionType {
            $($variant = $ordinal,)+
        }

        impl ActionType {
            pub const ALL: &'static [ActionType] = &[$(ActionType::$variant,)+];

            /// Name as written in the schema
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $(ActionType::$variant => $name,)+
                }
            }

            pub fn from_str_name(value: &str) -> Option<Self> {
                match value {
                    $($name => Some(ActionType::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

action_types! {
    Unspecified = 0 => "ACTION_TYPE_UNSPECIFIED",
    UpdateTextContent = 1 => "UPDATE_TEXT_CONTENT",
    AppendTextContent = 2 => "APPEND_TEXT_CONTENT",
    DisplayText = 3 => "DISPLAY_TEXT",
    UpdateTranscript = 4 => "UPDATE_TRANSCRIPT",
    ClearInput = 5 => "CLEAR_INPUT",
    ShowElement = 6 => "SHOW_ELEMENT",
    HideElement = 7 => "HIDE_ELEMENT",
    ToggleElementVisibility = 8 => "TOGGLE_ELEMENT_VISIBILITY",
    SetVisibility = 9 => "SET_VISIBILITY",
    SetEditorContent = 10 => "SET_EDITOR_CONTENT",
    AppendEditorContent = 11 => "APPEND_EDITOR_CONTENT",
    SetReadonlyRanges = 12 => "SET_READONLY_RANGES",
    StartTimer = 13 => "START_TIMER",
    StopTimer = 14 => "STOP_TIMER",
    PauseTimer = 15 => "PAUSE_TIMER",
    ResetTimer = 16 => "RESET_TIMER",
    UpdateProgress = 17 => "UPDATE_PROGRESS",
    UpdateScore = 18 => "UPDATE_SCORE",
    NavigateToPage = 19 => "NAVIGATE_TO_PAGE",
    SetButtonProperties = 20 => "SET_BUTTON_PROPERTIES",
    EnableButton = 21 => "ENABLE_BUTTON",
    DisableButton = 22 => "DISABLE_BUTTON",
    ShowButtonOptions = 23 => "SHOW_BUTTON_OPTIONS",
    SetLoadingState = 24 => "SET_LOADING_STATE",
    HighlightTextRanges = 25 => "HIGHLIGHT_TEXT_RANGES",
    StrikethroughTextRanges = 26 => "STRIKETHROUGH_TEXT_RANGES",
    SuggestTextEdit = 27 => "SUGGEST_TEXT_EDIT",
    ShowTooltip = 28 => "SHOW_TOOLTIP",
    ClearHighlights = 29 => "CLEAR_HIGHLIGHTS",
    SetActiveHighlight = 30 => "SET_ACTIVE_HIGHLIGHT",
    AcceptSuggestion = 31 => "ACCEPT_SUGGESTION",
}
