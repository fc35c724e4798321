//! Intent value types.
//!
//! An [`Intent`] is produced fresh for every utterance and never mutated
//! afterwards.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Intent type
// ---------------------------------------------------------------------------

/// The kind of command an utterance was recognized as.
///
/// Serialized as its snake_case name; names that are not built in round-trip
/// through [`IntentType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntentType {
    OpenPatient,
    Navigate,
    GoBack,
    GoForward,
    FillForm,
    SubmitForm,
    ClearForm,
    ClickButton,
    ClickSubmit,
    ClickCancel,
    ClickSave,
    ClickDelete,
    SelectOption,
    SortTable,
    FilterTable,
    OpenModal,
    CloseModal,
    Search,
    Help,
    Stop,
    /// A dynamically registered intent.
    Custom(String),
    /// Nothing matched.
    Unknown,
}

impl IntentType {
    /// The snake_case name of this intent type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenPatient => "open_patient",
            Self::Navigate => "navigate",
            Self::GoBack => "go_back",
            Self::GoForward => "go_forward",
            Self::FillForm => "fill_form",
            Self::SubmitForm => "submit_form",
            Self::ClearForm => "clear_form",
            Self::ClickButton => "click_button",
            Self::ClickSubmit => "click_submit",
            Self::ClickCancel => "click_cancel",
            Self::ClickSave => "click_save",
            Self::ClickDelete => "click_delete",
            Self::SelectOption => "select_option",
            Self::SortTable => "sort_table",
            Self::FilterTable => "filter_table",
            Self::OpenModal => "open_modal",
            Self::CloseModal => "close_modal",
            Self::Search => "search",
            Self::Help => "help",
            Self::Stop => "stop",
            Self::Custom(name) => name,
            Self::Unknown => "unknown",
        }
    }

    /// Whether this is one of the click intents (`click_*` or `click_button`).
    pub fn is_click(&self) -> bool {
        matches!(
            self,
            Self::ClickButton
                | Self::ClickSubmit
                | Self::ClickCancel
                | Self::ClickSave
                | Self::ClickDelete
        )
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "open_patient" => Self::OpenPatient,
            "navigate" => Self::Navigate,
            "go_back" => Self::GoBack,
            "go_forward" => Self::GoForward,
            "fill_form" => Self::FillForm,
            "submit_form" => Self::SubmitForm,
            "clear_form" => Self::ClearForm,
            "click_button" => Self::ClickButton,
            "click_submit" => Self::ClickSubmit,
            "click_cancel" => Self::ClickCancel,
            "click_save" => Self::ClickSave,
            "click_delete" => Self::ClickDelete,
            "select_option" => Self::SelectOption,
            "sort_table" => Self::SortTable,
            "filter_table" => Self::FilterTable,
            "open_modal" => Self::OpenModal,
            "close_modal" => Self::CloseModal,
            "search" => Self::Search,
            "help" => Self::Help,
            "stop" => Self::Stop,
            "unknown" => Self::Unknown,
            other => Self::Custom(other.to_owned()),
        })
    }
}

impl From<String> for IntentType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<IntentType> for String {
    fn from(value: IntentType) -> Self {
        value.as_str().to_owned()
    }
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// Structured interpretation of a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// The recognized intent kind.
    #[serde(rename = "type")]
    pub intent_type: IntentType,

    /// Action name; the snake_case intent name for matched intents.
    pub action: String,

    /// Primary slot (patient query, destination, field, column, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Secondary slot (field value, option, sort direction, search query, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Named captures of the matching pattern.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, String>,

    /// Confidence score in `[0, 1]`.
    pub confidence: f64,

    /// The trimmed utterance that was parsed.
    pub raw_text: String,
}

impl Intent {
    /// Confidence assigned when no pattern matches.
    pub const UNKNOWN_CONFIDENCE: f64 = 0.5;

    /// Build the "no match" intent for an utterance.
    pub fn unknown(raw_text: impl Into<String>) -> Self {
        Self {
            intent_type: IntentType::Unknown,
            action: "unknown".into(),
            target: None,
            value: None,
            parameters: HashMap::new(),
            confidence: Self::UNKNOWN_CONFIDENCE,
            raw_text: raw_text.into(),
        }
    }

    /// Whether no pattern matched.
    pub fn is_unknown(&self) -> bool {
        self.intent_type == IntentType::Unknown
    }
}
