//! UI bridge port.
//!
//! Structural intents (navigation, forms, tables, dialogs) are not actions
//! in the catalog; they are forwarded to the hosting UI as [`UiCommand`]s.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use voxflow_actions::ExecutionResult;
use voxflow_intent::{Intent, IntentType};

/// Sort order requested for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A UI operation with its extracted slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum UiCommand {
    OpenPatient { query: String },
    Navigate { destination: String },
    GoBack,
    GoForward,
    FillField { field: String, value: String },
    SubmitForm,
    ClearForm,
    ClickButton { label: String },
    SelectOption { dropdown: Option<String>, option: String },
    SortTable { column: String, direction: Option<SortDirection> },
    FilterTable { column: String, value: Option<String> },
    OpenModal { name: String },
    CloseModal { name: Option<String> },
    Search { query: String },
}

impl UiCommand {
    /// Translate a structural or click intent.
    ///
    /// Returns `None` for intents the UI does not handle (`help`, `stop`,
    /// `unknown`, custom) and when a required slot is missing.
    pub fn from_intent(intent: &Intent) -> Option<Self> {
        let target = intent.target.clone();
        let value = intent.value.clone();

        let command = match &intent.intent_type {
            IntentType::OpenPatient => Self::OpenPatient { query: target? },
            IntentType::Navigate => Self::Navigate {
                destination: target?,
            },
            IntentType::GoBack => Self::GoBack,
            IntentType::GoForward => Self::GoForward,
            IntentType::FillForm => Self::FillField {
                field: target?,
                value: value?,
            },
            IntentType::SubmitForm => Self::SubmitForm,
            IntentType::ClearForm => Self::ClearForm,
            IntentType::ClickButton => Self::ClickButton { label: target? },
            IntentType::ClickSubmit => Self::click("submit"),
            IntentType::ClickCancel => Self::click("cancel"),
            IntentType::ClickSave => Self::click("save"),
            IntentType::ClickDelete => Self::click("delete"),
            IntentType::SelectOption => Self::SelectOption {
                dropdown: target,
                option: value?,
            },
            IntentType::SortTable => Self::SortTable {
                column: target?,
                direction: value.as_deref().and_then(SortDirection::parse),
            },
            IntentType::FilterTable => Self::FilterTable {
                column: target?,
                value,
            },
            IntentType::OpenModal => Self::OpenModal { name: target? },
            IntentType::CloseModal => Self::CloseModal { name: target },
            IntentType::Search => Self::Search { query: value? },
            IntentType::Help | IntentType::Stop | IntentType::Unknown | IntentType::Custom(_) => {
                return None;
            }
        };
        Some(command)
    }

    fn click(label: &str) -> Self {
        Self::ClickButton {
            label: label.to_owned(),
        }
    }
}

impl fmt::Display for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenPatient { query } => write!(f, "open patient {query}"),
            Self::Navigate { destination } => write!(f, "navigate to {destination}"),
            Self::GoBack => f.write_str("go back"),
            Self::GoForward => f.write_str("go forward"),
            Self::FillField { field, value } => write!(f, "set {field} to {value}"),
            Self::SubmitForm => f.write_str("submit form"),
            Self::ClearForm => f.write_str("clear form"),
            Self::ClickButton { label } => write!(f, "click {label}"),
            Self::SelectOption { dropdown, option } => match dropdown {
                Some(d) => write!(f, "select {option} in {d}"),
                None => write!(f, "select {option}"),
            },
            Self::SortTable { column, direction } => match direction {
                Some(SortDirection::Ascending) => write!(f, "sort by {column} ascending"),
                Some(SortDirection::Descending) => write!(f, "sort by {column} descending"),
                None => write!(f, "sort by {column}"),
            },
            Self::FilterTable { column, value } => match value {
                Some(v) => write!(f, "filter {column} by {v}"),
                None => write!(f, "filter by {column}"),
            },
            Self::OpenModal { name } => write!(f, "open {name} dialog"),
            Self::CloseModal { name } => match name {
                Some(n) => write!(f, "close {n} dialog"),
                None => f.write_str("close dialog"),
            },
            Self::Search { query } => write!(f, "search for {query}"),
        }
    }
}

/// The hosting UI.
#[async_trait]
pub trait UiBridge: Send + Sync {
    async fn perform(&self, command: &UiCommand) -> ExecutionResult;
}

/// Used when no UI is attached: every command fails as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnattachedUi;

#[async_trait]
impl UiBridge for UnattachedUi {
    async fn perform(&self, command: &UiCommand) -> ExecutionResult {
        ExecutionResult::failure(format!("cannot {command}: no UI attached"))
    }
}
