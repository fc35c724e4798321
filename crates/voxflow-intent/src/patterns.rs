//! Built-in intent pattern table.
//!
//! The table is evaluated top to bottom and the first hit wins, so several
//! entries deliberately sit in front of broader ones: `open_patient` before
//! `navigate`, the specific `click_*` entries before `click_button`,
//! `filter_table` ("show only ...") before `navigate` ("show ...").

use regex::{Captures, Regex};

use crate::types::IntentType;

/// Confidence reported for every built-in match.
pub const BUILTIN_CONFIDENCE: f64 = 0.8;

/// Which capture groups feed `Intent::target` and `Intent::value`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotMap {
    pub target: Option<usize>,
    pub value: Option<usize>,
}

impl SlotMap {
    pub const NONE: Self = Self {
        target: None,
        value: None,
    };

    const fn target(group: usize) -> Self {
        Self {
            target: Some(group),
            value: None,
        }
    }

    const fn value(group: usize) -> Self {
        Self {
            target: None,
            value: Some(group),
        }
    }

    const fn both(target: usize, value: usize) -> Self {
        Self {
            target: Some(target),
            value: Some(value),
        }
    }

    /// Extract `(target, value)` from a successful match.
    ///
    /// Groups that did not participate, or captured only whitespace, yield
    /// `None`.
    pub fn extract(&self, caps: &Captures<'_>) -> (Option<String>, Option<String>) {
        let get = |group: Option<usize>| {
            group
                .and_then(|g| caps.get(g))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        (get(self.target), get(self.value))
    }
}

/// A compiled pattern bound to an intent type.
#[derive(Debug, Clone)]
pub struct IntentPattern {
    pub intent_type: IntentType,
    pub regex: Regex,
    pub slots: SlotMap,
    pub confidence: f64,
}

/// Built-in `(intent, pattern, slots)` rows in priority order.
const BUILTIN_TABLE: &[(IntentType, &str, SlotMap)] = &[
    (
        IntentType::OpenPatient,
        r"(?i)^(?:open|show|find|load|pull\s+up)\s+(?:the\s+)?patient\s+(.+)$",
        SlotMap::target(1),
    ),
    (
        IntentType::GoBack,
        r"(?i)^(?:go\s+back|back|previous(?:\s+page)?)$",
        SlotMap::NONE,
    ),
    (
        IntentType::GoForward,
        r"(?i)^(?:go\s+forward|forward|next\s+page)$",
        SlotMap::NONE,
    ),
    (
        IntentType::Help,
        r"(?i)^(?:help(?:\s+me)?|what\s+can\s+i\s+say\??|show\s+(?:voice\s+)?commands)$",
        SlotMap::NONE,
    ),
    (
        IntentType::Stop,
        r"(?i)^(?:stop(?:\s+listening)?|cancel\s+listening|quit|exit)$",
        SlotMap::NONE,
    ),
    (
        IntentType::OpenModal,
        r"(?i)^(?:open|show)\s+(?:the\s+)?(.+?)\s+(?:modal|dialog|popup)$",
        SlotMap::target(1),
    ),
    (
        IntentType::CloseModal,
        r"(?i)^(?:close|dismiss|hide)(?:\s+(?:the\s+)?(?:(.+?)\s+)?(?:modal|dialog|popup))?$",
        SlotMap::target(1),
    ),
    (
        IntentType::ClearForm,
        r"(?i)^(?:clear|reset)(?:\s+(?:the\s+)?form)?$",
        SlotMap::NONE,
    ),
    (
        IntentType::SubmitForm,
        r"(?i)^submit(?:\s+(?:the\s+)?form)?$",
        SlotMap::NONE,
    ),
    (
        IntentType::FillForm,
        r"(?i)^(?:fill(?:\s+in)?|enter|type|set|put)\s+(?:the\s+)?(.+?)\s+(?:with|to|as|=)\s+(.+)$",
        SlotMap::both(1, 2),
    ),
    (
        IntentType::ClickSubmit,
        r"(?i)^(?:click|press|hit|tap)\s+(?:on\s+)?(?:the\s+)?submit(?:\s+button)?$",
        SlotMap::NONE,
    ),
    (
        IntentType::ClickCancel,
        r"(?i)^(?:(?:click|press|hit|tap)\s+(?:on\s+)?(?:the\s+)?)?cancel(?:\s+button)?$",
        SlotMap::NONE,
    ),
    (
        IntentType::ClickSave,
        r"(?i)^(?:(?:click|press|hit|tap)\s+(?:on\s+)?(?:the\s+)?)?save(?:\s+button)?$",
        SlotMap::NONE,
    ),
    (
        IntentType::ClickDelete,
        r"(?i)^(?:(?:click|press|hit|tap)\s+(?:on\s+)?(?:the\s+)?)?(?:delete|remove)(?:\s+button)?$",
        SlotMap::NONE,
    ),
    (
        IntentType::ClickButton,
        r"(?i)^(?:click|press|hit|tap)\s+(?:on\s+)?(?:the\s+)?(.+?)(?:\s+button)?$",
        SlotMap::target(1),
    ),
    (
        IntentType::SelectOption,
        r"(?i)^(?:select|choose|pick)\s+(.+?)(?:\s+(?:from|in)\s+(?:the\s+)?(.+?))?$",
        SlotMap::both(2, 1),
    ),
    (
        IntentType::SortTable,
        r"(?i)^sort\s+(?:the\s+)?(?:table\s+)?(?:by\s+)?(.+?)(?:\s+(ascending|descending|asc|desc))?$",
        SlotMap::both(1, 2),
    ),
    (
        IntentType::FilterTable,
        r"(?i)^(?:filter|show\s+only)\s+(?:the\s+)?(?:table\s+)?(?:by\s+)?(.+?)(?:\s+(?:equals|is|=)\s+(.+))?$",
        SlotMap::both(1, 2),
    ),
    (
        IntentType::Search,
        r"(?i)^(?:search|look\s+up|find)(?:\s+for)?\s+(.+)$",
        SlotMap::value(1),
    ),
    (
        IntentType::Navigate,
        r"(?i)^(?:go\s+to|navigate\s+to|take\s+me\s+to|open|show)\s+(?:the\s+)?(.+?)(?:\s+(?:page|screen|section|tab))?$",
        SlotMap::target(1),
    ),
];

/// Compile the built-in table in priority order.
pub fn builtin_patterns() -> Vec<IntentPattern> {
    BUILTIN_TABLE
        .iter()
        .map(|(intent_type, pattern, slots)| IntentPattern {
            intent_type: intent_type.clone(),
            regex: Regex::new(pattern).expect("built-in intent pattern must compile"),
            slots: *slots,
            confidence: BUILTIN_CONFIDENCE,
        })
        .collect()
}
