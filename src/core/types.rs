//! Core types - platform-independent data structures
//!
//! These types describe what is stored per player and how a record turns
//! into the text shown above the name tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// PLAYER RECORD
// =============================================================================

/// Persisted display configuration for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Stable identity key (the player's real name)
    pub name: String,
    /// Display nickname
    pub nick: String,
    /// Optional honorific shown in brackets before the nick
    #[serde(default)]
    pub title: Option<String>,
    /// Bubble text shown above the name while `time > 0`
    #[serde(default)]
    pub message: String,
    /// Remaining bubble time in whole seconds
    #[serde(default)]
    pub time: u32,
    /// Fields this crate does not know about, kept across rewrites
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerRecord {
    pub fn new(
        name: impl Into<String>,
        nick: impl Into<String>,
        title: Option<String>,
        message: impl Into<String>,
        time: u32,
    ) -> Self {
        Self {
            name: name.into(),
            nick: nick.into(),
            title,
            message: message.into(),
            time,
            extra: Map::new(),
        }
    }

    /// Record for a player seen for the first time: nick is the real name, no bubble
    pub fn fresh(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            nick: name.clone(),
            name,
            title: None,
            message: String::new(),
            time: 0,
            extra: Map::new(),
        }
    }

    /// Title if present and non-empty
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Same record one second later (never below zero)
    pub fn decremented(&self) -> Self {
        Self {
            time: self.time.saturating_sub(1),
            ..self.clone()
        }
    }

    pub fn state(&self) -> BubbleState {
        BubbleState::of(self)
    }
}

// =============================================================================
// BUBBLE STATE
// =============================================================================

/// Countdown state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleState {
    /// No bubble, base name only
    Idle,
    /// Bubble visible, seconds remaining
    Counting(u32),
}

impl BubbleState {
    pub fn of(record: &PlayerRecord) -> Self {
        match record.time {
            0 => BubbleState::Idle,
            n => BubbleState::Counting(n),
        }
    }

    pub fn is_idle(self) -> bool {
        self == BubbleState::Idle
    }
}

// =============================================================================
// DISPLAY FORMAT
// =============================================================================

/// Builds name tag strings from records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayFormat {
    /// Inserted right after the title, inside the brackets
    pub title_suffix: String,
}

impl DisplayFormat {
    pub fn new(title_suffix: impl Into<String>) -> Self {
        Self {
            title_suffix: title_suffix.into(),
        }
    }

    /// `[title] nick`, or just `nick` without a title. Still a template.
    pub fn base_display(&self, record: &PlayerRecord) -> String {
        match record.title() {
            Some(title) => format!("[{}{}] {}", title, self.title_suffix, record.nick),
            None => record.nick.clone(),
        }
    }

    /// Two-line name tag: bubble message, then the resolved name
    pub fn bubble_display(&self, message: &str, rendered: &str) -> String {
        format!("{}\n{}", message, rendered)
    }
}
