//! Chat operations that write player records
//!
//! These are the update calls made by the chat and command handlers: they
//! arm or clear bubbles and edit nick/title. The scheduler only ever counts
//! bubbles down.

use tracing::{debug, info};

use super::constants::{DEFAULT_BUBBLE_SECONDS, DEFAULT_MAX_MESSAGE_CHARS};
use super::error::ChatError;
use super::record_store::RecordStore;
use super::types::PlayerRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPolicy {
    /// Bubble lifetime for a new chat message, in seconds
    pub bubble_seconds: u32,
    /// Messages longer than this are cut (in characters)
    pub max_message_chars: usize,
    /// Messages containing any of these (case-insensitive) are rejected
    pub forbidden_words: Vec<String>,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            bubble_seconds: DEFAULT_BUBBLE_SECONDS,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            forbidden_words: Vec::new(),
        }
    }
}

impl ChatPolicy {
    /// First configured forbidden word contained in `text`
    pub fn find_forbidden(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.forbidden_words
            .iter()
            .map(String::as_str)
            .filter(|w| !w.is_empty())
            .find(|w| lowered.contains(&w.to_lowercase()))
    }

    /// Create a default record for a player that has none
    ///
    /// Returns the stored record, existing or new.
    pub fn ensure_record<S>(&self, store: &S, name: &str) -> Result<PlayerRecord, ChatError>
    where
        S: RecordStore + ?Sized,
    {
        if let Some(existing) = store.get(name)? {
            return Ok(existing);
        }
        let record = PlayerRecord::fresh(name);
        store.upsert(record.clone())?;
        debug!(player = %name, "[CHAT] Created record");
        Ok(record)
    }

    /// Show `text` above the player's name for `bubble_seconds`
    pub fn post_message<S>(&self, store: &S, name: &str, text: &str) -> Result<PlayerRecord, ChatError>
    where
        S: RecordStore + ?Sized,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if let Some(word) = self.find_forbidden(text) {
            info!(player = %name, word = %word, "[CHAT] Rejected message");
            return Err(ChatError::ForbiddenWord(word.to_string()));
        }

        let message: String = text.chars().take(self.max_message_chars).collect();
        let base = store.get(name)?.unwrap_or_else(|| PlayerRecord::fresh(name));
        let record = PlayerRecord {
            message,
            time: self.bubble_seconds,
            ..base
        };
        store.upsert(record.clone())?;
        debug!(player = %name, seconds = record.time, "[CHAT] Bubble armed");
        Ok(record)
    }

    pub fn set_nick<S>(&self, store: &S, name: &str, nick: &str) -> Result<PlayerRecord, ChatError>
    where
        S: RecordStore + ?Sized,
    {
        self.modify(store, name, |record| record.nick = nick.to_string())
    }

    /// Set or remove (`None`) the title
    pub fn set_title<S>(
        &self,
        store: &S,
        name: &str,
        title: Option<&str>,
    ) -> Result<PlayerRecord, ChatError>
    where
        S: RecordStore + ?Sized,
    {
        self.modify(store, name, |record| record.title = title.map(str::to_string))
    }

    /// Drop the bubble now; the next tick shows the plain name
    pub fn clear_bubble<S>(&self, store: &S, name: &str) -> Result<PlayerRecord, ChatError>
    where
        S: RecordStore + ?Sized,
    {
        self.modify(store, name, |record| record.time = 0)
    }

    fn modify<S, F>(&self, store: &S, name: &str, f: F) -> Result<PlayerRecord, ChatError>
    where
        S: RecordStore + ?Sized,
        F: FnOnce(&mut PlayerRecord),
    {
        let mut record = store.get(name)?.unwrap_or_else(|| PlayerRecord::fresh(name));
        f(&mut record);
        store.upsert(record.clone())?;
        Ok(record)
    }
}
