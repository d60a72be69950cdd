//! Core traits - abstractions over the host game
//!
//! These traits define what the bubble logic needs from the game server:
//! the list of connected players, their live attributes, renaming, and the
//! external placeholder service. For testing, mock implementations are
//! provided in [`mocks`].

use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use super::error::TranslateError;

// =============================================================================
// HOST PLAYER
// =============================================================================

/// A connected player as exposed by the host
pub trait HostPlayer {
    /// Stable identity key (the record store key)
    fn real_name(&self) -> &str;

    /// Live attribute tree used by `{path}` tokens
    ///
    /// `{stats_level}` walks `attributes()["stats"]["level"]`.
    fn attributes(&self) -> &Value;

    /// Set the name tag. May contain `\n` for a multi-line tag.
    fn rename(&self, display_name: &str);
}

impl<P: HostPlayer + ?Sized> HostPlayer for &P {
    fn real_name(&self) -> &str {
        (**self).real_name()
    }

    fn attributes(&self) -> &Value {
        (**self).attributes()
    }

    fn rename(&self, display_name: &str) {
        (**self).rename(display_name)
    }
}

impl<P: HostPlayer + ?Sized> HostPlayer for Rc<P> {
    fn real_name(&self) -> &str {
        (**self).real_name()
    }

    fn attributes(&self) -> &Value {
        (**self).attributes()
    }

    fn rename(&self, display_name: &str) {
        (**self).rename(display_name)
    }
}

impl<P: HostPlayer + ?Sized> HostPlayer for Arc<P> {
    fn real_name(&self) -> &str {
        (**self).real_name()
    }

    fn attributes(&self) -> &Value {
        (**self).attributes()
    }

    fn rename(&self, display_name: &str) {
        (**self).rename(display_name)
    }
}

// =============================================================================
// PLAYER DIRECTORY
// =============================================================================

/// Lists the players currently connected to the host
pub trait PlayerDirectory {
    type Player: HostPlayer;

    /// Connected players, in the host's listing order
    fn online_players(&self) -> Vec<Self::Player>;
}

// =============================================================================
// PLACEHOLDER TRANSLATOR
// =============================================================================

/// External placeholder service (e.g. `%player_health%` style placeholders
/// registered by other plugins)
pub trait PlaceholderTranslator {
    fn translate(&self, text: &str, player: &dyn HostPlayer) -> Result<String, TranslateError>;
}

/// Translator used when no placeholder service is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl PlaceholderTranslator for IdentityTranslator {
    fn translate(&self, text: &str, _player: &dyn HostPlayer) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

impl<T: PlaceholderTranslator + ?Sized> PlaceholderTranslator for Box<T> {
    fn translate(&self, text: &str, player: &dyn HostPlayer) -> Result<String, TranslateError> {
        (**self).translate(text, player)
    }
}

// =============================================================================
// TEST MOCKS
// =============================================================================
