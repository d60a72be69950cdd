//! Defaults shared by the core and the plugin config

use std::time::Duration;

/// Scheduler cadence; one tick removes one second of bubble time
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Seconds a chat message stays above the name tag
pub const DEFAULT_BUBBLE_SECONDS: u32 = 5;

/// Longest bubble message kept, in characters
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 64;
