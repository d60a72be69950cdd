//! Plugin module - host-facing wiring
//!
//! This module contains the pieces around the core:
//! - BubblePlugin: owns the scheduler, store and chat handlers
//! - Configuration loading
//! - JSON record file
//! - Logging setup

pub mod config;
pub mod json_store;
pub mod logging;
pub mod runtime;

pub use config::{Config, ConfigError};
pub use json_store::JsonRecordStore;
pub use runtime::{BubblePlugin, StartError};
