//! Bubble plugin - wires config, store, scheduler and chat handlers
//!
//! The host calls [`BubblePlugin::update`] from its main loop and forwards
//! join and chat events to the handlers.

use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::{
    BubbleScheduler, ChatError, ChatPolicy, PlaceholderTranslator, PlayerDirectory, PlayerRecord,
    RecordStore, StoreError, TemplateResolver, TickReport,
};

use super::config::{Config, ConfigError};
use super::json_store::JsonRecordStore;
use super::logging;

#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct BubblePlugin<D, S, T> {
    directory: D,
    store: S,
    scheduler: BubbleScheduler<T>,
    chat: ChatPolicy,
    config: Config,
}

impl<D, T> BubblePlugin<D, JsonRecordStore, T>
where
    D: PlayerDirectory,
    T: PlaceholderTranslator,
{
    /// Load config from `dir`, start logging and open the record file
    pub fn start(dir: &Path, directory: D, translator: T) -> Result<Self, StartError> {
        let config = Config::load(dir)?;
        logging::init(&config.logging, config.log_path(dir));
        info!("Chat bubble mod starting...");

        let store = JsonRecordStore::open(config.data_path(dir))?;
        Ok(Self::new(config, directory, store, translator))
    }
}

impl<D, S, T> BubblePlugin<D, S, T>
where
    D: PlayerDirectory,
    S: RecordStore,
    T: PlaceholderTranslator,
{
    pub fn new(config: Config, directory: D, store: S, translator: T) -> Self {
        let resolver = TemplateResolver::new(translator, config.api.clone());
        let scheduler = BubbleScheduler::new(
            resolver,
            config.bubble.display_format(),
            config.bubble.tick_interval(),
        );
        let chat = config.chat_policy();

        let interval_ms = config.bubble.tick_interval_ms;
        debug!(
            interval_ms,
            bubble_seconds = chat.bubble_seconds,
            "[PLUGIN] Initialized"
        );

        Self {
            directory,
            store,
            scheduler,
            chat,
            config,
        }
    }

    /// Call every frame; runs a tick when the interval has elapsed
    pub fn update(&mut self, now: Instant) -> Option<TickReport> {
        self.scheduler.poll(now, &self.directory, &self.store)
    }

    /// Run a tick immediately, ignoring the interval
    pub fn tick_now(&self) -> TickReport {
        self.scheduler.tick(&self.directory, &self.store)
    }

    pub fn on_player_join(&self, name: &str) -> Result<PlayerRecord, ChatError> {
        self.chat.ensure_record(&self.store, name)
    }

    pub fn on_chat(&self, name: &str, text: &str) -> Result<PlayerRecord, ChatError> {
        self.chat.post_message(&self.store, name, text)
    }

    pub fn chat(&self) -> &ChatPolicy {
        &self.chat
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
