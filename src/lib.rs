// Chat bubble name tags for multiplayer game servers

pub mod core;
pub mod plugin;

pub use crate::core::{
    ApiSubstitutions, BubbleScheduler, HostPlayer, PlaceholderTranslator, PlayerDirectory,
    PlayerRecord, RecordStore, TemplateResolver,
};
pub use crate::plugin::{BubblePlugin, Config};
