//! Core module - platform-independent bubble logic

pub mod chat;
pub mod constants;
pub mod error;
pub mod record_store;
pub mod scheduler;
pub mod substitutions;
pub mod template;
pub mod traits;
pub mod types;

pub use chat::ChatPolicy;
pub use error::{ChatError, StoreError, TickError, TranslateError};
pub use record_store::{MemoryRecordStore, RecordStore};
pub use scheduler::{BubbleScheduler, PlayerOutcome, TickReport};
pub use substitutions::ApiSubstitutions;
pub use template::TemplateResolver;
pub use traits::{HostPlayer, IdentityTranslator, PlaceholderTranslator, PlayerDirectory};
pub use types::{BubbleState, DisplayFormat, PlayerRecord};
