//! Error types shared by the resolver, the record store and the scheduler

use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by the external placeholder service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("placeholder translation failed: {0}")]
pub struct TranslateError(pub String);

impl TranslateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read record file {0}: {1}")]
    FileRead(PathBuf, IoError),

    #[error("Failed to write record file {0}: {1}")]
    FileWrite(PathBuf, IoError),

    #[error("Failed to rename file from {0} to {1}: {2}")]
    FileRename(PathBuf, PathBuf, IoError),

    #[error("Failed to create directory {0}: {1}")]
    CreateDir(PathBuf, IoError),

    #[error("Failed to parse record file {0}: {1}")]
    Deserialization(PathBuf, serde_json::Error),

    #[error("Failed to serialize records: {0}")]
    Serialization(serde_json::Error),
}

/// Why a single player was skipped during a tick
#[derive(Debug, Error)]
pub enum TickError {
    #[error("no record stored for player '{0}'")]
    MissingRecord(String),

    #[error(transparent)]
    Translation(#[from] TranslateError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors returned by the chat update operations
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("message contains forbidden word '{0}'")]
    ForbiddenWord(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
