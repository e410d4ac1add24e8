//! Error types for the widget client.

use crate::block::BlockId;
use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("No live item block {0}")]
    UnknownBlock(BlockId),
    #[error("Field holds a single item and already has one block")]
    AddHidden,
}

pub type WidgetResult<T> = Result<T, WidgetError>;
