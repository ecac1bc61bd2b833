use thiserror::Error;

use crate::domain::UserId;

/// Rejected input handed to a value type at construction.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
    #[error("Amount for '{field}' must be finite and non-negative, got {value}")]
    NegativeAmount { field: String, value: f64 },
}

/// Failures raised while mutating a user's coin/XP progression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Not enough coins: {required} required, {available} available")]
    InsufficientCoins { required: u64, available: u64 },
    #[error("Unknown reward: {0}")]
    UnknownReward(String),
}

/// Errors surfaced by the data-access collaborators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),
    #[error("Concurrent progression update for user {0}")]
    Contention(UserId),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Delivery failures reported by a live connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection closed")]
    Closed,
    #[error("Send timed out")]
    Timeout,
    #[error("Transport failure: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Top-level error for the insight engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
