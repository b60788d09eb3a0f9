//! Error types for the loaders around the engine.
//!
//! Generation itself is total; only reading registry, configuration and
//! answer data can fail.

use std::path::PathBuf;

use shared_types::UnknownVariant;
use thiserror::Error;

/// Binding registry loading and validation errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read registry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed registry data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate registry entry for question '{0}'")]
    DuplicateQuestion(String),

    #[error("Question '{question_id}' has an empty {status} legal statement")]
    EmptyStatement {
        question_id: String,
        status: &'static str,
    },

    #[error("Question '{0}' does not affect any document field")]
    NoAffectedFields(String),

    #[error("Question '{0}' binds a field with an empty document or field name")]
    EmptyFieldName(String),
}

/// Engine configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid date format string: {0:?}")]
    InvalidDateFormat(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Answer ingestion errors
#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("Answer feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Answer for question '{question_id}' rejected: {source}")]
    InvalidValue {
        question_id: String,
        #[source]
        source: UnknownVariant,
    },
}
