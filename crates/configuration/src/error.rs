//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("empty connection URI in {file_path}")]
    EmptyConnectionUri { file_path: PathBuf },
    #[error("configuration in {0} has no version tag")]
    DidNotFindExpectedVersionTag(PathBuf),
    #[error("unsupported configuration version {version} in {file_path}")]
    UnsupportedVersion { file_path: PathBuf, version: String },

    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("unable to serialize configuration: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("invalid connection URI in {file_path}: {message}")]
    MissingEnvironmentVariable { file_path: PathBuf, message: String },
    #[error("the default sort of resource {resource} names unknown field {field}")]
    UnknownDefaultSortField { resource: String, field: String },
}
