use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read lesson file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: unknown stage '{id}'")]
    UnknownStage { line: usize, id: String },
    #[error("line {line}: stage '{id}' is defined twice")]
    DuplicateStage { line: usize, id: String },
    #[error("line {line}: content outside of a STAGE:: block")]
    OutsideStage { line: usize },
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("line matcher failed to build: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("heat intensity {0} is outside 0..=100")]
    HeatIntensityOutOfRange(i64),
}
