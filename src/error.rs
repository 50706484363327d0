use std::{net::SocketAddr, path::PathBuf};
use thiserror::Error;

/// Why a raw control command was rejected.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("command must be a JSON object")]
    NotAnObject,
    #[error("command is missing a module identifier")]
    MissingModule,
    #[error("command is missing an action")]
    MissingAction,
    #[error("unknown action: {0}")]
    InvalidAction(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("no config directory available, set OVERLAYCAST_CONFIG_PATH")]
    NoConfigDir,
    #[error("config file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown config section: {0}")]
    UnknownSection(String),
    #[error("invalid settings for {section}: {source}")]
    InvalidSettings {
        section: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("reaction source not found: {0}")]
    SourceNotFound(String),
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
