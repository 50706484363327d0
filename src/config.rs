use std::{env, net::IpAddr, path::PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;

/// Process-level settings, read from `OVERLAYCAST_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub overlays_dir: PathBuf,
    pub config_path: PathBuf,
    pub control_token: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = match get("OVERLAYCAST_BIND") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "OVERLAYCAST_BIND",
                value: raw,
            })?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match get("OVERLAYCAST_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidEnv {
                key: "OVERLAYCAST_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let overlays_dir = get("OVERLAYCAST_OVERLAYS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("overlays"));

        let config_path = match get("OVERLAYCAST_CONFIG_PATH") {
            Some(path) => PathBuf::from(path),
            None => dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("overlaycast")
                .join("config.json"),
        };

        let control_token = get("OVERLAYCAST_CONTROL_TOKEN").filter(|t| !t.is_empty());

        Ok(Self {
            bind,
            port,
            overlays_dir,
            config_path,
            control_token,
        })
    }
}
