use neura_core::config::{get_default_config_file, load_toml_or_default, GeminiConfig, PersonaConfig};
use neura_core::errors::GeminiResult;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "neura";
pub const CONFIG_FILE_NAME: &str = "relay.toml";

pub fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Relay daemon configuration as stored in `relay.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    pub http_addr: SocketAddr,
    pub gemini: GeminiConfig,
    pub persona: PersonaConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            http_addr: default_http_addr(),
            gemini: GeminiConfig::default(),
            persona: PersonaConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        load_toml_or_default(path)
    }

    /// The explicit path if given, otherwise `~/.config/neura/relay.toml`
    pub fn resolve_path(explicit: Option<&Path>) -> GeminiResult<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => get_default_config_file(APP_NAME, CONFIG_FILE_NAME),
        }
    }
}
