use anyhow::{anyhow, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotorentConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Buffer size of the in-process registration event channel.
    pub event_channel_capacity: usize,
    /// Actor recorded in the audit columns of every write.
    pub audit_actor: String,
}

impl Default for MotorentConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://motorent@localhost:5432/motorent".to_string(),
            db_max_connections: 10,
            event_channel_capacity: 256,
            audit_actor: "admin".to_string(),
        }
    }
}

impl MotorentConfig {
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let default_config = MotorentConfig::default();
        let mut figment = Figment::from(Serialized::defaults(default_config));

        if let Some(path) = path_override {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        } else {
            let default_path = PathBuf::from("motorent.toml");
            if default_path.exists() {
                figment = figment.merge(Toml::file(default_path));
            }
        }

        figment = figment.merge(Env::prefixed("MOTORENT_"));

        figment
            .extract()
            .map_err(|e| anyhow!("Configuration error: {}", e))
    }

    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }
}
