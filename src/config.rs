// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database URL, e.g. "sqlite:fxconvert.db".
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Address the HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Rate provider endpoint; the base currency code is appended to it.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Timeout for a single provider request, in seconds.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Base currency used for catalog seeding and as the refresh default.
    #[serde(default = "default_base")]
    pub default_base: String,

    /// Default base for the global rates view.
    #[serde(default = "default_global_rates_base")]
    pub global_rates_base: String,
}

fn default_database_url() -> String {
    "sqlite:fxconvert.db".to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_provider_url() -> String {
    "https://api.exchangerate-api.com/v4/latest".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    10
}

fn default_base() -> String {
    "USD".to_string()
}

fn default_global_rates_base() -> String {
    "BDT".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            listen_addr: default_listen_addr(),
            provider_url: default_provider_url(),
            provider_timeout_secs: default_provider_timeout_secs(),
            default_base: default_base(),
            global_rates_base: default_global_rates_base(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults when the file is
/// absent. `DATABASE_URL` and `EXCHANGE_RATE_API_URL` environment variables
/// override the file values.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config: Config = if path.exists() {
        let config_str = fs::read_to_string(path)?;
        toml::from_str(&config_str)?
    } else {
        Config::default()
    };

    if let Ok(url) = env::var("DATABASE_URL") {
        config.database_url = url;
    }
    if let Ok(url) = env::var("EXCHANGE_RATE_API_URL") {
        config.provider_url = url;
    }

    Ok(config)
}

pub fn save_config(config: &Config, path: &Path) -> anyhow::Result<()> {
    let config_str = toml::to_string_pretty(config)?;
    fs::write(path, config_str)?;
    Ok(())
}
