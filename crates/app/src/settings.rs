//! Handles settings for the application. Configuration is written in
//! `settings.toml`.
//!
//! See `settings.example.toml` for the available keys.

use config::{Config, ConfigError, File};
use serde::Deserialize;
use telegram_bot::{AccessPolicy, Responses};

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    /// Enables the `/debug` command.
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub telegram: Telegram,
    pub database: Database,
    #[serde(default)]
    pub access: AccessPolicy,
    #[serde(default)]
    pub responses: Responses,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
