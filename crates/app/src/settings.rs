//! Settings for the backend, read from `config/settings.toml` and from
//! `EXPENSES__*` environment variables (e.g. `EXPENSES__SERVER__PORT=8080`).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const SETTINGS_PATH: &str = "config/settings";
const MEMORY: &str = "memory";

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Memory,
    Url(String),
}

impl<'de> Deserialize<'de> for Database {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw.eq_ignore_ascii_case(MEMORY) {
            Database::Memory
        } else {
            Database::Url(raw)
        })
    }
}

impl Default for Database {
    fn default() -> Self {
        Database::Url("sqlite:./expenses.db?mode=rwc".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            database: Database::default(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

/// Access-token verification. Exactly one of `secret` (HS256) or
/// `public_key_pem` (path to an RS256 public key) is expected; the secret wins
/// when both are set.
#[derive(Debug, Deserialize)]
pub struct Auth {
    pub audience: String,
    pub issuer: Option<String>,
    pub secret: Option<String>,
    pub public_key_pem: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    pub auth: Auth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name(SETTINGS_PATH).required(false))
                .add_source(Environment::with_prefix("EXPENSES").separator("__"))
                .build()?,
        )
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }
}
