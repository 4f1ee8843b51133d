use std::net::SocketAddr;

use anyhow::Context;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Server settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Prefix the todo routes are mounted under, e.g. `/api`. Empty mounts at the root.
    pub base_path: String,
    pub production: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.into(), port: DEFAULT_PORT, base_path: DEFAULT_BASE_PATH.into(), production: false }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().with_context(|| format!("invalid PORT {raw:?}"))?,
            None => defaults.port,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            base_path: normalize_base_path(&lookup("API_BASE_PATH").unwrap_or(defaults.base_path)),
            production: lookup("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production")),
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().with_context(|| format!("invalid listen address {raw:?}"))
    }
}

// "/api/" and "api" both become "/api"; "/" becomes "".
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}
