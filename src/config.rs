use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub server: ServerConfig,
    /// PostgreSQL connection URL. Absent: in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Token signing key. Usually supplied through `SECRET`.
    #[serde(default)]
    pub secret: Option<String>,
    /// Token lifetime. Absent: tokens never expire.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,
}

impl AppConfig {
    /// Load `config/<env>.yaml`, then apply environment overrides.
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.token_ttl()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `PORT`, `DATABASE_URL` and `SECRET` as looked up by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(secret) = lookup("SECRET").filter(|s| !s.is_empty()) {
            self.auth.secret = Some(secret);
        }
        Ok(())
    }

    /// The token signing key. Required.
    pub fn token_secret(&self) -> Result<&str> {
        match self.auth.secret.as_deref() {
            Some(s) if !s.is_empty() => Ok(s),
            _ => bail!("No token secret configured (set SECRET or auth.secret)"),
        }
    }

    /// Token lifetime, or `None` for tokens that never expire. Fails when
    /// `token_ttl_secs` does not fit a duration or pushes expiry past the
    /// representable date range.
    pub fn token_ttl(&self) -> Result<Option<chrono::Duration>> {
        let Some(secs) = self.auth.token_ttl_secs else {
            return Ok(None);
        };
        let ttl = i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some());
        match ttl {
            Some(ttl) => Ok(Some(ttl)),
            None => bail!("auth.token_ttl_secs out of range: {}", secs),
        }
    }
}
