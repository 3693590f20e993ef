//! Application configuration.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Email (Mailgun) configuration. When absent, the email transport is
    /// skipped rather than treated as an error.
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Mailgun email gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Mailgun API key.
    pub api_key: String,
    /// Mailgun sending domain.
    pub domain: String,
    /// From address. Defaults to `notify@{domain}` when unset.
    #[serde(default)]
    pub from_address: Option<String>,
}

impl EmailConfig {
    /// The sender address for outbound notification mail.
    #[must_use]
    pub fn from_email(&self) -> String {
        self.from_address
            .clone()
            .unwrap_or_else(|| format!("notify@{}", self.domain))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `PANTRY_ENV`)
    /// 3. Environment variables with `PANTRY_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("PANTRY_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PANTRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_email_defaults_to_domain() {
        let cfg = EmailConfig {
            api_key: "key".to_string(),
            domain: "mg.example.org".to_string(),
            from_address: None,
        };
        assert_eq!(cfg.from_email(), "notify@mg.example.org");
    }

    #[test]
    fn test_from_email_explicit_wins() {
        let cfg = EmailConfig {
            api_key: "key".to_string(),
            domain: "mg.example.org".to_string(),
            from_address: Some("pantry@example.org".to_string()),
        };
        assert_eq!(cfg.from_email(), "pantry@example.org");
    }
}
