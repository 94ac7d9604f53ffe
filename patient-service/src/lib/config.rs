use std::env;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub importer: ImporterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .finish()
    }
}

impl JwtConfig {
    /// Signing algorithm; only the HMAC family is accepted.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Unknown or non-HMAC algorithm name
    pub fn algorithm(&self) -> Result<Algorithm, ConfigError> {
        match Algorithm::from_str(&self.algorithm) {
            Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => {
                Ok(algorithm)
            }
            _ => Err(ConfigError::Message(format!(
                "jwt.algorithm must be one of HS256, HS384, HS512, got {}",
                self.algorithm
            ))),
        }
    }

    /// Default access token lifetime.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Minutes are not positive or overflow a duration
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        match Duration::try_minutes(self.access_token_expire_minutes) {
            Some(ttl) if ttl > Duration::zero() => Ok(ttl),
            _ => Err(ConfigError::Message(format!(
                "jwt.access_token_expire_minutes must be a positive number of minutes, got {}",
                self.access_token_expire_minutes
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImporterConfig {
    #[serde(default = "default_importer_base_url")]
    pub base_url: String,
    #[serde(default = "default_importer_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ImporterConfig {
    pub fn timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.timeout_seconds)
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            base_url: default_importer_base_url(),
            timeout_seconds: default_importer_timeout_seconds(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_importer_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_importer_timeout_seconds() -> u64 {
    30
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.algorithm()?;

        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }
        self.jwt.token_ttl()?;

        Ok(())
    }
}
