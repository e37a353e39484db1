use std::env;
use std::path::PathBuf;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

type Builder = config::ConfigBuilder<DefaultState>;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Without a `url` the service keeps users in memory.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub private_key_file: PathBuf,
    pub public_key_file: PathBuf,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Longest accepted token lifetime: one year.
    pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

    /// Lifetime of issued tokens. Bounded by validation at load time.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiration_hours)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    #[serde(default = "default_cookie_max_age_ms")]
    pub max_age_ms: i64,
    #[serde(default = "default_cookie_secure")]
    pub secure: bool,
}

impl CookieConfig {
    /// Longest accepted cookie lifetime: 400 days, the cap browsers apply.
    pub const MAX_AGE_MS: i64 = 400 * 24 * 60 * 60 * 1000;
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            max_age_ms: default_cookie_max_age_ms(),
            secure: default_cookie_secure(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_hours() -> i64 {
    24
}

fn default_cookie_name() -> String {
    auth::extract::DEFAULT_TOKEN_COOKIE.to_string()
}

fn default_cookie_max_age_ms() -> i64 {
    86_400_000
}

fn default_cookie_secure() -> bool {
    true
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__DATABASE__URL, AUTH__SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("AUTH").separator("__"));

        Self::from_builder(builder)
    }

    fn from_builder(builder: Builder) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=JwtConfig::MAX_EXPIRATION_HOURS).contains(&self.jwt.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}, got {}",
                JwtConfig::MAX_EXPIRATION_HOURS,
                self.jwt.expiration_hours
            )));
        }

        if !(1..=CookieConfig::MAX_AGE_MS).contains(&self.cookie.max_age_ms) {
            return Err(ConfigError::Message(format!(
                "cookie.max_age_ms must be between 1 and {}, got {}",
                CookieConfig::MAX_AGE_MS,
                self.cookie.max_age_ms
            )));
        }

        Ok(())
    }
}
