use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub credits: CreditSettings,
    #[serde(default)]
    pub media: MediaSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Postgres
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,
}

fn default_access_ttl() -> i64 { 60 * 60 }
fn default_refresh_ttl() -> i64 { 7 * 24 * 60 * 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct CreditSettings {
    #[serde(default = "default_signup_grant")]
    pub signup_grant: i32,
    #[serde(default = "default_max_purchase")]
    pub max_purchase: i32,
}

impl Default for CreditSettings {
    fn default() -> Self {
        Self {
            signup_grant: default_signup_grant(),
            max_purchase: default_max_purchase(),
        }
    }
}

fn default_signup_grant() -> i32 { 20 }
fn default_max_purchase() -> i32 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    #[serde(default = "default_media_root")]
    pub root: String,
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_photos")]
    pub max_photos_per_profile: usize,
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: usize,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            base_url: default_media_base_url(),
            max_photos_per_profile: default_max_photos(),
            max_photo_bytes: default_max_photo_bytes(),
        }
    }
}

fn default_media_root() -> String { "media".to_string() }
fn default_media_base_url() -> String { "/media".to_string() }
fn default_max_photos() -> usize { 3 }
fn default_max_photo_bytes() -> usize { 5 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "text".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with MANGALYA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., MANGALYA__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MANGALYA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MANGALYA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables on top of the layered config.
///
/// `DATABASE_URL` and `JWT_SECRET` win over anything in the config files.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credit_settings() {
        let credits = CreditSettings::default();
        assert_eq!(credits.signup_grant, 20);
        assert_eq!(credits.max_purchase, 100);
    }

    #[test]
    fn test_default_media_settings() {
        let media = MediaSettings::default();
        assert_eq!(media.max_photos_per_profile, 3);
        assert_eq!(media.base_url, "/media");
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "text");
    }

    #[test]
    fn test_token_lifetimes() {
        assert_eq!(default_access_ttl(), 3600);
        assert_eq!(default_refresh_ttl(), 604800);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("mangalya-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
backend = "memory"
url = "unused"

[auth]
jwt_secret = "test-secret"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.backend, StoreBackend::Memory);
        assert_eq!(settings.auth.access_token_ttl_secs, 3600);
        assert_eq!(settings.credits.signup_grant, 20);

        std::fs::remove_dir_all(dir).ok();
    }
}
