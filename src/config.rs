use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::PlannerSettings;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub translation: TranslationSettings,
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Leave unset to run on the in-memory tier only
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationSettings {
    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_translation_endpoint(),
            timeout_secs: default_client_timeout(),
        }
    }
}

fn default_translation_endpoint() -> String { "https://translate.googleapis.com".to_string() }
fn default_client_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_public_path")]
    pub public_path: String,
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            endpoint: default_speech_endpoint(),
            output_dir: default_output_dir(),
            public_path: default_public_path(),
            timeout_secs: default_client_timeout(),
        }
    }
}

fn default_speech_endpoint() -> String { "https://translate.google.com".to_string() }
fn default_output_dir() -> String { "static/tts".to_string() }
fn default_public_path() -> String { "/static/tts".to_string() }

/// Tour planner tuning
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_per_stop_minutes")]
    pub per_stop_minutes: u32,
    #[serde(default = "default_max_stops")]
    pub max_stops: usize,
    #[serde(default = "default_fallback_avg_price")]
    pub fallback_avg_price: f64,
    #[serde(default = "default_tag_match_points")]
    pub tag_match_points: i32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            per_stop_minutes: default_per_stop_minutes(),
            max_stops: default_max_stops(),
            fallback_avg_price: default_fallback_avg_price(),
            tag_match_points: default_tag_match_points(),
        }
    }
}

impl From<&PlannerConfig> for PlannerSettings {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            per_stop_minutes: config.per_stop_minutes,
            max_stops: config.max_stops,
            fallback_avg_price: config.fallback_avg_price,
            tag_match_points: config.tag_match_points,
        }
    }
}

fn default_per_stop_minutes() -> u32 { 30 }
fn default_max_stops() -> usize { 5 }
fn default_fallback_avg_price() -> f64 { 50_000.0 }
fn default_tag_match_points() -> i32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    /// Empty disables admin login
    #[serde(default)]
    pub password: String,
    /// Token signing key; empty disables admin login
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            password: String::new(),
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

fn default_token_ttl() -> u64 { 8 * 3600 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    /// Empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

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
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with NEARBITE__)
    /// 4. DATABASE_URL and ADMIN_PASSWORD
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NEARBITE__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings::from(&self.planner)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("NEARBITE")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}

/// Apply the conventional unprefixed variables on top of everything else
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(password) = env::var("ADMIN_PASSWORD") {
        builder = builder.set_override("admin.password", password)?;
    }

    builder.build()
}
