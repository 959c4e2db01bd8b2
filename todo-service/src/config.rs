//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. `PORT` and `APP_ENV` (or `NODE_ENV` when `APP_ENV` is unset)
//! 2. Environment variables (prefix: TODO_, nesting: `__`), e.g. `TODO_SERVICE__LOG_LEVEL=debug`
//! 3. Current working directory: ./config.toml
//! 4. XDG config directory: ~/.config/todo-service/config.toml
//! 5. System directory: /etc/todo-service/config.toml
//! 6. Default values

use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Directory name used under `/etc` and the XDG config home
pub const CONFIG_DIR_NAME: &str = "todo-service";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,
}

/// Deployment environment
///
/// Gates how much error detail reaches the logs. Any name other than a
/// production or staging one selects development, so an unexpected
/// deployment label never stops the service from starting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development, and any unrecognised name
    #[default]
    Development,
    /// Pre-production (`staging` or `stage`)
    Staging,
    /// Production (`production` or `prod`)
    Production,
}

impl Environment {
    /// Whether this is the production environment
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Resolve an environment name, case-insensitively
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Development,
        }
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EnvironmentVisitor;

        impl de::Visitor<'_> for EnvironmentVisitor {
            type Value = Environment;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an environment name")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Environment, E> {
                Ok(Environment::from_name(value))
            }

            // Env providers parse values such as `1` or `true` eagerly
            fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Environment, E> {
                Ok(Environment::Development)
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<Environment, E> {
                Ok(Environment::Development)
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<Environment, E> {
                Ok(Environment::Development)
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<Environment, E> {
                Ok(Environment::Development)
            }
        }

        deserializer.deserialize_any(EnvironmentVisitor)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            port: default_port(),
            log_level: default_log_level(),
            timeout_secs: default_timeout(),
            environment: Environment::default(),
        }
    }
}

impl ServiceConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Path the todo routes are mounted under
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

/// CORS policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorsMode {
    /// Any origin, method and header
    #[default]
    Permissive,
    /// Same-origin only
    Restrictive,
    /// No CORS layer
    Disabled,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request tracking configuration (request IDs, header propagation)
    #[serde(default)]
    pub request_tracking: RequestTrackingConfig,

    /// Request body size limit in KiB
    #[serde(default = "default_body_limit_kb")]
    pub body_limit_kb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS configuration
    #[serde(default)]
    pub cors_mode: CorsMode,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_tracking: RequestTrackingConfig::default(),
            body_limit_kb: default_body_limit_kb(),
            catch_panic: true,
            compression: true,
            cors_mode: CorsMode::default(),
        }
    }
}

impl MiddlewareConfig {
    /// Body limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_kb.saturating_mul(1024)
    }
}

/// Request tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTrackingConfig {
    /// Enable request ID generation
    #[serde(default = "default_true")]
    pub request_id_enabled: bool,

    /// Copy the request ID onto the response
    #[serde(default = "default_true")]
    pub propagate_request_id: bool,

    /// Enable sensitive header masking in logs
    #[serde(default = "default_true")]
    pub mask_sensitive_headers: bool,
}

impl Default for RequestTrackingConfig {
    fn default() -> Self {
        Self {
            request_id_enabled: true,
            propagate_request_id: true,
            mask_sensitive_headers: true,
        }
    }
}

// Default value functions
fn default_service_name() -> String {
    CONFIG_DIR_NAME.to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_base_path() -> String {
    "/todos".to_string()
}

fn default_body_limit_kb() -> usize {
    64
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        Self::load_for_service(CONFIG_DIR_NAME)
    }

    /// Load configuration using `service_name` as the config directory name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later files override earlier ones
        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::from_figment(Self::with_environment(figment))
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the system and XDG directories. Environment variables
    /// still apply. Useful for testing or non-standard deployments.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()));

        Self::from_figment(Self::with_environment(figment))
    }

    /// Extract and validate a configuration from a prepared figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn with_environment(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed("TODO_").split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "service.port".into()))
            .merge(Env::raw().only(&["NODE_ENV"]).map(|_| "service.environment".into()))
            .merge(Env::raw().only(&["APP_ENV"]).map(|_| "service.environment".into()))
    }

    /// Config file locations, lowest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc")
            .join(service_name)
            .join("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(service_name);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("config.toml"));
        paths
    }

    /// Reject values that extraction alone cannot catch
    pub fn validate(&self) -> Result<()> {
        if self.service.name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "service.name must not be empty".to_string(),
            ));
        }

        let level = self.service.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "service.log_level '{}' is not one of {}",
                self.service.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        let base = &self.api.base_path;
        if !base.starts_with('/') || base.ends_with('/') {
            return Err(Error::InvalidConfig(format!(
                "api.base_path '{}' must start with '/' and must not end with '/'",
                base
            )));
        }

        // Mounted as a route and echoed in `Location` headers
        if HeaderValue::from_str(base).is_err() || base.contains(['{', '}', '*', '?', '#']) {
            return Err(Error::InvalidConfig(format!(
                "api.base_path '{}' must be a plain URL path",
                base.escape_debug()
            )));
        }

        Ok(())
    }

    /// Whether the service runs in production
    pub fn is_production(&self) -> bool {
        self.service.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::string(toml)),
        )
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 3000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.service.environment, Environment::Development);
        assert_eq!(config.api.base_path, "/todos");
        assert_eq!(config.middleware.body_limit_bytes(), 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = from_toml(
            r#"
            [service]
            port = 9090
            log_level = "debug"
            environment = "prod"

            [api]
            base_path = "/api/v1/todos"

            [middleware]
            cors_mode = "restrictive"
            compression = false
            "#,
        )
        .unwrap();

        assert_eq!(config.service.port, 9090);
        assert_eq!(config.service.timeout(), Duration::from_secs(30));
        assert!(config.is_production());
        assert_eq!(config.api.base_path, "/api/v1/todos");
        assert_eq!(config.middleware.cors_mode, CorsMode::Restrictive);
        assert!(!config.middleware.compression);
        assert!(config.middleware.catch_panic);
    }

    #[rstest]
    #[case("development", Environment::Development)]
    #[case("dev", Environment::Development)]
    #[case("staging", Environment::Staging)]
    #[case("production", Environment::Production)]
    #[case("Production", Environment::Production)]
    #[case("prod", Environment::Production)]
    #[case("test", Environment::Development)]
    #[case("local", Environment::Development)]
    fn test_environment_names(#[case] raw: &str, #[case] expected: Environment) {
        let config = from_toml(&format!("[service]\nenvironment = \"{raw}\"")).unwrap();
        assert_eq!(config.service.environment, expected);
    }

    #[rstest]
    #[case("[service]\nname = \"  \"")]
    #[case("[service]\nlog_level = \"loud\"")]
    #[case("[api]\nbase_path = \"todos\"")]
    #[case("[api]\nbase_path = \"/todos/\"")]
    #[case("[api]\nbase_path = \"/\"")]
    #[case("[api]\nbase_path = \"/to\\ndos\"")]
    #[case("[api]\nbase_path = \"/t\\u0000odos\"")]
    #[case("[api]\nbase_path = \"/{list}\"")]
    #[case("[api]\nbase_path = \"/todos?all\"")]
    fn test_invalid_values_rejected(#[case] toml: &str) {
        assert!(matches!(from_toml(toml), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        assert!(matches!(
            from_toml("[service]\nport = \"eighty\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_non_string_environment_is_development() {
        let config = from_toml("[service]\nenvironment = 1").unwrap();
        assert_eq!(config.service.environment, Environment::Development);
    }

    #[test]
    fn test_environment_variables_select_mode() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NODE_ENV", "production");
            let config = Config::load_from("config.toml").map_err(|e| e.to_string())?;
            assert!(config.is_production());

            jail.set_env("APP_ENV", "test");
            let config = Config::load_from("config.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.service.environment, Environment::Development);

            jail.set_env("APP_ENV", "staging");
            jail.set_env("PORT", "8080");
            let config = Config::load_from("config.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.service.environment, Environment::Staging);
            assert_eq!(config.service.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nname = \"todo-test\"\ntimeout_secs = 5").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "todo-test");
        assert_eq!(config.service.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.base_path, "/todos");
    }
}
