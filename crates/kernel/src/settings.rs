use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SHELF_ENV";
const CONFIG_DIR_ENV: &str = "SHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "SHELF";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Plain environment variables honoured on top of the `SHELF_*` layer.
///
/// Deployments of the books service already export `PORT` and
/// `MONGODB_URI`; these win over every other source.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub database_uri: Option<String>,
}

impl EnvOverrides {
    fn from_process_env() -> Self {
        Self {
            port: std::env::var("PORT").ok(),
            database_uri: std::env::var("MONGODB_URI").ok(),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// `SHELF_*` variables and finally `PORT` / `MONGODB_URI`.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to repo root `config` directory.
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::from_sources(
            &config_dir,
            &environment,
            config::Environment::with_prefix(ENV_PREFIX),
            &EnvOverrides::from_process_env(),
        )
    }

    /// Build settings from explicit sources. `env_source` is the prefixed
    /// environment layer; the separators are applied here.
    pub fn from_sources(
        config_dir: &Path,
        environment: &str,
        env_source: config::Environment,
        overrides: &EnvOverrides,
    ) -> anyhow::Result<Self> {
        let parsed_environment: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                env_source
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", overrides.port.clone())
            .with_context(|| "invalid PORT override")?
            .set_override_option("database.uri", overrides.database_uri.clone())
            .with_context(|| "invalid MONGODB_URI override")?;

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = parsed_environment;
        settings.validate()?;

        Ok(settings)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.connection_uri().is_none() {
            bail!("database.uri is required; set MONGODB_URI or SHELF_DATABASE__URI");
        }
        if self.database.name.trim().is_empty() || self.database.collection.trim().is_empty() {
            bail!("database.name and database.collection must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_body_limit_bytes() -> usize {
        2 * 1024 * 1024
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            body_limit_bytes: Self::default_body_limit_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_collection")]
    pub collection: String,
    #[serde(default = "DatabaseSettings::default_app_name")]
    pub app_name: String,
}

impl DatabaseSettings {
    fn default_name() -> String {
        "BookInventory".to_string()
    }

    fn default_collection() -> String {
        "books".to_string()
    }

    fn default_app_name() -> String {
        "shelf".to_string()
    }

    /// The configured connection string, if it is present and not blank.
    pub fn connection_uri(&self) -> Option<&str> {
        self.uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: None,
            name: Self::default_name(),
            collection: Self::default_collection(),
            app_name: Self::default_app_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_source(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn with_uri() -> EnvOverrides {
        EnvOverrides {
            port: None,
            database_uri: Some("mongodb://127.0.0.1:27017".to_string()),
        }
    }

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn defaults_point_at_book_inventory() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.database.name, "BookInventory");
        assert_eq!(settings.database.collection, "books");
        assert!(settings.database.uri.is_none());
    }

    #[test]
    fn missing_database_uri_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_sources(
            dir.path(),
            "local",
            env_source(&[]),
            &EnvOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("database.uri is required"));
    }

    #[test]
    fn blank_database_uri_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = EnvOverrides {
            port: None,
            database_uri: Some("   ".to_string()),
        };
        assert!(Settings::from_sources(dir.path(), "local", env_source(&[]), &overrides).is_err());
    }

    #[test]
    fn plain_port_and_uri_override_everything() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[server]\nport = 7000\n[database]\nuri = \"mongodb://from-file\"\n",
        )
        .unwrap();

        let overrides = EnvOverrides {
            port: Some("8081".to_string()),
            database_uri: Some("mongodb://from-env".to_string()),
        };
        let settings = Settings::from_sources(
            dir.path(),
            "local",
            env_source(&[("SHELF_SERVER__PORT", "9000")]),
            &overrides,
        )
        .unwrap();

        assert_eq!(settings.server.port, 8081);
        assert_eq!(
            settings.database.connection_uri(),
            Some("mongodb://from-env")
        );
    }

    #[test]
    fn layers_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[database]\nname = \"Base\"\ncollection = \"base_books\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.toml"),
            "[database]\nname = \"Staging\"\n",
        )
        .unwrap();

        let settings = Settings::from_sources(
            dir.path(),
            "staging",
            env_source(&[("SHELF_SERVER__BODY_LIMIT_BYTES", "1024")]),
            &with_uri(),
        )
        .unwrap();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.database.name, "Staging");
        assert_eq!(settings.database.collection, "base_books");
        assert_eq!(settings.server.body_limit_bytes, 1024);
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn unknown_environment_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            Settings::from_sources(dir.path(), "qa", env_source(&[]), &with_uri()).unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn json_log_format_parses() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[telemetry]\nlog_format = \"json\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let settings =
            Settings::from_sources(dir.path(), "local", env_source(&[]), &with_uri()).unwrap();
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
        assert_eq!(settings.telemetry.log_level, "debug");
    }
}
