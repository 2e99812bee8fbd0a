//! Configuration loader with layered sources.

use crate::{AppConfig, DEFAULT_JWT_SECRET};
use config::{Config, ConfigError, Environment, File};
use ledger_core::LedgerError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable selecting the environment-specific file.
pub const ENVIRONMENT_VAR: &str = "LEDGER_ENVIRONMENT";

/// Loads [`AppConfig`] from a config directory.
///
/// Sources are applied in order, later ones winning:
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{environment}.toml`
/// 3. `{dir}/local.toml` (not committed)
/// 4. environment variables such as `LEDGER_DATABASE__URL`
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
    read_env: bool,
}

impl ConfigLoader {
    /// Creates a loader for `config_dir`, taking the environment name from
    /// `LEDGER_ENVIRONMENT` (after loading `.env`).
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }
        let environment =
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        Self {
            config_dir: config_dir.into(),
            environment,
            read_env: true,
        }
    }

    /// Loader for `./config`.
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Overrides the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Skips the environment-variable layer.
    #[must_use]
    pub fn without_env_vars(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Builds, deserializes and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, LedgerError> {
        info!(environment = %self.environment, dir = %self.config_dir.display(), "Loading configuration");

        let mut builder = Config::builder();
        for name in ["default", self.environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        if self.read_env {
            builder = builder.add_source(
                Environment::with_prefix("LEDGER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            );
        }

        let mut config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize::<AppConfig>)
            .map_err(config_error)?;
        config.app.environment.clone_from(&self.environment);

        validate(&config)?;
        Ok(config)
    }

    /// Returns the config directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Rejects configurations the server cannot start with.
pub fn validate(config: &AppConfig) -> Result<(), LedgerError> {
    if config.app.is_production() && config.security.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using default JWT secret in production! This is a security risk.");
    }

    if config.database.url.trim().is_empty() {
        return Err(LedgerError::Configuration("Database URL is required".to_string()));
    }

    if config.security.jwt_secret.is_empty() {
        return Err(LedgerError::Configuration("JWT secret is required".to_string()));
    }

    let ttl = &config.analytics;
    for (name, secs) in [
        ("analytics.monthly_ttl_secs", ttl.monthly_ttl_secs),
        ("analytics.category_ttl_secs", ttl.category_ttl_secs),
        ("analytics.income_expense_ttl_secs", ttl.income_expense_ttl_secs),
    ] {
        if secs == 0 {
            return Err(LedgerError::Configuration(format!("{} must be greater than zero", name)));
        }
    }

    Ok(())
}

fn config_error(err: ConfigError) -> LedgerError {
    LedgerError::Configuration(err.to_string())
}
