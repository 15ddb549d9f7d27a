//! Engine configuration.
//!
//! Values resolve in layers: built-in defaults, then an optional TOML file
//! (`covenant.toml` in the working directory unless a path is given), then
//! `COVENANT_*` environment variables, then explicit overrides. The merged
//! result is validated before it is returned.

use crate::acceptance::adapters::CERTIFICATE_TEMPLATE;
use crate::acceptance::domain::RequestToken;
use crate::acceptance::services::{AcceptanceSettings, AcceptanceSettingsError};
use crate::sweep::SweepSettings;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "covenant.toml";

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Acceptance request defaults.
    pub acceptance: AcceptanceConfig,
    /// Expiry sweep scheduling.
    pub sweep: SweepConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Acceptance request defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceConfig {
    /// Days until a request expires when no deadline is given.
    pub default_expiry_days: u32,
    /// Length of generated portal tokens.
    pub token_length: usize,
    /// Template used for certificates of acceptance.
    pub certificate_template: String,
}

impl AcceptanceConfig {
    /// Returns the service settings derived from this section.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceSettingsError`] when a value is out of range.
    pub const fn settings(&self) -> Result<AcceptanceSettings, AcceptanceSettingsError> {
        AcceptanceSettings::new(self.default_expiry_days, self.token_length)
    }
}

/// Expiry sweep scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Whether the periodic sweep runs.
    pub enabled: bool,
    /// Seconds between sweeps.
    pub interval_secs: u64,
}

impl SweepConfig {
    /// Returns the scheduler settings derived from this section.
    #[must_use]
    pub const fn settings(&self) -> SweepSettings {
        SweepSettings::new(self.enabled, Duration::from_secs(self.interval_secs))
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default level or `EnvFilter` directive.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human-readable output.
    Compact,
    /// Multi-line human-readable output.
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acceptance: AcceptanceConfig {
                default_expiry_days: 30,
                token_length: RequestToken::DEFAULT_LENGTH,
                certificate_template: CERTIFICATE_TEMPLATE.to_owned(),
            },
            sweep: SweepConfig {
                enabled: true,
                interval_secs: 300,
            },
            logging: LoggingConfig {
                level: "info".to_owned(),
                format: LogFormat::Compact,
            },
        }
    }
}

/// Explicit values applied after the file and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Overrides `logging.level`.
    pub log_level: Option<String>,
    /// Overrides `logging.format`.
    pub log_format: Option<LogFormat>,
    /// Overrides `sweep.enabled`.
    pub sweep_enabled: Option<bool>,
    /// Overrides `sweep.interval_secs`.
    pub sweep_interval_secs: Option<u64>,
    /// Overrides `acceptance.default_expiry_days`.
    pub default_expiry_days: Option<u32>,
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Inputs to [`EngineConfig::load`].
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// Explicit configuration file; `covenant.toml` is tried when unset.
    pub config_path: Option<PathBuf>,
    /// Fail when no configuration file exists.
    pub require_file: bool,
    /// Values applied last.
    pub overrides: ConfigOverrides,
    env: Option<EnvLookup>,
}

impl LoadOptions {
    /// Reads environment overrides through `lookup` instead of the process
    /// environment.
    #[must_use]
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env = Some(Arc::new(lookup));
        self
    }

    fn read_env(&self, key: &str) -> Option<String> {
        let value = match &self.env {
            Some(lookup) => lookup(key),
            None => std::env::var(key).ok(),
        };
        value.filter(|candidate| !candidate.trim().is_empty())
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("config_path", &self.config_path)
            .field("require_file", &self.require_file)
            .field("overrides", &self.overrides)
            .field("env", &self.env.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but cannot be read.
    #[error("could not read config file `{path}`: {source}")]
    ReadFile {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for the configuration schema.
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile {
        /// File path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A configuration file was required but none was found.
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),

    /// An environment variable holds an unparseable value.
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride {
        /// Variable name.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// The merged configuration is out of range.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl EngineConfig {
    /// Loads and validates configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, an
    /// environment value cannot be parsed, or validation fails.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match resolve_config_path(options.config_path.as_deref()) {
            Some(path) => config.apply_patch(read_patch(&path)?)?,
            None if options.require_file => {
                return Err(ConfigError::MissingConfigFile(
                    options
                        .config_path
                        .clone()
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
                ));
            }
            None => {}
        }

        config.apply_env_overrides(&options)?;
        config.apply_overrides(options.overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document over the defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFile`] for malformed TOML or
    /// [`ConfigError::Validation`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let patch = toml::from_str::<ConfigPatch>(source).map_err(|err| ConfigError::ParseFile {
            path: PathBuf::from("<inline>"),
            source: err,
        })?;
        let mut config = Self::default();
        config.apply_patch(patch)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(acceptance) = patch.acceptance {
            if let Some(days) = acceptance.default_expiry_days {
                self.acceptance.default_expiry_days = days;
            }
            if let Some(length) = acceptance.token_length {
                self.acceptance.token_length = length;
            }
            if let Some(template) = acceptance.certificate_template {
                self.acceptance.certificate_template = template;
            }
        }

        if let Some(sweep) = patch.sweep {
            if let Some(enabled) = sweep.enabled {
                self.sweep.enabled = enabled;
            }
            if let Some(interval_secs) = sweep.interval_secs {
                self.sweep.interval_secs = interval_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format.parse()?;
            }
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self, options: &LoadOptions) -> Result<(), ConfigError> {
        if let Some(value) = options.read_env("COVENANT_ACCEPTANCE_DEFAULT_EXPIRY_DAYS") {
            self.acceptance.default_expiry_days =
                parse_env("COVENANT_ACCEPTANCE_DEFAULT_EXPIRY_DAYS", &value)?;
        }
        if let Some(value) = options.read_env("COVENANT_ACCEPTANCE_TOKEN_LENGTH") {
            self.acceptance.token_length = parse_env("COVENANT_ACCEPTANCE_TOKEN_LENGTH", &value)?;
        }
        if let Some(value) = options.read_env("COVENANT_ACCEPTANCE_CERTIFICATE_TEMPLATE") {
            self.acceptance.certificate_template = value;
        }
        if let Some(value) = options.read_env("COVENANT_SWEEP_ENABLED") {
            self.sweep.enabled = parse_env("COVENANT_SWEEP_ENABLED", &value)?;
        }
        if let Some(value) = options.read_env("COVENANT_SWEEP_INTERVAL_SECS") {
            self.sweep.interval_secs = parse_env("COVENANT_SWEEP_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = options.read_env("COVENANT_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = options.read_env("COVENANT_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        if let Some(enabled) = overrides.sweep_enabled {
            self.sweep.enabled = enabled;
        }
        if let Some(interval_secs) = overrides.sweep_interval_secs {
            self.sweep.interval_secs = interval_secs;
        }
        if let Some(days) = overrides.default_expiry_days {
            self.acceptance.default_expiry_days = days;
        }
    }

    /// Checks every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_acceptance(&self.acceptance)?;
        validate_sweep(self.sweep)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
    fallback.exists().then_some(fallback)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<ConfigPatch>(&raw).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidEnvOverride {
            key: key.to_owned(),
            value: value.to_owned(),
        })
}

fn validate_acceptance(acceptance: &AcceptanceConfig) -> Result<(), ConfigError> {
    acceptance
        .settings()
        .map_err(|err| ConfigError::Validation(err.to_string()))?;
    if acceptance.certificate_template.trim().is_empty() {
        return Err(ConfigError::Validation(
            "acceptance.certificate_template must not be empty".to_owned(),
        ));
    }
    Ok(())
}

fn validate_sweep(sweep: SweepConfig) -> Result<(), ConfigError> {
    if sweep.interval_secs == 0 {
        return Err(ConfigError::Validation(
            "sweep.interval_secs must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    match logging.level.trim().to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_owned(),
        )),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    acceptance: Option<AcceptancePatch>,
    sweep: Option<SweepPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AcceptancePatch {
    default_expiry_days: Option<u32>,
    token_length: Option<usize>,
    certificate_template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SweepPatch {
    enabled: Option<bool>,
    interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn isolated() -> LoadOptions {
        LoadOptions::default().with_env(|_| None)
    }

    #[rstest]
    fn defaults_are_valid() -> eyre::Result<()> {
        let config = EngineConfig::load(isolated())?;

        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.acceptance.settings()?, AcceptanceSettings::default());
        assert_eq!(config.sweep.settings().interval(), Duration::from_secs(300));
        Ok(())
    }

    #[rstest]
    fn file_then_env_then_overrides() -> eyre::Result<()> {
        let path = std::env::temp_dir().join(format!("covenant-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
[acceptance]
default_expiry_days = 14

[sweep]
interval_secs = 60

[logging]
level = "debug"
format = "json"
"#,
        )?;
        let options = LoadOptions {
            config_path: Some(path.clone()),
            overrides: ConfigOverrides {
                log_level: Some("warn".to_owned()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
        .with_env(env_from(&[
            ("COVENANT_SWEEP_INTERVAL_SECS", "120"),
            ("COVENANT_LOG_LEVEL", "error"),
        ]));

        let loaded = EngineConfig::load(options);
        fs::remove_file(&path)?;
        let config = loaded?;

        assert_eq!(config.acceptance.default_expiry_days, 14);
        assert_eq!(config.sweep.interval_secs, 120);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "warn");
        Ok(())
    }

    #[rstest]
    fn missing_required_file_is_reported() {
        let options = LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/covenant.toml")),
            require_file: true,
            ..isolated()
        };

        let result = EngineConfig::load(options);

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[rstest]
    #[case("[sweep]\ninterval_secs = 0", "sweep.interval_secs")]
    #[case("[acceptance]\ndefault_expiry_days = 0", "acceptance.default_expiry_days")]
    #[case("[acceptance]\ntoken_length = 16", "acceptance.token_length")]
    #[case("[logging]\nformat = \"xml\"", "unsupported log format")]
    #[case("[logging]\nlevel = \"loud\"", "logging.level")]
    fn out_of_range_values_fail_validation(#[case] source: &str, #[case] fragment: &str) {
        let result = EngineConfig::from_toml_str(source);

        match result {
            Err(ConfigError::Validation(message)) => assert!(
                message.contains(fragment),
                "`{message}` should mention `{fragment}`"
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    fn unknown_keys_are_rejected() {
        let result = EngineConfig::from_toml_str("[sweep]\nintervl_secs = 10");
        assert!(matches!(result, Err(ConfigError::ParseFile { .. })));
    }

    #[rstest]
    #[case("COVENANT_SWEEP_ENABLED", "sometimes")]
    #[case("COVENANT_ACCEPTANCE_TOKEN_LENGTH", "long")]
    fn unparseable_env_values_are_rejected(#[case] key: &'static str, #[case] value: &'static str) {
        let options = LoadOptions::default().with_env(env_from(&[(key, value)]));

        let result = EngineConfig::load(options);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvOverride { key: rejected, .. }) if rejected == key
        ));
    }

    #[rstest]
    fn blank_env_values_are_ignored() -> eyre::Result<()> {
        let options = LoadOptions::default().with_env(env_from(&[("COVENANT_LOG_LEVEL", "  ")]));

        let config = EngineConfig::load(options)?;

        assert_eq!(config.logging.level, "info");
        Ok(())
    }
}
