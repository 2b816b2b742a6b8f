//! Configuration management for Groupie.
//!
//! Parses `groupie.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `api.base_url`
//! - `i18n.default_lang`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override API base URL.
    pub api_url: Option<String>,
    /// Override display language.
    pub lang: Option<String>,
    /// Override link resolution timeout (seconds).
    pub timeout_secs: Option<u64>,
    /// Override link resolution enabled flag.
    pub resolve_links: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "groupie.toml";

/// Upper bound for `resolver.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artist API configuration.
    pub api: ApiConfig,
    /// Link resolution configuration.
    pub resolver: ResolverConfig,
    /// Translation configuration (paths are relative strings from TOML).
    i18n: I18nConfigRaw,

    /// Resolved translation configuration (set after loading).
    #[serde(skip)]
    pub i18n_resolved: I18nConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            resolver: ResolverConfig::default(),
            i18n: I18nConfigRaw::default(),
            i18n_resolved: I18nConfig::default(),
            config_path: None,
        }
    }
}

/// Artist API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the artist API (entities live under `/api/artists/{id}`).
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_owned(),
        }
    }
}

impl ApiConfig {
    /// URL of a single artist entity.
    #[must_use]
    pub fn artist_url(&self, id: &str) -> String {
        format!("{}/api/artists/{id}", self.base_url.trim_end_matches('/'))
    }
}

/// Link resolution configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Whether deferred links are fetched after rendering.
    pub enabled: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 10,
        }
    }
}

impl ResolverConfig {
    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Raw translation configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct I18nConfigRaw {
    translations: Option<String>,
    default_lang: Option<String>,
}

/// Resolved translation configuration with absolute paths.
#[derive(Debug)]
pub struct I18nConfig {
    /// Extra translations file merged over the built-in catalog.
    pub translations: Option<PathBuf>,
    /// Language used when nothing else is requested.
    pub default_lang: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            translations: None,
            default_lang: "fr".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`api.base_url`").
        field: String,
        /// Error message (e.g., "${`GROUPIE_API`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `groupie.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, and the
    /// result is validated again so overrides cannot smuggle in bad values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(api_url) = &settings.api_url {
            self.api.base_url.clone_from(api_url);
        }
        if let Some(lang) = &settings.lang {
            self.i18n_resolved.default_lang.clone_from(lang);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.resolver.timeout_secs = timeout_secs;
        }
        if let Some(resolve_links) = settings.resolve_links {
            self.resolver.enabled = resolve_links;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_api()?;
        self.validate_resolver()?;
        require_non_empty(&self.i18n_resolved.default_lang, "i18n.default_lang")?;
        Ok(())
    }

    fn validate_api(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.api.base_url, "api.base_url")?;
        require_http_url(&self.api.base_url, "api.base_url")
    }

    fn validate_resolver(&self) -> Result<(), ConfigError> {
        let timeout = self.resolver.timeout_secs;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "resolver.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "resolver.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.api.base_url = expand::expand_env(&self.api.base_url, "api.base_url")?;

        if let Some(ref lang) = self.i18n.default_lang {
            self.i18n.default_lang = Some(expand::expand_env(lang, "i18n.default_lang")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.i18n_resolved = I18nConfig {
            translations: self.i18n.translations.as_deref().map(|p| config_dir.join(p)),
            default_lang: self
                .i18n
                .default_lang
                .clone()
                .unwrap_or_else(|| I18nConfig::default().default_lang),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert!(config.resolver.enabled);
        assert_eq!(config.resolver.timeout(), Duration::from_secs(10));
        assert_eq!(config.i18n_resolved.default_lang, "fr");
        assert!(config.i18n_resolved.translations.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.resolver.timeout_secs, 10);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[api]
base_url = "https://groupietrackers.example"

[resolver]
enabled = false
timeout_secs = 3

[i18n]
translations = "i18n/translations.json"
default_lang = "en"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.api.base_url, "https://groupietrackers.example");
        assert!(!config.resolver.enabled);
        assert_eq!(config.resolver.timeout_secs, 3);
        assert_eq!(
            config.i18n_resolved.translations,
            Some(PathBuf::from("/project/i18n/translations.json"))
        );
        assert_eq!(config.i18n_resolved.default_lang, "en");
    }

    #[test]
    fn test_artist_url_trims_trailing_slash() {
        let api = ApiConfig {
            base_url: "http://localhost:8080/".to_owned(),
        };
        assert_eq!(api.artist_url("7"), "http://localhost:8080/api/artists/7");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://api.test\"\n[i18n]\ntranslations = \"t.json\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.api.base_url, "http://api.test");
        assert_eq!(config.config_path, Some(path));
        assert_eq!(
            config.i18n_resolved.translations,
            Some(dir.path().join("t.json"))
        );
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/groupie.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default();
        let overrides = CliSettings {
            api_url: Some("https://api.example".to_owned()),
            lang: Some("en".to_owned()),
            timeout_secs: Some(2),
            resolve_links: Some(false),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.api.base_url, "https://api.example");
        assert_eq!(config.i18n_resolved.default_lang, "en");
        assert_eq!(config.resolver.timeout_secs, 2);
        assert!(!config.resolver.enabled);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.resolver.timeout_secs, 10);
    }

    #[test]
    fn test_expand_env_vars_base_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_GROUPIE_API", "https://api.from.env");
        }

        let toml = r#"
[api]
base_url = "${TEST_GROUPIE_API}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.api.base_url, "https://api.from.env");

        unsafe {
            std::env::remove_var("TEST_GROUPIE_API");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_GROUPIE_API");
        }

        let toml = r#"
[api]
base_url = "${MISSING_GROUPIE_API}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_GROUPIE_API"));
        assert!(err.to_string().contains("api.base_url"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().expect_err("Expected validation to fail");
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_base_url_empty() {
        let mut config = Config::default();
        config.api.base_url = String::new();
        assert_validation_error(&config, &["api.base_url", "empty"]);
    }

    #[test]
    fn test_validate_base_url_invalid_scheme() {
        let mut config = Config::default();
        config.api.base_url = "ftp://artists".to_owned();
        assert_validation_error(&config, &["api.base_url", "http"]);
    }

    #[test]
    fn test_validate_timeout_zero() {
        let mut config = Config::default();
        config.resolver.timeout_secs = 0;
        assert_validation_error(&config, &["timeout_secs", "greater than 0"]);
    }

    #[test]
    fn test_validate_timeout_too_high() {
        let mut config = Config::default();
        config.resolver.timeout_secs = 1000;
        assert_validation_error(&config, &["timeout_secs", "300"]);
    }

    #[test]
    fn test_load_rejects_invalid_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let overrides = CliSettings {
            api_url: Some("not-a-url".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
