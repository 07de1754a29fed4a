//! Configuration (layered: CLI flags > env > config file > defaults).
//!
//! The resolved [`YachtsyConfig`] is built once at startup and shared
//! read-only by every invocation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, YachtsyError};

/// Default upstream endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.yachtsy.ai/v1";

pub const API_KEY_ENV: &str = "YACHTSY_API_KEY";
pub const BASE_URL_ENV: &str = "YACHTSY_API_BASE_URL";
pub const CITATIONS_ENV: &str = "YACHTSY_CITATIONS";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// What to do with citations captured from the terminal chunk.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CitationPolicy {
    /// Return only the aggregated text.
    #[default]
    Drop,
    /// Append a numbered `Sources:` list after the text.
    Append,
}

fn default_user_agent() -> String {
    format!(
        "{}/{} (Rust)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Resolved configuration for the upstream agent.
///
/// ```
/// use yachtsy_mcp::config::{CitationPolicy, YachtsyConfig};
///
/// let config = YachtsyConfig::builder()
///     .api_key("sk-test")
///     .citations(CitationPolicy::Append)
///     .build();
/// assert_eq!(config.base_url(), "https://api.yachtsy.ai/v1");
/// ```
#[derive(Clone, Builder)]
pub struct YachtsyConfig {
    #[builder(into)]
    api_key: String,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    base_url: String,
    #[builder(default)]
    citations: CitationPolicy,
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    connect_timeout: Duration,
    #[builder(into, default = default_user_agent())]
    user_agent: String,
}

impl fmt::Debug for YachtsyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YachtsyConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("citations", &self.citations)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl YachtsyConfig {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn citations(&self) -> CitationPolicy {
        self.citations
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Load from `.env`, the process environment and the config file.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let file = match &overrides.config_path {
            Some(path) => ConfigFile::read(path)?,
            None => match ConfigFile::default_path() {
                Some(path) => ConfigFile::read_optional(&path)?,
                None => ConfigFile::default(),
            },
        };

        Self::resolve(overrides, |key| std::env::var(key).ok(), file)
    }

    /// Merge the layers. `env` looks up an environment variable.
    pub fn resolve<F>(overrides: &ConfigOverrides, env: F, file: ConfigFile) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let api_key = non_blank(overrides.api_key.clone())
            .or_else(|| env(API_KEY_ENV))
            .or_else(|| non_blank(file.api_key))
            .ok_or_else(|| {
                YachtsyError::Configuration(format!(
                    "{API_KEY_ENV} is not set. Set it in the environment, a .env file or the config file"
                ))
            })?;

        let base_url = non_blank(overrides.base_url.clone())
            .or_else(|| env(BASE_URL_ENV))
            .or_else(|| non_blank(file.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let citations = match overrides.citations {
            Some(policy) => policy,
            None => match env(CITATIONS_ENV) {
                Some(raw) => CitationPolicy::from_str(raw.trim()).map_err(|_| {
                    YachtsyError::Configuration(format!(
                        "invalid {CITATIONS_ENV} value '{raw}' (expected 'drop' or 'append')"
                    ))
                })?,
                None => file.citations.unwrap_or_default(),
            },
        };

        let connect_timeout = file
            .connect_timeout_secs
            .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs);

        Ok(Self::builder()
            .api_key(api_key.trim())
            .base_url(base_url.trim())
            .citations(citations)
            .connect_timeout(connect_timeout)
            .build())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub citations: Option<CitationPolicy>,
    pub config_path: Option<PathBuf>,
}

/// On-disk TOML configuration.
///
/// ```toml
/// api_key = "sk-..."
/// base_url = "https://api.yachtsy.ai/v1"
/// citations = "append"
/// connect_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub citations: Option<CitationPolicy>,
    pub connect_timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Platform config location, e.g. `~/.config/yachtsy-mcp/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("ai", "Yachtsy", "yachtsy-mcp")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Read and parse a config file that must exist.
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            YachtsyError::Configuration(format!(
                "cannot read config file {}: {err}",
                path.display()
            ))
        })?;
        Self::parse(&raw, path)
    }

    /// Like [`ConfigFile::read`], but a missing file yields the empty config.
    pub fn read_optional(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(YachtsyError::Configuration(format!(
                "cannot read config file {}: {err}",
                path.display()
            ))),
        }
    }

    fn parse(raw: &str, path: &Path) -> Result<Self> {
        toml::from_str(raw).map_err(|err| {
            YachtsyError::Configuration(format!(
                "invalid config file {}: {err}",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = YachtsyConfig::resolve(&ConfigOverrides::default(), env_of(&[]), ConfigFile::default())
            .expect_err("api key is required");

        assert!(matches!(err, YachtsyError::Configuration(ref message) if message.contains(API_KEY_ENV)));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let result = YachtsyConfig::resolve(
            &ConfigOverrides::default(),
            env_of(&[(API_KEY_ENV, "   ")]),
            ConfigFile::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn env_key_with_defaults() {
        let config = YachtsyConfig::resolve(
            &ConfigOverrides::default(),
            env_of(&[(API_KEY_ENV, "env-key")]),
            ConfigFile::default(),
        )
        .unwrap();

        assert_eq!(config.api_key(), "env-key");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.citations(), CitationPolicy::Drop);
        assert_eq!(config.connect_timeout(), DEFAULT_CONNECT_TIMEOUT);
        assert!(config.user_agent().starts_with("yachtsy-mcp/"));
    }

    #[test]
    fn overrides_beat_env_and_env_beats_file() {
        let file = ConfigFile {
            api_key: Some("file-key".into()),
            base_url: Some("https://file.example/v1".into()),
            citations: Some(CitationPolicy::Drop),
            connect_timeout_secs: Some(5),
        };
        let env = env_of(&[
            (API_KEY_ENV, "env-key"),
            (BASE_URL_ENV, "https://env.example/v1/"),
            (CITATIONS_ENV, "append"),
        ]);
        let overrides = ConfigOverrides {
            api_key: Some("cli-key".into()),
            ..Default::default()
        };

        let config = YachtsyConfig::resolve(&overrides, env, file).unwrap();

        assert_eq!(config.api_key(), "cli-key");
        assert_eq!(config.base_url(), "https://env.example/v1");
        assert_eq!(config.citations(), CitationPolicy::Append);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn file_fills_gaps() {
        let file = ConfigFile {
            api_key: Some("file-key".into()),
            citations: Some(CitationPolicy::Append),
            ..Default::default()
        };

        let config = YachtsyConfig::resolve(&ConfigOverrides::default(), env_of(&[]), file).unwrap();

        assert_eq!(config.api_key(), "file-key");
        assert_eq!(config.citations(), CitationPolicy::Append);
    }

    #[test]
    fn invalid_citation_env_is_rejected() {
        let err = YachtsyConfig::resolve(
            &ConfigOverrides::default(),
            env_of(&[(API_KEY_ENV, "k"), (CITATIONS_ENV, "sometimes")]),
            ConfigFile::default(),
        )
        .expect_err("unknown policy");

        assert!(err.to_string().contains("sometimes"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = YachtsyConfig::builder().api_key("sk-secret").build();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn config_file_round_trip_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_key = \"disk-key\"\ncitations = \"append\"\nconnect_timeout_secs = 3\n",
        )
        .unwrap();

        let file = ConfigFile::read(&path).unwrap();
        assert_eq!(file.api_key.as_deref(), Some("disk-key"));
        assert_eq!(file.citations, Some(CitationPolicy::Append));
        assert_eq!(file.connect_timeout_secs, Some(3));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_kee = \"typo\"\n").unwrap();

        let err = ConfigFile::read(&path).expect_err("typo should fail");
        assert!(matches!(err, YachtsyError::Configuration(_)));
    }

    #[test]
    fn missing_optional_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let file = ConfigFile::read_optional(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigFile::read(&dir.path().join("absent.toml")).expect_err("must exist");
        assert!(err.to_string().contains("absent.toml"));
    }
}
