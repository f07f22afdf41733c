//! Shared configuration for shopfront tools.
//!
//! TOML profiles, token resolution (env + plaintext), status synonym
//! overrides, and translation to `shopfront_core::SessionConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopfront_core::{Locale, SessionConfig, StatusReconciler};

/// Environment variable consulted when a profile names no token variable.
pub const TOKEN_ENV: &str = "SHOPFRONT_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named back-office profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Raw status -> canonical name overrides, per entity.
    #[serde(default)]
    pub statuses: StatusOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
            statuses: StatusOverrides::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: Option<u32>,

    #[serde(default)]
    pub locale: Locale,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            locale: Locale::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
#[allow(clippy::unnecessary_wraps)]
fn default_page_size() -> Option<u32> {
    Some(10)
}

/// A named back-office profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "http://localhost:8080").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token in plaintext. Prefer `token_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Override display locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            token_env: None,
            timeout: None,
            page_size: None,
            locale: None,
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8080".into()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatusOverrides {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reservation: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sale: BTreeMap<String, String>,
}

impl Config {
    /// Profile to use: the explicit name, else `default_profile`, else "default".
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    /// Look up a profile. A missing "default" profile is synthesized with
    /// built-in values so a fresh install works against a local backend.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile {
                profile: name.into(),
            }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "shopfront", "shopfront").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("shopfront");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file, layered over defaults and under
/// `SHOPFRONT_`-prefixed environment variables (`__` separates nesting,
/// e.g. `SHOPFRONT_DEFAULTS__PAGE_SIZE`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHOPFRONT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the bearer token from the process environment and the profile.
pub fn resolve_token(profile: &Profile) -> Option<SecretString> {
    resolve_token_with(profile, |name| std::env::var(name).ok())
}

/// Token chain with an injectable environment lookup:
/// profile `token_env`, then `SHOPFRONT_TOKEN`, then plaintext `token`.
/// No token is valid (storefront endpoints are public).
pub fn resolve_token_with(
    profile: &Profile,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    let non_empty = |v: String| (!v.trim().is_empty()).then_some(v);

    profile
        .token_env
        .as_deref()
        .and_then(&env)
        .and_then(non_empty)
        .or_else(|| env(TOKEN_ENV).and_then(non_empty))
        .or_else(|| profile.token.clone().and_then(non_empty))
        .map(SecretString::from)
}

// ── Session translation ─────────────────────────────────────────────

/// Build a `SessionConfig` for a profile, with the given token.
pub fn profile_to_session_config(
    config: &Config,
    profile: &Profile,
    token: Option<SecretString>,
) -> Result<SessionConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let mut session = SessionConfig::new(api_url);
    session.token = token;
    session.timeout = Duration::from_secs(profile.timeout.unwrap_or(config.defaults.timeout));
    session.page_size = profile.page_size.or(config.defaults.page_size);
    session.locale = profile.locale.unwrap_or(config.defaults.locale);
    session.reservation_statuses = config.statuses.reservation.clone();
    session.sale_statuses = config.statuses.sale.clone();

    validate_statuses(&session)?;
    Ok(session)
}

/// Resolve the named (or default) profile into a `SessionConfig`, reading
/// the token from the environment.
pub fn session_for(
    config: &Config,
    profile_name: Option<&str>,
) -> Result<SessionConfig, ConfigError> {
    let name = config.profile_name(profile_name);
    let profile = config.profile(name)?;
    let token = resolve_token(&profile);
    profile_to_session_config(config, &profile, token)
}

/// Reject overrides that name a canonical status that does not exist.
fn validate_statuses(session: &SessionConfig) -> Result<(), ConfigError> {
    session
        .reconciler()
        .map(|_: StatusReconciler| ())
        .map_err(|e| ConfigError::Validation {
            field: "statuses".into(),
            reason: e.to_string(),
        })
}
