//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shopfront_config::ConfigError;
use shopfront_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const MALFORMED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the back office at {url}")]
    #[diagnostic(
        code(shopfront::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             URL: {url}\n\
             Override with: shopfront --api-url <URL> ..."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("The API rejected the session token")]
    #[diagnostic(
        code(shopfront::auth_failed),
        help(
            "Export a fresh token in SHOPFRONT_TOKEN, set token_env in your profile,\n\
             or pass --token."
        )
    )]
    AuthFailed,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shopfront::not_found),
        help("Run: shopfront {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}{}", code_suffix(.code.as_deref()))]
    #[diagnostic(code(shopfront::api_error))]
    ApiError {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Malformed response: field `{field}` {reason}")]
    #[diagnostic(
        code(shopfront::malformed),
        help("The server sent data of the wrong type. Re-run with -vv to see the request.")
    )]
    Malformed { field: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopfront::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shopfront::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shopfront config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(shopfront::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Could not load configuration: {message}")]
    #[diagnostic(code(shopfront::config))]
    Config { message: String },

    // ── Timeout / interruption ───────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(shopfront::timeout),
        help("Increase timeout with --timeout or check API responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Request was cancelled before it completed")]
    #[diagnostic(code(shopfront::interrupted))]
    Interrupted,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(shopfront::json), help("Check the JSON input and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(shopfront::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" [{c}]")).unwrap_or_default()
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Malformed { .. } => exit_code::MALFORMED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MalformedResponse { field, reason } => CliError::Malformed { field, reason },
            CoreError::Transport(api) => api.into(),
            CoreError::Config { message } => CliError::Validation {
                field: "statuses".into(),
                reason: message,
            },
        }
    }
}

impl From<shopfront_api::Error> for CliError {
    fn from(err: shopfront_api::Error) -> Self {
        use shopfront_api::Error as ApiErr;

        match err {
            ApiErr::Transport(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            ApiErr::InvalidUrl(e) => CliError::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            },
            ApiErr::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            ApiErr::Cancelled => CliError::Interrupted,
            ApiErr::InvalidHeader(reason) => CliError::Validation {
                field: "token".into(),
                reason,
            },
            ApiErr::Unauthorized => CliError::AuthFailed,
            ApiErr::Api {
                status,
                message,
                code,
            } => CliError::ApiError {
                status,
                code,
                message,
            },
            ApiErr::Deserialization { message, .. } => CliError::Malformed {
                field: "body".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}
