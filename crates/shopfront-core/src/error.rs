// ── Core error types ──
//
// Errors surfaced to consumers of the core. A superseded request is not an
// error and never appears here: it is reported as `Outcome::Superseded`.
// Transport failures are carried unchanged from `shopfront_api`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Response errors ──────────────────────────────────────────────
    /// A required field was present but had the wrong type.
    #[error("Malformed response: field `{field}` {reason}")]
    MalformedResponse { field: String, reason: String },

    // ── Transport errors (passed through, not reinterpreted) ─────────
    #[error(transparent)]
    Transport(#[from] shopfront_api::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` when a caller-side retry could plausibly succeed.
    ///
    /// The core never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_transient(),
            _ => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}
