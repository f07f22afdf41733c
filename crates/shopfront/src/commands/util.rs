//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use shopfront_core::{CoreError, ListParams, Outcome};

use crate::cli::ListArgs;
use crate::error::CliError;

/// Translate shared list flags into query parameters.
pub fn list_params(args: &ListArgs) -> ListParams {
    let mut params = ListParams::new().page(args.page);
    if let Some(size) = args.page_size {
        params = params.page_size(size);
    }
    if let Some(ref search) = args.search {
        params = params.search(search.clone());
    }
    if let Some(ref sort) = args.sort {
        params = params.sort(sort.clone());
    }
    params
}

/// Unwrap a load outcome. A one-shot command never reuses a slot, so a
/// superseded result means the session was shut down underneath it.
pub fn current<R>(outcome: Outcome<Result<R, CoreError>>) -> Result<R, CliError> {
    match outcome {
        Outcome::Current(result) => Ok(result?),
        Outcome::Superseded => Err(CliError::Interrupted),
    }
}

/// Like [`current`], with a 404 reported as a missing record.
pub fn record<R>(
    outcome: Outcome<Result<R, CoreError>>,
    id: &str,
    noun: &str,
    list_command: &str,
) -> Result<R, CliError> {
    match outcome {
        Outcome::Current(Err(CoreError::Transport(e))) if e.is_not_found() => {
            Err(CliError::NotFound {
                resource_type: noun.into(),
                identifier: id.into(),
                list_command: list_command.into(),
            })
        }
        other => current(other),
    }
}

/// Read a JSON document from a file, or from stdin for `None` / `-`.
pub fn read_json_input(path: Option<&Path>) -> Result<serde_json::Value, CliError> {
    let contents = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&contents)?)
}

pub fn fmt_date(value: Option<&DateTime<Utc>>) -> String {
    value.map(|d| d.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default()
}

pub fn fmt_day(value: Option<&DateTime<Utc>>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn fmt_money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}
