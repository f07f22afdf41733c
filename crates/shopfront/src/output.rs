//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use shopfront_core::{CanonicalStatus, Entity, Locale, Page, StatusKind};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Presentation settings ────────────────────────────────────────────

/// Resolved presentation settings for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub format: OutputFormat,
    pub locale: Locale,
    pub color: bool,
    pub quiet: bool,
}

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Status label in the view's locale, colored by lifecycle stage.
pub fn paint_status(status: &CanonicalStatus, view: &View) -> String {
    let label = status.label(view.locale);
    if !view.color {
        return label.to_owned();
    }
    match status.kind() {
        StatusKind::Pending => label.yellow().to_string(),
        StatusKind::Accepted | StatusKind::Confirmed => label.cyan().to_string(),
        StatusKind::ReadyForPickup | StatusKind::PickedUp => label.green().to_string(),
        StatusKind::Cancelled => label.red().to_string(),
        StatusKind::Unrecognized | StatusKind::Unknown => label.dimmed().to_string(),
    }
}

// ── Entity views ─────────────────────────────────────────────────────

/// How a canonical entity shows up in tables and detail views.
pub trait EntityView: Entity {
    type Row: Tabled;

    fn row(&self, view: &View) -> Self::Row;

    fn detail(&self, view: &View) -> String;
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Render a canonical page: rows plus a position footer in table mode,
/// the whole page object in structured modes.
pub fn render_page<E: EntityView>(page: &Page<E>, view: &View) -> Result<String, CliError> {
    match view.format {
        OutputFormat::Table => {
            let rows: Vec<E::Row> = page.items().iter().map(|e| e.row(view)).collect();
            let mut out = render_table(&rows);
            out.push('\n');
            out.push_str(&page_footer(page));
            Ok(out)
        }
        OutputFormat::Json => render_json(page, false),
        OutputFormat::JsonCompact => render_json(page, true),
        OutputFormat::Yaml => render_yaml(page),
        OutputFormat::Plain => Ok(page
            .items()
            .iter()
            .map(|e| e.id().to_owned())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render one entity through its detail view.
pub fn render_entity<E: EntityView>(entity: &E, view: &View) -> Result<String, CliError> {
    render_single(view.format, entity, |e| e.detail(view), |e| e.id().to_owned())
}

/// "Page 2 of 3 (25 items)", or "No items" for an empty page.
pub fn page_footer<T>(page: &Page<T>) -> String {
    if page.total_items() == 0 {
        return "No items".into();
    }
    format!(
        "Page {} of {} ({} items)",
        page.page(),
        page.total_pages(),
        page.total_items()
    )
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Detail line with a fixed-width key column; blank values print as "-".
pub fn field(key: &str, value: impl AsRef<str>) -> String {
    let value = value.as_ref();
    let value = if value.trim().is_empty() { "-" } else { value };
    format!("{:<14}{value}", format!("{key}:"))
}

pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
