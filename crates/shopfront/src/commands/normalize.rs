//! Offline normalization of saved list responses.

use serde_json::Value;

use shopfront_core::{
    Category, Customer, Page, PageRequest, Product, RawListResponse, Reservation, Sale,
    StatusReconciler, normalize, normalize_json,
};

use crate::cli::{NormalizeArgs, OutputFormat, PayloadEntity};
use crate::error::CliError;
use crate::output::{self, EntityView, View, field};

use super::util;

pub fn handle(
    args: NormalizeArgs,
    reconciler: &StatusReconciler,
    view: &View,
) -> Result<(), CliError> {
    let body = util::read_json_input(args.file.as_deref())?;
    let requested = PageRequest {
        page: args.page,
        page_size: args.page_size,
    };

    let out = match args.entity {
        None => render_raw(&normalize_json(body, requested, args.total)?, view)?,
        Some(PayloadEntity::Reservations) => {
            typed::<Reservation>(body, requested, args.total, reconciler, view)?
        }
        Some(PayloadEntity::Products) => {
            typed::<Product>(body, requested, args.total, reconciler, view)?
        }
        Some(PayloadEntity::Categories) => {
            typed::<Category>(body, requested, args.total, reconciler, view)?
        }
        Some(PayloadEntity::Customers) => {
            typed::<Customer>(body, requested, args.total, reconciler, view)?
        }
        Some(PayloadEntity::Sales) => typed::<Sale>(body, requested, args.total, reconciler, view)?,
    };
    output::print_output(&out, view.quiet);
    Ok(())
}

/// Decode items as `E`, reconcile them, then normalize the page.
fn typed<E: EntityView>(
    body: Value,
    requested: PageRequest,
    total: Option<i64>,
    reconciler: &StatusReconciler,
    view: &View,
) -> Result<String, CliError> {
    let entities = RawListResponse::from_json(body)
        .decode::<E::Raw>()?
        .map_items(|raw| E::reconcile(raw, reconciler));
    let page = normalize(entities, requested, total)?;
    output::render_page(&page, view)
}

/// Untyped pages: a summary in table mode, one compact item per line in
/// plain mode, the page itself otherwise.
fn render_raw(page: &Page<Value>, view: &View) -> Result<String, CliError> {
    match view.format {
        OutputFormat::Table => Ok([
            field("Total items", page.total_items().to_string()),
            field("Page", page.page().to_string()),
            field("Page size", page.page_size().to_string()),
            field("Total pages", page.total_pages().to_string()),
            field("Items", page.items().len().to_string()),
        ]
        .join("\n")),
        OutputFormat::Plain => {
            let lines = page
                .items()
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(lines.join("\n"))
        }
        format => output::render_single(format, page, |_| String::new(), |_| String::new()),
    }
}
