//! Status vocabulary handlers. These run offline against the effective
//! synonym tables.

use serde::Serialize;
use tabled::Tabled;

use shopfront_core::{CanonicalStatus, StatusKind, StatusReconciler, SynonymTable, canonicalize};

use crate::cli::{StatusArgs, StatusCommand, StatusEntity};
use crate::error::CliError;
use crate::output::{self, View};

#[derive(Serialize)]
struct Reconciled {
    raw: String,
    status: CanonicalStatus,
    label: String,
}

#[derive(Tabled)]
struct ReconciledRow {
    #[tabled(rename = "Raw")]
    raw: String,
    #[tabled(rename = "Canonical")]
    canonical: String,
    #[tabled(rename = "Label")]
    label: String,
}

impl ReconciledRow {
    fn new(item: &Reconciled, view: &View) -> Self {
        Self {
            raw: item.raw.clone(),
            canonical: item.status.kind().to_string(),
            label: output::paint_status(&item.status, view),
        }
    }
}

fn table_for(reconciler: &StatusReconciler, entity: StatusEntity) -> &SynonymTable {
    match entity {
        StatusEntity::Reservation => reconciler.reservation_table(),
        StatusEntity::Sale => reconciler.sale_table(),
    }
}

fn reconciled(raw: &str, status: CanonicalStatus, view: &View) -> Reconciled {
    Reconciled {
        raw: raw.to_owned(),
        label: status.label(view.locale).to_owned(),
        status,
    }
}

pub fn handle(args: StatusArgs, reconciler: &StatusReconciler, view: &View) -> Result<(), CliError> {
    let items: Vec<Reconciled> = match args.command {
        StatusCommand::Canonicalize { raw, entity } => {
            let table = table_for(reconciler, entity);
            raw.iter()
                .map(|value| reconciled(value, canonicalize(value, table), view))
                .collect()
        }

        StatusCommand::Table { entity } => table_for(reconciler, entity)
            .entries()
            .into_iter()
            .map(|(raw, kind)| reconciled(raw, CanonicalStatus::new(kind), view))
            .collect(),

        StatusCommand::Options => StatusKind::selectable()
            .iter()
            .map(|kind| {
                let name: &'static str = kind.into();
                reconciled(name, CanonicalStatus::new(*kind), view)
            })
            .collect(),
    };

    let out = output::render_list(
        view.format,
        &items,
        |item| ReconciledRow::new(item, view),
        |item| item.status.kind().to_string(),
    )?;
    output::print_output(&out, view.quiet);
    Ok(())
}
