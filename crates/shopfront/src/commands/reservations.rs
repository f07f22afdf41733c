//! Reservation command handlers.

use tabled::Tabled;

use shopfront_core::{Loader, Reservation, ReservationAction, Resource};

use crate::cli::{GetArgs, ReservationsArgs, ReservationsCommand};
use crate::error::CliError;
use crate::output::{self, EntityView, View, field, opt};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ReservationRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Pickup")]
    pickup: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl EntityView for Reservation {
    type Row = ReservationRow;

    fn row(&self, view: &View) -> ReservationRow {
        ReservationRow {
            code: self.code.clone(),
            customer: self.customer_label(),
            product: self.product_name.clone().unwrap_or_default(),
            quantity: opt(self.quantity),
            pickup: util::fmt_day(self.desired_pickup_date.as_ref()),
            status: output::paint_status(&self.status, view),
        }
    }

    fn detail(&self, view: &View) -> String {
        let label = output::paint_status(&self.status, view);
        let status = match self.raw_status.as_deref() {
            Some(raw) if raw != self.status.label(view.locale) => format!("{label} ({raw})"),
            _ => label,
        };
        let mut lines = vec![
            field("Code", &self.code),
            field("ID", &self.id),
            field("Status", status),
            field("Customer", self.customer_label()),
            field("Email", opt(self.customer_email.as_deref())),
            field("Phone", opt(self.customer_phone.as_deref())),
            field("Product", opt(self.product_name.as_deref())),
            field("Quantity", opt(self.quantity)),
            field("Total", util::fmt_money(self.total_amount)),
            field("Reserved", util::fmt_date(self.reserved_at.as_ref())),
            field("Pickup", util::fmt_day(self.desired_pickup_date.as_ref())),
        ];
        if self.picked_up_at.is_some() {
            lines.push(field("Picked up", util::fmt_date(self.picked_up_at.as_ref())));
        }
        if self.cancelled_at.is_some() {
            lines.push(field("Cancelled", util::fmt_date(self.cancelled_at.as_ref())));
        }
        lines.push(field("Notes", opt(self.notes.as_deref())));
        lines.join("\n")
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(loader: &Loader, args: ReservationsArgs, view: &View) -> Result<(), CliError> {
    match args.command {
        ReservationsCommand::List {
            list,
            status,
            public,
        } => {
            let mut params = util::list_params(&list);
            if let Some(status) = status {
                params = params.status(status);
            }
            let resource = if public {
                Resource::PublicReservations
            } else {
                Resource::Reservations
            };
            let page = util::current(
                loader
                    .load_page_from::<Reservation>(resource, "reservations:list", params)
                    .await,
            )?;
            output::print_output(&output::render_page(&page, view)?, view.quiet);
            Ok(())
        }

        ReservationsCommand::Get(GetArgs { id }) => {
            let reservation = util::record(
                loader.load_detail::<Reservation>(&id).await,
                &id,
                "reservation",
                "reservations list",
            )?;
            output::print_output(&output::render_entity(&reservation, view)?, view.quiet);
            Ok(())
        }

        ReservationsCommand::Accept(GetArgs { id }) => {
            act(loader, &id, ReservationAction::Accept, view).await
        }

        ReservationsCommand::Cancel { id, reason } => {
            act(loader, &id, ReservationAction::Cancel { reason }, view).await
        }

        ReservationsCommand::Confirm(GetArgs { id }) => {
            act(loader, &id, ReservationAction::Confirm, view).await
        }
    }
}

async fn act(
    loader: &Loader,
    id: &str,
    action: ReservationAction,
    view: &View,
) -> Result<(), CliError> {
    let updated = util::record(
        loader.reservation_action(id, action).await,
        id,
        "reservation",
        "reservations list",
    )?;
    if !view.quiet {
        eprintln!(
            "Reservation {} is now {}",
            updated.code,
            updated.status_label(view.locale)
        );
    }
    output::print_output(&output::render_entity(&updated, view)?, view.quiet);
    Ok(())
}
