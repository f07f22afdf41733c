//! Sale command handlers.

use tabled::Tabled;

use shopfront_core::{Loader, Sale, SaleLine};

use crate::cli::{GetArgs, SalesArgs, SalesCommand};
use crate::error::CliError;
use crate::output::{self, EntityView, View, field, opt};

use super::util;

#[derive(Tabled)]
pub struct SaleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Items")]
    items: u64,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&SaleLine> for LineRow {
    fn from(line: &SaleLine) -> Self {
        Self {
            product: line.product_title.clone(),
            quantity: line.quantity,
            unit: util::fmt_money(line.unit_price),
            total: util::fmt_money(line.total_price),
        }
    }
}

impl EntityView for Sale {
    type Row = SaleRow;

    fn row(&self, view: &View) -> SaleRow {
        SaleRow {
            id: self.id.clone(),
            date: util::fmt_date(self.sale_date.as_ref()),
            customer: self.customer_name.clone(),
            items: self.item_count(),
            total: util::fmt_money(self.total_amount),
            status: output::paint_status(&self.status, view),
        }
    }

    fn detail(&self, view: &View) -> String {
        let mut out = [
            field("ID", &self.id),
            field("Status", output::paint_status(&self.status, view)),
            field("Date", util::fmt_date(self.sale_date.as_ref())),
            field("Customer", &self.customer_name),
            field("Cashier", opt(self.cashier_email.as_deref())),
            field("Discount", util::fmt_money(self.discount_amount)),
            field("Tax", util::fmt_money(self.tax_amount)),
            field("Total", util::fmt_money(self.total_amount)),
        ]
        .join("\n");
        if !self.lines.is_empty() {
            let rows: Vec<LineRow> = self.lines.iter().map(LineRow::from).collect();
            out.push_str("\n\n");
            out.push_str(&tabled::Table::new(rows).to_string());
        }
        out
    }
}

pub async fn handle(loader: &Loader, args: SalesArgs, view: &View) -> Result<(), CliError> {
    match args.command {
        SalesCommand::List { list, status } => {
            let mut params = util::list_params(&list);
            if let Some(status) = status {
                params = params.status(status);
            }
            let page = util::current(loader.load_page::<Sale>("sales:list", params).await)?;
            output::print_output(&output::render_page(&page, view)?, view.quiet);
            Ok(())
        }

        SalesCommand::Get(GetArgs { id }) => {
            let sale = util::record(
                loader.load_detail::<Sale>(&id).await,
                &id,
                "sale",
                "sales list",
            )?;
            output::print_output(&output::render_entity(&sale, view)?, view.quiet);
            Ok(())
        }
    }
}
