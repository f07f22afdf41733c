//! Customer command handlers.

use tabled::Tabled;

use shopfront_core::{Customer, Loader};

use crate::cli::{CustomersArgs, CustomersCommand, GetArgs};
use crate::error::CliError;
use crate::output::{self, EntityView, View, field, opt};

use super::util;

#[derive(Tabled)]
pub struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl EntityView for Customer {
    type Row = CustomerRow;

    fn row(&self, _view: &View) -> CustomerRow {
        CustomerRow {
            id: self.id.clone(),
            name: self.label(),
            email: opt(self.email.as_deref()),
            phone: opt(self.phone.as_deref()),
        }
    }

    fn detail(&self, _view: &View) -> String {
        [
            field("ID", &self.id),
            field("Name", &self.display_name),
            field("Document", opt(self.document.as_deref())),
            field("Email", opt(self.email.as_deref())),
            field("Phone", opt(self.phone.as_deref())),
            field("Created", util::fmt_date(self.created_at.as_ref())),
            field("Notes", opt(self.notes.as_deref())),
        ]
        .join("\n")
    }
}

pub async fn handle(loader: &Loader, args: CustomersArgs, view: &View) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List { list } => {
            let page = util::current(
                loader
                    .load_page::<Customer>("customers:list", util::list_params(&list))
                    .await,
            )?;
            output::print_output(&output::render_page(&page, view)?, view.quiet);
            Ok(())
        }

        CustomersCommand::Get(GetArgs { id }) => {
            let customer = util::record(
                loader.load_detail::<Customer>(&id).await,
                &id,
                "customer",
                "customers list",
            )?;
            output::print_output(&output::render_entity(&customer, view)?, view.quiet);
            Ok(())
        }
    }
}
