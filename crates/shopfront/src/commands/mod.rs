//! Command dispatch: bridges CLI args -> core loads -> output formatting.

pub mod catalog;
pub mod config_cmd;
pub mod customers;
pub mod normalize;
pub mod reservations;
pub mod sales;
pub mod status;
pub mod util;

use shopfront_core::Loader;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::View;

/// Dispatch a network-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, loader: &Loader, view: &View) -> Result<(), CliError> {
    match cmd {
        Command::Reservations(args) => reservations::handle(loader, args, view).await,
        Command::Products(args) => catalog::handle_products(loader, args, view).await,
        Command::Categories(args) => catalog::handle_categories(loader, args, view).await,
        Command::Customers(args) => customers::handle(loader, args, view).await,
        Command::Sales(args) => sales::handle(loader, args, view).await,
        // Offline commands are handled before a loader exists
        Command::Status(_) | Command::Normalize(_) | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}
