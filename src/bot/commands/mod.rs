//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Ledger correction commands
pub mod ledger;

/// Backup and retention commands
pub mod maintenance;

/// Purchase, sale and stock lookup commands
pub mod stock;

/// Daily report and cash-flow summary commands
pub mod summary;

/// Argument parsing and validation shared by the commands
pub mod utils;

use crate::{bot::BotData, errors::Error};

// Export commands
pub use general::*;
pub use ledger::*;
pub use maintenance::*;
pub use stock::*;
pub use summary::*;

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        purchase(),
        sale(),
        inventory(),
        search(),
        price_on(),
        listings(),
        delete_transaction(),
        daily_report(),
        cashflow(),
        show_summary(),
        delete_summary(),
        backup(),
        prune(),
        ping(),
        help(),
    ]
}
