//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**StockBuddy Help**\n\
        Here is a summary of all available commands for StockBuddy.\n\n\
        **Stock**\n\
        • `/purchase <product> <unit> <quantity> <total_cost>` - Records a purchase.\n\
        • `/sale <product> <quantity> [price]` - Records a sale (price is per unit).\n\
        • `/inventory` - Shows current stock of every product.\n\
        • `/search <term> [date]` - Shows a product and its purchase history.\n\
        • `/price_on <product> [date]` - Shows the last cost on or before a day.\n\n\
        **Ledger**\n\
        • `/listings [date]` - Lists a day's purchases with their IDs.\n\
        • `/delete_transaction <id>` - Deletes a transaction unless stock would go negative.\n\n\
        **Daily figures**\n\
        • `/daily_report [date]` - Net earnings and estimated restocking needs.\n\
        • `/cashflow <cash_in> <cash_out> [date] [save]` - Profit/loss tally, optionally saved.\n\
        • `/summary [date]` - Shows a saved summary.\n\
        • `/delete_summary <date> [confirm]` - Deletes a summary and that day's purchases.\n\n\
        **Maintenance**\n\
        • `/backup` - Writes a database snapshot.\n\
        • `/prune [keep_years]` - Deletes old transactions (default {} years).\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Dates use the `YYYY-MM-DD` format and default to today. Purchase costs are \
        stored as {}.",
            ctx.data().config.retention_years,
            ctx.data().config.cost_convention,
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
