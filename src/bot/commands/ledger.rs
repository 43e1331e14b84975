//! Ledger Discord commands - `listings` and `delete_transaction`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{self, EMBED_DESCRIPTION_LIMIT, join_limited},
        },
        core::{
            catalog,
            ledger::{self, RemoveOutcome},
            report::{format_optional_money, format_quantity},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Lists the purchases of a day with their transaction IDs.
    ///
    /// Use the IDs with `/delete_transaction` to correct mistakes.
    #[poise::command(slash_command, prefix_command)]
    pub async fn listings(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day to list (YYYY-MM-DD, default today)"] date: Option<String>,
    ) -> Result<()> {
        let day = utils::parse_date(date.as_deref())?;
        let data = ctx.data();

        let purchases = ledger::transactions_on(&data.database, day).await?;
        if purchases.is_empty() {
            ctx.say(format!("No purchases recorded on {day}.")).await?;
            return Ok(());
        }

        let rows: Vec<String> = purchases
            .iter()
            .map(|p| {
                format!(
                    "`#{}` {} **{}** · {} · {}",
                    p.id,
                    p.timestamp.format("%H:%M"),
                    p.product_name,
                    format_quantity(p.quantity, &p.unit),
                    format_optional_money(p.cost, &data.config.currency),
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(format!("🧾 Purchases on {day}"))
            .description(join_limited(&rows, EMBED_DESCRIPTION_LIMIT))
            .color(0x0058_65F2);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Deletes a transaction by ID.
    ///
    /// Refused when removing it would leave the product with negative stock. When
    /// the product has no transactions left it is removed as well.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_transaction(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction ID (see /listings)"] id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let product_name = match ledger::get_transaction_by_id(db, id).await? {
            Some(txn) => catalog::get_product_by_id(db, txn.product_id)
                .await?
                .map(|p| p.name),
            None => None,
        };
        let label = product_name.map_or_else(String::new, |name| format!(" ('{name}')"));

        let message = match ledger::remove(db, id).await? {
            RemoveOutcome::Deleted {
                product_removed: false,
            } => format!("🗑️ Deleted transaction #{id}{label}."),
            RemoveOutcome::Deleted {
                product_removed: true,
            } => format!(
                "🗑️ Deleted transaction #{id}{label}. The product had no other transactions and was removed."
            ),
            RemoveOutcome::NotFound => format!("❌ Transaction #{id} not found."),
            RemoveOutcome::Rejected(reason) => {
                format!("⚠️ Cannot delete transaction #{id}{label}: {reason}.")
            }
        };

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
