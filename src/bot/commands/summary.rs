//! Daily summary Discord commands - `daily_report`, `cashflow`, `summary` and
//! `delete_summary`.
//!
//! `daily_report` is derived from the ledger on every call. `cashflow` tallies the
//! cash the operator entered against the day's purchases and can save the result;
//! `summary` shows what was saved.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{self, join_limited},
        },
        core::{
            catalog, ledger, metrics,
            report::{format_money, format_quantity},
            summary::{self, CashFlow, SummaryDeleteOutcome, SummaryFigures},
        },
        errors::{Error, Result},
    };
    use chrono::NaiveDate;
    use poise::serenity_prelude as serenity;
    use std::collections::HashMap;

    const EMBED_FIELD_LIMIT: usize = 1000;

    fn profit_color(profit_loss: f64) -> u32 {
        if profit_loss < 0.0 { 0x00ED_4245 } else { 0x0057_F287 }
    }

    fn figures_embed(
        title: String,
        figures: &SummaryFigures,
        total_cash_out: f64,
        currency: &str,
    ) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title(title)
            .field("Cash in", format_money(figures.cash_in, currency), true)
            .field("Cash out", format_money(figures.cash_out, currency), true)
            .field(
                "Purchase costs",
                format_money(figures.purchase_costs, currency),
                true,
            )
            .field(
                "Total cash out",
                format_money(total_cash_out, currency),
                true,
            )
            .field(
                "Profit / loss",
                format!("**{}**", format_money(figures.profit_loss, currency)),
                true,
            )
            .color(profit_color(figures.profit_loss))
    }

    /// Shows a day's net earnings and the estimated restocking needs.
    #[poise::command(slash_command, prefix_command)]
    pub async fn daily_report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day to report (YYYY-MM-DD, default today)"] date: Option<String>,
    ) -> Result<()> {
        let day = utils::parse_date(date.as_deref())?;
        let data = ctx.data();
        let db = &data.database;
        let currency = &data.config.currency;

        let earnings = metrics::daily_earnings(db, day, data.config.cost_convention).await?;
        let needs = metrics::estimate_needs(db, day).await?;

        let units: HashMap<String, String> = catalog::list_all(db)
            .await?
            .into_iter()
            .map(|p| (p.name, p.unit))
            .collect();
        let need_rows: Vec<String> = needs
            .iter()
            .map(|(name, need)| {
                let unit = units.get(name).map_or("", String::as_str);
                format!("{name}: {}", format_quantity(*need, unit))
            })
            .collect();
        let needs_text = if need_rows.is_empty() {
            "Nothing to restock.".to_string()
        } else {
            join_limited(&need_rows, EMBED_FIELD_LIMIT)
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("📊 Daily report for {day}"))
            .field(
                "Sale revenue",
                format_money(earnings.sale_revenue, currency),
                true,
            )
            .field(
                "Purchase cost",
                format_money(earnings.purchase_cost, currency),
                true,
            )
            .field(
                "Net earnings",
                format!("**{}**", format_money(earnings.net, currency)),
                true,
            )
            .field("Estimated needs", needs_text, false)
            .color(profit_color(earnings.net));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Tallies cash in and out against the day's purchase costs.
    ///
    /// With `save:true` the tally replaces the saved summary for that day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cashflow(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Cash received"] cash_in: f64,
        #[description = "Cash paid out besides stock purchases"] cash_out: f64,
        #[description = "Day to tally (YYYY-MM-DD, default today)"] date: Option<String>,
        #[description = "Save the tally as the day's summary"] save: Option<bool>,
    ) -> Result<()> {
        let cash_in = utils::ensure_amount(cash_in, false)?;
        let cash_out = utils::ensure_amount(cash_out, false)?;
        let day = utils::parse_date(date.as_deref())?;

        let data = ctx.data();
        let db = &data.database;

        let flow: CashFlow =
            summary::compute_cash_flow(db, day, cash_in, cash_out, data.config.cost_convention)
                .await?;

        let saved = save.unwrap_or(false);
        if saved {
            summary::save(db, day, flow.figures()).await?;
        }

        let mut embed = figures_embed(
            format!("💵 Cash flow for {day}"),
            &flow.figures(),
            flow.total_cash_out,
            &data.config.currency,
        );
        if saved {
            embed = embed.footer(serenity::CreateEmbedFooter::new("Saved as the day's summary"));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the summary saved for a day.
    #[poise::command(slash_command, prefix_command, rename = "summary")]
    pub async fn show_summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day to show (YYYY-MM-DD, default today)"] date: Option<String>,
    ) -> Result<()> {
        let day = utils::parse_date(date.as_deref())?;
        let data = ctx.data();

        let Some(figures) = summary::load(&data.database, day).await? else {
            ctx.say(format!(
                "No summary saved for {day}. Use `/cashflow` with `save: True` to create one."
            ))
            .await?;
            return Ok(());
        };

        let embed = figures_embed(
            format!("🗓️ Saved summary for {day}"),
            &figures,
            figures.cash_out + figures.purchase_costs,
            &data.config.currency,
        );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    async fn describe_pending_delete(
        ctx: poise::Context<'_, BotData, Error>,
        day: NaiveDate,
    ) -> Result<String> {
        let purchases = ledger::transactions_on(&ctx.data().database, day).await?;
        Ok(format!(
            "⚠️ Deleting the summary for {day} also deletes the {} purchase(s) recorded that day. \
             Stock is not checked. Run again with `confirm: True` to proceed.",
            purchases.len()
        ))
    }

    /// Deletes a day's summary together with every purchase recorded that day.
    ///
    /// Without `confirm:true` it only reports what would be deleted.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day of the summary (YYYY-MM-DD)"] date: String,
        #[description = "Really delete the summary and that day's purchases"] confirm: Option<
            bool,
        >,
    ) -> Result<()> {
        let day = utils::parse_date(Some(&date))?;
        let db = &ctx.data().database;

        if summary::load(db, day).await?.is_none() {
            ctx.say(format!("❌ No summary found for {day}; nothing deleted."))
                .await?;
            return Ok(());
        }

        if !confirm.unwrap_or(false) {
            let warning = describe_pending_delete(ctx, day).await?;
            ctx.say(warning).await?;
            return Ok(());
        }

        let message = match summary::delete(db, day).await? {
            SummaryDeleteOutcome::Deleted {
                transactions_removed,
                products_removed,
            } => {
                let mut message = format!(
                    "🗑️ Deleted the summary for {day} and {transactions_removed} purchase(s)."
                );
                if products_removed > 0 {
                    message.push_str(&format!(
                        " {products_removed} product(s) without remaining transactions were removed."
                    ));
                }
                message
            }
            SummaryDeleteOutcome::NotFound => {
                format!("❌ No summary found for {day}; nothing deleted.")
            }
        };

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
