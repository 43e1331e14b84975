//! Stock Discord commands - `purchase`, `sale`, `inventory`, `search` and `price_on`.
//!
//! These commands record stock movements and answer questions about what is on the
//! shelf. Input validation failures propagate as [`Error`](crate::errors::Error)
//! values and are turned into replies by the framework error handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{self, EMBED_DESCRIPTION_LIMIT, join_limited},
            handlers::autocomplete,
        },
        core::{
            catalog,
            ledger::{self, end_of_day},
            report::{self, format_money, format_optional_money, format_quantity, format_timestamp},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Records a purchase (stock-in).
    ///
    /// The product is created with the given unit the first time it is bought; an
    /// existing product keeps its original unit.
    #[poise::command(slash_command, prefix_command)]
    pub async fn purchase(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name (e.g., 'Basmati Rice')"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "Unit of measure (used when the product is new)"]
        #[autocomplete = "autocomplete::autocomplete_unit"]
        unit: String,
        #[description = "Quantity bought"] quantity: f64,
        #[description = "Total cost paid for this quantity"] total_cost: f64,
    ) -> Result<()> {
        let name = product.trim();
        let unit = unit.trim();
        if name.is_empty() {
            ctx.say("❌ Product name cannot be empty.").await?;
            return Ok(());
        }
        if unit.is_empty() {
            ctx.say("❌ Unit cannot be empty.").await?;
            return Ok(());
        }
        let quantity = utils::ensure_positive_quantity(quantity)?;
        let total_cost = utils::ensure_amount(total_cost, true)?;

        let data = ctx.data();
        let db = &data.database;
        let currency = &data.config.currency;

        let product_id = catalog::resolve_or_create(db, name, unit).await?;
        let stored_cost = data
            .config
            .cost_convention
            .stored_purchase_cost(total_cost, quantity);
        let created = ledger::record(db, product_id, quantity, Some(stored_cost)).await?;

        let stock = ledger::current_stock(db, product_id).await?;
        let stock_unit = catalog::get_product_by_id(db, product_id)
            .await?
            .map_or_else(|| unit.to_string(), |p| p.unit);

        let mut message = format!(
            "✅ Recorded purchase of {} of '{name}' for {} (Transaction ID: {}).\nStock now: {}",
            format_quantity(quantity, &stock_unit),
            format_money(total_cost, currency),
            created.id,
            format_quantity(stock, &stock_unit),
        );
        if stock_unit != unit {
            message.push_str(&format!(
                "\nℹ️ '{name}' is tracked in {stock_unit}; the unit '{unit}' was ignored."
            ));
        }

        ctx.say(message).await?;
        Ok(())
    }

    /// Records a sale (stock-out) of an existing product.
    ///
    /// Sales are always recorded, even when they take stock below zero.
    #[poise::command(slash_command, prefix_command)]
    pub async fn sale(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product sold"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "Quantity sold"] quantity: f64,
        #[description = "Price per unit (optional)"] price: Option<f64>,
    ) -> Result<()> {
        let quantity = utils::ensure_positive_quantity(quantity)?;
        let price = price.map(|p| utils::ensure_amount(p, false)).transpose()?;

        let data = ctx.data();
        let db = &data.database;

        let Some(found) = catalog::get_product_by_name(db, &product).await? else {
            return Err(Error::ProductNotFound {
                name: product.trim().to_string(),
            });
        };

        let created = ledger::record(db, found.id, -quantity, price).await?;
        let stock = ledger::current_stock(db, found.id).await?;

        let revenue = price.map_or_else(String::new, |p| {
            format!(" for {}", format_money(p * quantity, &data.config.currency))
        });
        let mut message = format!(
            "✅ Recorded sale of {} of '{}'{revenue} (Transaction ID: {}).\nStock now: {}",
            format_quantity(quantity, &found.unit),
            found.name,
            created.id,
            format_quantity(stock, &found.unit),
        );
        if stock < 0.0 {
            message.push_str("\n⚠️ Stock is now negative. Record the missing purchase.");
        }

        ctx.say(message).await?;
        Ok(())
    }

    /// Shows every product with its current stock and latest purchase.
    #[poise::command(slash_command, prefix_command)]
    pub async fn inventory(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let lines = report::inventory_overview(&data.database).await?;

        if lines.is_empty() {
            ctx.say("No products recorded yet. Use `/purchase` to add stock!")
                .await?;
            return Ok(());
        }

        let rows: Vec<String> = lines
            .iter()
            .map(|line| {
                let last_purchase = line
                    .last_purchase_at
                    .map_or_else(|| "never".to_string(), format_timestamp);
                format!(
                    "**{}**: {} · last purchase {} · last cost {}",
                    line.product.name,
                    format_quantity(line.stock, &line.product.unit),
                    last_purchase,
                    format_optional_money(line.last_price, &data.config.currency),
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("📦 Current Inventory")
            .description(join_limited(&rows, EMBED_DESCRIPTION_LIMIT))
            .color(0x0058_65F2)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} product(s)",
                lines.len()
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows a product card with its purchase history.
    ///
    /// Matches the exact name first, then any product containing the search term.
    #[poise::command(slash_command, prefix_command)]
    pub async fn search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name or part of it"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        term: String,
        #[description = "Only show purchases of this day (YYYY-MM-DD)"] date: Option<String>,
    ) -> Result<()> {
        let day = date
            .as_deref()
            .map(|raw| utils::parse_date(Some(raw)))
            .transpose()?;

        let data = ctx.data();
        let db = &data.database;
        let currency = &data.config.currency;

        let Some(found) = report::find_product(db, &term).await? else {
            ctx.say(format!("❌ No product matches '{}'.", term.trim()))
                .await?;
            return Ok(());
        };

        let line = report::stock_line(db, found).await?;
        let history = ledger::purchases_for(db, line.product.id, day, day).await?;

        let rows: Vec<String> = history
            .iter()
            .map(|p| {
                format!(
                    "`#{}` {} · {} · {}",
                    p.id,
                    format_timestamp(p.timestamp),
                    format_quantity(p.quantity, &line.product.unit),
                    format_optional_money(p.cost, currency),
                )
            })
            .collect();
        let history_text = if rows.is_empty() {
            day.map_or_else(
                || "No purchases recorded.".to_string(),
                |d| format!("No purchases on {d}."),
            )
        } else {
            join_limited(&rows, EMBED_DESCRIPTION_LIMIT)
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("🔍 {}", line.product.name))
            .field(
                "Stock",
                format_quantity(line.stock, &line.product.unit),
                true,
            )
            .field(
                "Last cost",
                format_optional_money(line.last_price, currency),
                true,
            )
            .field(
                "Last purchase",
                line.last_purchase_at
                    .map_or_else(|| "never".to_string(), format_timestamp),
                true,
            )
            .description(history_text)
            .color(0x0058_65F2);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the cost of a product's latest purchase on or before a day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn price_on(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "Day to look at (YYYY-MM-DD, default today)"] date: Option<String>,
    ) -> Result<()> {
        let day = utils::parse_date(date.as_deref())?;

        let data = ctx.data();
        let db = &data.database;

        let Some(found) = catalog::get_product_by_name(db, &product).await? else {
            return Err(Error::ProductNotFound {
                name: product.trim().to_string(),
            });
        };

        let message = match ledger::last_purchase_price(db, found.id, Some(end_of_day(day)))
            .await?
        {
            Some(cost) => format!(
                "💰 Last cost of '{}' on or before {day}: **{}** ({})",
                found.name,
                format_money(cost, &data.config.currency),
                data.config.cost_convention,
            ),
            None => format!(
                "No purchase cost recorded for '{}' on or before {day}.",
                found.name
            ),
        };

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
