//! Maintenance Discord commands - `backup` and `prune`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::maintenance,
        errors::{Error, Result},
    };

    /// Writes a snapshot of the database to the configured backup directory.
    #[poise::command(slash_command, prefix_command)]
    pub async fn backup(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let path = maintenance::backup_database(&data.database, &data.config.backup_dir).await?;

        ctx.say(format!("💾 Backup written to `{}`", path.display()))
            .await?;
        Ok(())
    }

    /// Deletes transactions older than the retention window.
    ///
    /// Products left without any transactions are removed too. The window defaults
    /// to `retention_years` from the shop configuration.
    #[poise::command(slash_command, prefix_command)]
    pub async fn prune(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Years of history to keep"] keep_years: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let keep_years = keep_years.unwrap_or(data.config.retention_years);

        let report = maintenance::prune_old_transactions(&data.database, keep_years).await?;

        ctx.say(format!(
            "🧹 Removed {} transaction(s) from before {} and {} empty product(s).",
            report.transactions_removed,
            report.cutoff.date(),
            report.products_removed
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
