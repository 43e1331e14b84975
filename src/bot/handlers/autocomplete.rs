//! Autocomplete handlers for Discord slash command parameters.
//!
//! Product names come from the catalog; units come from the shop configuration.

use crate::{bot::BotData, core::catalog, errors::Error};

/// Discord accepts at most this many autocomplete choices.
const MAX_CHOICES: usize = 25;

/// Provides autocomplete suggestions for product names.
///
/// Matches are case-insensitive substrings of the partial input, sorted
/// alphabetically and capped at 25. A lookup failure yields no suggestions.
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(products) = catalog::list_all(db).await else {
        return Vec::new();
    };

    let mut names: Vec<String> = products.into_iter().map(|p| p.name).collect();
    names.sort();
    filter_choices(names, partial)
}

/// Provides autocomplete suggestions for units from `config.toml`.
#[allow(clippy::unused_async)]
pub async fn autocomplete_unit(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_choices(ctx.data().config.units.clone(), partial)
}

fn filter_choices(options: Vec<String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();

    options
        .into_iter()
        .filter(|option| option.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .collect()
}
