//! Unified error types for `StockBuddy`.
//!
//! Storage failures and framework failures are errors. Domain rejections such as
//! "would cause negative stock" are not: they come back as outcome enums from the
//! core modules so callers branch on data instead of error variants.

use thiserror::Error;

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Any failure reported by the SQLite store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A product referenced by id or name does not exist
    #[error("Product not found: {name}")]
    ProductNotFound {
        /// Name or id of the missing product
        name: String,
    },

    /// A quantity entered by the operator was rejected
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: f64,
    },

    /// A money figure entered by the operator was rejected
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A date string could not be parsed
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The raw input
        input: String,
    },

    /// Filesystem failure (backups, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/poise failure
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Whether the error stems from operator input rather than a system failure.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound { .. }
                | Self::InvalidQuantity { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidDate { .. }
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_input_errors() {
        assert!(Error::InvalidDate { input: "x".into() }.is_user_input());
        assert!(Error::InvalidQuantity { quantity: -1.0 }.is_user_input());
        assert!(Error::ProductNotFound { name: "Rice".into() }.is_user_input());
        assert!(!Error::Config { message: "bad".into() }.is_user_input());
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".into())).is_user_input());
    }
}
