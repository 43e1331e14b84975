/// Database configuration and connection management
pub mod database;

/// Shop settings loading from config.toml
pub mod settings;
