//! Shop settings loading from config.toml
//!
//! Every field has a default, so the bot runs without a config file at all. The
//! settings that change arithmetic (`cost_convention`) are read once at start-up and
//! passed explicitly to the core functions that need them.

use crate::core::metrics::CostConvention;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Units offered by autocomplete when config.toml does not list any.
const DEFAULT_UNITS: [&str; 9] = [
    "kg",
    "grams",
    "kilograms",
    "quintal",
    "tons",
    "liters",
    "milliliters",
    "pieces",
    "packets",
];

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShopConfig {
    /// Currency label used when rendering money (e.g., "INR")
    pub currency: String,
    /// How the price column of a purchase is interpreted
    pub cost_convention: CostConvention,
    /// Transactions older than this many years are pruned
    pub retention_years: u32,
    /// Directory receiving database snapshots
    pub backup_dir: PathBuf,
    /// Unit labels suggested by autocomplete
    pub units: Vec<String>,
    /// Run retention pruning once when the bot starts
    pub prune_on_startup: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            cost_convention: CostConvention::default(),
            retention_years: 2,
            backup_dir: PathBuf::from("backups"),
            units: DEFAULT_UNITS.iter().map(ToString::to_string).collect(),
            prune_on_startup: false,
        }
    }
}

/// Loads shop settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type or an unknown `cost_convention`
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ShopConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses shop settings from TOML text.
pub fn parse_config(contents: &str) -> Result<ShopConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `path`, or returns the defaults when the file does not exist.
///
/// A file that exists but fails to parse is still an error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<ShopConfig> {
    let path = path.as_ref();
    if path.exists() {
        debug!("Loading shop settings from {}", path.display());
        load_config(path)
    } else {
        warn!("{} not found, using default shop settings", path.display());
        Ok(ShopConfig::default())
    }
}
