//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TallyConfig {
    /// Allocation engine configuration.
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Allocation engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocationConfig {
    /// Currency budgets are expressed in.
    #[serde(default)]
    pub currency: Currency,
    /// Overrides the currency's minor units when rendering amounts.
    #[serde(default)]
    pub display_decimal_places: Option<u32>,
    /// Alert thresholds enabled on newly added allocations.
    #[serde(default)]
    pub default_alerts: AlertDefaults,
}

/// Alert thresholds switched on for new allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AlertDefaults {
    /// Notify at 50% usage.
    #[serde(default = "enabled")]
    pub at_50: bool,
    /// Notify at 75% usage.
    #[serde(default = "enabled")]
    pub at_75: bool,
    /// Notify at 90% usage.
    #[serde(default = "enabled")]
    pub at_90: bool,
    /// Notify at 100% usage.
    #[serde(default = "enabled")]
    pub at_100: bool,
}

impl Default for AlertDefaults {
    fn default() -> Self {
        Self {
            at_50: true,
            at_75: true,
            at_90: true,
            at_100: true,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `tally_core=debug`.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "tally_core=info".to_string()
}

impl TallyConfig {
    /// Loads configuration from `.env`, config files and the environment.
    ///
    /// Environment variables use the `TALLY` prefix with `__` between
    /// sections, e.g. `TALLY__ALLOCATION__CURRENCY=EUR`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
