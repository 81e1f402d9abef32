//! Configuration management for the CLI
//!
//! Settings come from an optional file (YAML, TOML or JSON, picked by
//! extension) overlaid by `HLO_`-prefixed environment variables such as
//! `HLO_ELECTRICITY__PRICE_PER_KWH`. Electricity keys may also sit at the
//! top level of the file (`price_per_kwh: 0.2`).

use anyhow::{Context, Result};
use optimizer_lib::consolidator::DEFAULT_HEADROOM;
use optimizer_lib::estimator::{CostEstimator, DEFAULT_CURRENCY, DEFAULT_HOURS_PER_MONTH};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// Tariff used when none is configured
pub const DEFAULT_PRICE_PER_KWH: f64 = 0.2;

const ENV_PREFIX: &str = "HLO";

/// Electricity tariff settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricitySettings {
    pub price_per_kwh: f64,
    pub currency: String,
    pub hours_per_month: u32,
}

impl Default for ElectricitySettings {
    fn default() -> Self {
        Self {
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
            currency: DEFAULT_CURRENCY.to_string(),
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
        }
    }
}

impl ElectricitySettings {
    pub fn cost_estimator(&self) -> CostEstimator {
        CostEstimator::new(self.price_per_kwh)
            .with_currency(self.currency.clone())
            .with_hours_per_month(self.hours_per_month)
    }
}

/// Consolidation settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidationSettings {
    pub headroom: f64,
}

impl Default for ConsolidationSettings {
    fn default() -> Self {
        Self {
            headroom: DEFAULT_HEADROOM,
        }
    }
}

/// CLI settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    pub electricity: ElectricitySettings,
    pub consolidation: ConsolidationSettings,
}

impl Settings {
    /// Load settings from `path` (or the default location) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        let mut builder = config::Config::builder();
        if let Some(file) = &file {
            tracing::debug!(path = %file.display(), "Loading settings file");
            builder = builder.add_source(config::File::from(file.as_path()).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let source = builder.build().with_context(|| match &file {
            Some(file) => format!("Failed to read settings from {}", file.display()),
            None => "Failed to read settings from environment".to_string(),
        })?;

        Self::from_config(&source)
    }

    fn from_config(source: &config::Config) -> Result<Self> {
        let defaults = Self::default();
        let settings = Settings {
            electricity: ElectricitySettings {
                price_per_kwh: lookup(source, "electricity", "price_per_kwh")?
                    .unwrap_or(defaults.electricity.price_per_kwh),
                currency: lookup(source, "electricity", "currency")?.unwrap_or(defaults.electricity.currency),
                hours_per_month: lookup(source, "electricity", "hours_per_month")?
                    .unwrap_or(defaults.electricity.hours_per_month),
            },
            consolidation: ConsolidationSettings {
                headroom: lookup(source, "consolidation", "headroom")?.unwrap_or(defaults.consolidation.headroom),
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.electricity.hours_per_month > 0,
            "electricity.hours_per_month must be > 0, got {}",
            self.electricity.hours_per_month
        );
        anyhow::ensure!(
            !self.electricity.currency.trim().is_empty(),
            "electricity.currency must be non-empty"
        );
        Ok(())
    }
}

/// Read `section.key`, falling back to a top-level `key`
fn lookup<T: DeserializeOwned>(source: &config::Config, section: &str, key: &str) -> Result<Option<T>> {
    for candidate in [format!("{section}.{key}"), key.to_string()] {
        match source.get::<T>(&candidate) {
            Ok(value) => return Ok(Some(value)),
            Err(config::ConfigError::NotFound(_)) => continue,
            Err(err) => return Err(anyhow::Error::new(err).context(format!("Invalid setting `{candidate}`"))),
        }
    }
    Ok(None)
}

/// Get the default electricity settings path
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(".config").join("hlo").join("electricity.yaml"))
}
