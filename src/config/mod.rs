//! Key/value configuration consumed by the spending and subscription services.
//!
//! Values are stored as strings. Reads are lenient: anything absent or
//! malformed falls back to its default. Writes are strict.

use serde::{Deserialize, Serialize};

use crate::billing::period::{validate_cutoff_day, DEFAULT_CUTOFF_DAY};
use crate::domain::DEFAULT_CURRENCY;
use crate::errors::{Result, TrackerError};
use crate::storage::SubscriptionStore;

pub const MONTH_CUTOFF_DAY_KEY: &str = "month_cutoff_day";
pub const MONTHLY_SALARY_KEY: &str = "monthly_salary";
pub const DEFAULT_CURRENCY_KEY: &str = "default_currency";

pub const KNOWN_KEYS: [&str; 3] = [
    MONTH_CUTOFF_DAY_KEY,
    MONTHLY_SALARY_KEY,
    DEFAULT_CURRENCY_KEY,
];

/// Resolved configuration values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub month_cutoff_day: u32,
    /// Zero means no salary is configured.
    pub monthly_salary: f64,
    pub default_currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            month_cutoff_day: DEFAULT_CUTOFF_DAY,
            monthly_salary: 0.0,
            default_currency: DEFAULT_CURRENCY.into(),
        }
    }
}

impl Settings {
    /// Builds settings from raw lookups, defaulting every absent or malformed value.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            month_cutoff_day: lenient_cutoff_day(lookup(MONTH_CUTOFF_DAY_KEY).as_deref()),
            monthly_salary: lenient_salary(lookup(MONTHLY_SALARY_KEY).as_deref()),
            default_currency: lookup(DEFAULT_CURRENCY_KEY)
                .map(|value| value.trim().to_uppercase())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.into()),
        }
    }

    pub fn has_salary(&self) -> bool {
        self.monthly_salary > 0.0
    }
}

fn lenient_cutoff_day(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .and_then(|day| validate_cutoff_day(day).ok())
        .unwrap_or(DEFAULT_CUTOFF_DAY)
}

fn lenient_salary(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|salary| salary.is_finite() && *salary >= 0.0)
        .unwrap_or(0.0)
}

/// Reads and writes configuration through a [`SubscriptionStore`].
pub struct ConfigService<'a> {
    store: &'a dyn SubscriptionStore,
}

impl<'a> ConfigService<'a> {
    pub fn new(store: &'a dyn SubscriptionStore) -> Self {
        Self { store }
    }

    /// Resolves all settings. Storage failures fall back to defaults.
    pub fn settings(&self) -> Settings {
        Settings::from_lookup(|key| match self.store.get_config(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "config lookup failed; using default");
                None
            }
        })
    }

    pub fn month_cutoff_day(&self) -> u32 {
        self.settings().month_cutoff_day
    }

    pub fn monthly_salary(&self) -> f64 {
        self.settings().monthly_salary
    }

    pub fn set_month_cutoff_day(&self, day: u32) -> Result<()> {
        validate_cutoff_day(day)?;
        self.store.set_config(MONTH_CUTOFF_DAY_KEY, &day.to_string())
    }

    pub fn set_monthly_salary(&self, salary: f64) -> Result<()> {
        if !salary.is_finite() || salary < 0.0 {
            return Err(TrackerError::InvalidArgument(
                "salary cannot be negative".into(),
            ));
        }
        self.store
            .set_config(MONTHLY_SALARY_KEY, &format!("{salary:.2}"))
    }

    pub fn set_default_currency(&self, code: &str) -> Result<()> {
        let code = code.trim();
        if code.is_empty() {
            return Err(TrackerError::InvalidArgument(
                "currency code cannot be empty".into(),
            ));
        }
        self.store
            .set_config(DEFAULT_CURRENCY_KEY, &code.to_uppercase())
    }

    /// Parses `value` for `key` and stores it through the matching setter.
    pub fn set_from_text(&self, key: &str, value: &str) -> Result<()> {
        match key {
            MONTH_CUTOFF_DAY_KEY => {
                let day = value.trim().parse::<u32>().map_err(|_| {
                    TrackerError::InvalidArgument(format!("`{value}` is not a valid day"))
                })?;
                self.set_month_cutoff_day(day)
            }
            MONTHLY_SALARY_KEY => {
                let salary = value.trim().parse::<f64>().map_err(|_| {
                    TrackerError::InvalidArgument(format!("`{value}` is not a valid amount"))
                })?;
                self.set_monthly_salary(salary)
            }
            DEFAULT_CURRENCY_KEY => self.set_default_currency(value),
            other => Err(TrackerError::Config(format!(
                "unknown key `{other}` (expected one of: {})",
                KNOWN_KEYS.join(", ")
            ))),
        }
    }
}
