use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::errors::{Result, TrackerError};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(TrackerError::Validation(format!(
                "billing cycle must be 'monthly' or 'yearly', got `{other}`"
            ))),
        }
    }
}

/// A recurring charge.
///
/// For monthly subscriptions the day of `next_renewal_date` is the recurring
/// part; the month and year only record the latest known occurrence. Yearly
/// subscriptions recur on the full month and day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_renewal_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
        billing_cycle: BillingCycle,
        next_renewal_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            currency: currency.into(),
            billing_cycle,
            next_renewal_date: Some(next_renewal_date),
            created_at: now,
            updated_at: now,
        }
    }

    /// `Name (9.99 USD monthly)`.
    pub fn display_label(&self) -> String {
        format!(
            "{} ({:.2} {} {})",
            self.name, self.amount, self.currency, self.billing_cycle
        )
    }

    pub fn renewal_label(&self) -> String {
        self.next_renewal_date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl Identifiable for Subscription {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Subscription {
    fn name(&self) -> &str {
        &self.name
    }
}


/// Unvalidated input for creating or replacing a subscription.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionDraft {
    pub name: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub billing_cycle: String,
    pub next_renewal_date: String,
}

/// Validated fields ready to be written to a [`Subscription`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub name: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub billing_cycle: BillingCycle,
    pub next_renewal_date: NaiveDate,
}

impl SubscriptionDraft {
    pub fn validate(&self) -> Result<ValidatedDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TrackerError::Validation("name is required".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(TrackerError::Validation("amount must be positive".into()));
        }
        let billing_cycle = self.billing_cycle.parse::<BillingCycle>()?;
        let next_renewal_date = parse_renewal_date(&self.next_renewal_date)?;
        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_uppercase);

        Ok(ValidatedDraft {
            name: name.to_string(),
            amount: self.amount,
            currency,
            billing_cycle,
            next_renewal_date,
        })
    }
}

/// Parses a `YYYY-MM-DD` renewal date supplied by a caller.
pub fn parse_renewal_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::Validation("renewal date is required".into()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|err| {
        TrackerError::Validation(format!(
            "invalid date `{trimmed}`, use YYYY-MM-DD: {err}"
        ))
    })
}

/// Stored renewal dates that fail to parse, or are not strings at all, load as
/// `None` so a single bad record does not block reading the rest.
fn deserialize_lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let text = match raw {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::String(text) => text,
        other => {
            tracing::warn!(value = %other, "ignoring non-text renewal date");
            return Ok(None);
        }
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => Ok(Some(date)),
        Err(err) => {
            tracing::warn!(value = %trimmed, error = %err, "ignoring unparsable renewal date");
            Ok(None)
        }
    }
}
