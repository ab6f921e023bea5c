//! CSV and JSON export of the subscription set.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Subscription, DATE_FORMAT};
use crate::errors::{Result, TrackerError};

pub const CSV_HEADER: [&str; 8] = [
    "ID",
    "Name",
    "Amount",
    "Currency",
    "Billing Cycle",
    "Next Renewal Date",
    "Created At",
    "Updated At",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(TrackerError::InvalidArgument(format!(
                "unsupported export format `{other}` (use csv or json)"
            ))),
        }
    }
}

/// Flat record written by the JSON exporter.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub billing_cycle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_renewal_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Subscription> for ExportRecord {
    fn from(sub: &Subscription) -> Self {
        Self {
            id: sub.id,
            name: sub.name.clone(),
            amount: sub.amount,
            currency: sub.currency.clone(),
            billing_cycle: sub.billing_cycle.as_str().to_string(),
            next_renewal_date: sub
                .next_renewal_date
                .map(|date| date.format(DATE_FORMAT).to_string()),
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

/// Writes `subscriptions` in `format` and returns how many were written.
/// An empty set writes nothing.
pub fn export<W: Write>(
    subscriptions: &[Subscription],
    writer: &mut W,
    format: ExportFormat,
) -> Result<usize> {
    if subscriptions.is_empty() {
        return Ok(0);
    }
    match format {
        ExportFormat::Csv => write_csv(subscriptions, writer)?,
        ExportFormat::Json => write_json(subscriptions, writer)?,
    }
    writer.flush()?;
    tracing::debug!(count = subscriptions.len(), %format, "exported subscriptions");
    Ok(subscriptions.len())
}

fn write_csv<W: Write>(subscriptions: &[Subscription], writer: &mut W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(&mut *writer);

    csv.write_record(CSV_HEADER)?;
    for sub in subscriptions {
        let id = sub.id.to_string();
        let amount = format!("{:.2}", sub.amount);
        let renewal = sub.renewal_label();
        let created = sub.created_at.to_rfc3339();
        let updated = sub.updated_at.to_rfc3339();
        csv.write_record([
            id.as_str(),
            sub.name.as_str(),
            amount.as_str(),
            sub.currency.as_str(),
            sub.billing_cycle.as_str(),
            renewal.as_str(),
            created.as_str(),
            updated.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

fn write_json<W: Write>(subscriptions: &[Subscription], writer: &mut W) -> Result<()> {
    let records: Vec<ExportRecord> = subscriptions.iter().map(ExportRecord::from).collect();
    serde_json::to_writer_pretty(&mut *writer, &records)?;
    writeln!(writer)?;
    Ok(())
}
