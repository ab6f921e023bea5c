use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::billing::{parse_month, SpendingSummary};
use crate::config::{ConfigService, KNOWN_KEYS};
use crate::core::services::{SpendingService, SubscriptionService};
use crate::domain::{BillingCycle, Subscription, SubscriptionDraft};
use crate::errors::CliError;
use crate::export::{export as export_subscriptions, ExportFormat};
use crate::storage::SubscriptionStore;

use super::output;

type CommandResult = Result<(), CliError>;

fn require<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CliError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CliError::Input(format!("usage: {usage}")))
}

fn parse_id(text: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(text.trim())
        .map_err(|_| CliError::Input(format!("`{text}` is not a valid subscription id")))
}

fn print_row(sub: &Subscription) {
    output::line(format!(
        "  {}  {:<24} {:>10.2} {:<4} {:<8} {}",
        sub.id,
        sub.name,
        sub.amount,
        sub.currency,
        sub.billing_cycle,
        sub.renewal_label()
    ));
}

pub(super) fn list(store: &dyn SubscriptionStore, args: &[&str]) -> CommandResult {
    let filter = args
        .first()
        .map(|text| text.parse::<BillingCycle>())
        .transpose()?;
    let subscriptions = SubscriptionService::new(store).list(filter)?;
    if subscriptions.is_empty() {
        output::info("No subscriptions found.");
        return Ok(());
    }
    output::section("Subscriptions");
    subscriptions.iter().for_each(print_row);
    Ok(())
}

pub(super) fn add(store: &dyn SubscriptionStore, args: &[&str]) -> CommandResult {
    const USAGE: &str = "add <name> <amount> <monthly|yearly> <YYYY-MM-DD> [currency]";
    let name = require(args, 0, USAGE)?;
    let amount_text = require(args, 1, USAGE)?;
    let amount = amount_text
        .trim()
        .parse::<f64>()
        .map_err(|_| CliError::Input(format!("`{amount_text}` is not a valid amount")))?;
    let draft = SubscriptionDraft {
        name: name.to_string(),
        amount,
        currency: args.get(4).map(|code| code.to_string()),
        billing_cycle: require(args, 2, USAGE)?.to_string(),
        next_renewal_date: require(args, 3, USAGE)?.to_string(),
    };
    let created = SubscriptionService::new(store).create(&draft)?;
    output::success(format!("Added `{}` ({})", created.name, created.id));
    Ok(())
}

pub(super) fn remove(store: &dyn SubscriptionStore, args: &[&str]) -> CommandResult {
    let id = parse_id(require(args, 0, "remove <id>")?)?;
    let service = SubscriptionService::new(store);
    let removed = service.get(id)?;
    service.delete(id)?;
    output::success(format!("Removed {}", removed.display_label()));
    Ok(())
}

pub(super) fn renew(store: &dyn SubscriptionStore, args: &[&str]) -> CommandResult {
    const USAGE: &str = "renew <id> <YYYY-MM-DD>";
    let id = parse_id(require(args, 0, USAGE)?)?;
    let date = SubscriptionService::new(store).update_renewal_date(id, require(args, 1, USAGE)?)?;
    output::success(format!("Next renewal of {id} set to {date}"));
    Ok(())
}

pub(super) fn summary(store: &dyn SubscriptionStore, today: NaiveDate, args: &[&str]) -> CommandResult {
    let service = SpendingService::new(store);
    let summary = match args.first() {
        None => service.calculate_for_today(today)?,
        Some(month_text) => {
            let month = parse_month(month_text)?;
            let year = match args.get(1) {
                Some(text) => text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| CliError::Input(format!("`{text}` is not a valid year")))?,
                None => today.year(),
            };
            service.calculate_for_month(year, month)?
        }
    };
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &SpendingSummary) {
    let period = &summary.period;
    output::section(format!(
        "Spending {} ({} to {})",
        period.label(),
        period.start,
        period.end
    ));
    if summary.item_count() == 0 {
        output::info("No renewals in this period.");
    }
    if !summary.monthly_items.is_empty() {
        output::line("Monthly:");
        summary.monthly_items.iter().for_each(print_row);
    }
    if !summary.yearly_items.is_empty() {
        output::line("Yearly:");
        summary.yearly_items.iter().for_each(print_row);
    }
    output::line(format!("Monthly total:   {:.2}", summary.monthly_total));
    output::line(format!("Yearly total:    {:.2}", summary.yearly_total));
    output::line(format!("Grand total:     {:.2}", summary.grand_total));
    output::line(format!("Average monthly: {:.2}", summary.average_monthly));
    if let (Some(salary), Some(remaining)) = (summary.monthly_salary, summary.remaining) {
        output::line(format!("Salary:          {salary:.2}"));
        if summary.is_over_budget() {
            output::warning(format!("Over budget by {:.2}", -remaining));
        } else {
            output::success(format!("Remaining: {remaining:.2}"));
        }
    }
}

pub(super) fn annual(store: &dyn SubscriptionStore) -> CommandResult {
    let total = SpendingService::new(store).annual_total()?;
    output::info(format!("Annual total: {total:.2}"));
    Ok(())
}

pub(super) fn advance(store: &dyn SubscriptionStore, today: NaiveDate) -> CommandResult {
    let report = SubscriptionService::new(store).advance_renewal_dates(today)?;
    for update in &report.updated {
        output::info(format!("{}: {} -> {}", update.id, update.previous, update.next));
    }
    for failure in &report.failures {
        output::warning(format!("{} ({}): {}", failure.name, failure.id, failure.error));
    }
    if report.is_clean() {
        output::success(format!("Advanced {} renewal date(s)", report.updated.len()));
        Ok(())
    } else {
        Err(CliError::Command(format!(
            "{} renewal date(s) could not be advanced",
            report.failures.len()
        )))
    }
}

pub(super) fn config(store: &dyn SubscriptionStore, args: &[&str]) -> CommandResult {
    let service = ConfigService::new(store);
    match args.first().copied() {
        None => {
            let settings = service.settings();
            output::section("Configuration");
            output::line(format!("month_cutoff_day = {}", settings.month_cutoff_day));
            if settings.has_salary() {
                output::line(format!("monthly_salary = {:.2}", settings.monthly_salary));
            } else {
                output::line("monthly_salary = (not set)");
            }
            output::line(format!("default_currency = {}", settings.default_currency));
            Ok(())
        }
        Some("set") => {
            const USAGE: &str = "config set <key> <value>";
            let key = require(args, 1, USAGE)?;
            let value = require(args, 2, USAGE)?;
            service.set_from_text(key, value)?;
            output::success(format!("{key} updated"));
            Ok(())
        }
        Some(other) => Err(CliError::Input(format!(
            "unknown config action `{other}`; use `config set <key> <value>` with one of: {}",
            KNOWN_KEYS.join(", ")
        ))),
    }
}

pub(super) fn export(store: &dyn SubscriptionStore, args: &[&str]) -> CommandResult {
    let format = require(args, 0, "export <csv|json> [path]")?.parse::<ExportFormat>()?;
    let subscriptions = SubscriptionService::new(store).list(None)?;
    if subscriptions.is_empty() {
        output::warning("No subscriptions to export.");
        return Ok(());
    }
    match args.get(1) {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(Path::new(path))?);
            let count = export_subscriptions(&subscriptions, &mut writer, format)?;
            output::success(format!("Exported {count} subscription(s) to {path}"));
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            export_subscriptions(&subscriptions, &mut handle, format)?;
        }
    }
    Ok(())
}
