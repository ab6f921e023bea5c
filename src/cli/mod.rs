//! Non-interactive command dispatcher behind `subscription_core_cli`.

mod commands;
pub mod output;

use chrono::{Local, NaiveDate};
use strsim::levenshtein;

use crate::core::services::SubscriptionService;
use crate::errors::CliError;
use crate::storage::{JsonStorage, SubscriptionStore};

/// Describes one top-level command for help output and suggestions.
#[derive(Debug, Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "list",
        usage: "list [monthly|yearly]",
        description: "List subscriptions sorted by name",
    },
    CommandEntry {
        name: "add",
        usage: "add <name> <amount> <monthly|yearly> <YYYY-MM-DD> [currency]",
        description: "Add a subscription",
    },
    CommandEntry {
        name: "remove",
        usage: "remove <id>",
        description: "Delete a subscription",
    },
    CommandEntry {
        name: "renew",
        usage: "renew <id> <YYYY-MM-DD>",
        description: "Set the next renewal date of a subscription",
    },
    CommandEntry {
        name: "summary",
        usage: "summary [month] [year]",
        description: "Show spending for a billing period (default: current)",
    },
    CommandEntry {
        name: "annual",
        usage: "annual",
        description: "Show the yearly cost of all subscriptions",
    },
    CommandEntry {
        name: "advance",
        usage: "advance",
        description: "Roll past renewal dates forward to today",
    },
    CommandEntry {
        name: "config",
        usage: "config [set <key> <value>]",
        description: "Show or change configuration",
    },
    CommandEntry {
        name: "export",
        usage: "export <csv|json> [path]",
        description: "Export subscriptions to stdout or a file",
    },
    CommandEntry {
        name: "help",
        usage: "help",
        description: "Show this overview",
    },
];

/// Runs one command from `args` (program name excluded) against the default store.
pub fn run_cli(args: &[String]) -> Result<(), CliError> {
    let Some(command) = args.first() else {
        print_usage();
        return Err(CliError::Input("missing command".into()));
    };
    let command = command.to_lowercase();

    if command == "help" {
        print_usage();
        return Ok(());
    }
    if !COMMANDS.iter().any(|entry| entry.name == command) {
        suggest_command(&command);
        return Err(CliError::Command(format!("unknown command `{command}`")));
    }

    let store = JsonStorage::new_default()?;
    let today = Local::now().date_naive();
    run_with_store(&store, today, &command, &args[1..])
}

/// Dispatches `command` against `store`, treating `today` as the current date.
pub fn run_with_store(
    store: &dyn SubscriptionStore,
    today: NaiveDate,
    command: &str,
    args: &[String],
) -> Result<(), CliError> {
    if command != "advance" {
        advance_quietly(store, today);
    }
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match command {
        "list" => commands::list(store, &args),
        "add" => commands::add(store, &args),
        "remove" => commands::remove(store, &args),
        "renew" => commands::renew(store, &args),
        "summary" => commands::summary(store, today, &args),
        "annual" => commands::annual(store),
        "advance" => commands::advance(store, today),
        "config" => commands::config(store, &args),
        "export" => commands::export(store, &args),
        "help" => {
            print_usage();
            Ok(())
        }
        other => {
            suggest_command(other);
            Err(CliError::Command(format!("unknown command `{other}`")))
        }
    }
}

fn advance_quietly(store: &dyn SubscriptionStore, today: NaiveDate) {
    match SubscriptionService::new(store).advance_renewal_dates(today) {
        Ok(report) => {
            for failure in &report.failures {
                output::warning(format!(
                    "Could not advance renewal date of `{}`: {}",
                    failure.name, failure.error
                ));
            }
        }
        Err(err) => output::warning(format!("Skipping renewal date update: {err}")),
    }
}

/// Closest known command within an edit distance of three.
pub fn closest_command(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|entry| (levenshtein(entry.name, input), entry.name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}

fn suggest_command(input: &str) {
    output::warning(format!(
        "Unknown command `{input}`. Run `help` to see available commands."
    ));
    if let Some(best) = closest_command(input) {
        output::info(format!("Suggestion: `{best}`?"));
    }
}

pub fn print_usage() {
    output::section(format!(
        "subscription_core_cli {}",
        crate::utils::build_info::current().version
    ));
    for entry in COMMANDS {
        output::line(format!("  {:<62} {}", entry.usage, entry.description));
    }
}
