pub mod build_info;
pub mod persistence;

use std::sync::Once;

use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".subscription_core";
const STORE_FILE: &str = "subscriptions.json";
pub const HOME_ENV_VAR: &str = "SUBSCRIPTION_CORE_HOME";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "subscription_core=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Returns the application data directory, defaulting to `~/.subscription_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV_VAR) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Resolves the store file inside `base`, or inside the default data directory.
pub fn store_file_in(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(app_data_dir).join(STORE_FILE)
}
