#![doc(test(attr(deny(warnings))))]

//! Subscription Core tracks recurring subscriptions and reports what renews
//! inside a salary-aligned billing period.

pub mod billing;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and logs the build metadata at debug level.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!(build = %utils::build_info::current().summary(), "Subscription Core tracing initialized.");
    });
}
