//! Services that connect the billing engine to a [`crate::storage::SubscriptionStore`].

pub mod services;
