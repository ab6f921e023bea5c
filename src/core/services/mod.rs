pub mod spending_service;
pub mod subscription_service;

pub use crate::config::ConfigService;
pub use spending_service::SpendingService;
pub use subscription_service::{RenewalFailure, RenewalReport, SubscriptionService};

pub type ServiceResult<T> = crate::errors::Result<T>;
