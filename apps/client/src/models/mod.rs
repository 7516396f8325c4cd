//! Wire models for the backend API. Field names follow the service's
//! camelCase JSON; everything derives `Serialize`/`Deserialize` so stores and
//! tests can round-trip fixtures.

mod admin;
mod application;
mod billing;
mod cv;
mod job;
mod notification;

use serde::{Deserialize, Serialize};

pub use admin::{PlanDistribution, ServerStatus};
pub use application::{Application, ApplicationEdit, APPLY_STATUS_OPTIONS};
pub use billing::{Amount, CancelPayment, ConfirmPayment, PaymentVerdict, SaveAmount};
pub use cv::CvEntry;
pub use job::{Job, Region};
pub use notification::{Notification, NotificationJobItem, NotificationParams, NotificationType};

#[cfg(test)]
pub(crate) use job::sample_job;

/// Spring-style page envelope used by the search and alarm endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
}
