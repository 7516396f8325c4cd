use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    CvMatch,
    ApplyDue,
    JobPopular,
}

impl NotificationType {
    /// The query-string value the alarm endpoint expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::CvMatch => "CV_MATCH",
            NotificationType::ApplyDue => "APPLY_DUE",
            NotificationType::JobPopular => "JOB_POPULAR",
        }
    }
}

/// A job reference carried inside a CV-match notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationJobItem {
    pub job_id: i64,
    pub rank: i32,
    pub clicked: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationParams {
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub top_n: u32,
}

/// An in-app notification ("alarm" on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub created_at: String,
    pub alarm_text: String,
    pub user_id: i64,
    pub read: bool,
    pub read_at: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub dedupe_key: String,
    pub status: String,
    pub sent_at: String,
    #[serde(default)]
    pub jobs: Vec<NotificationJobItem>,
    pub title_code: Option<String>,
    #[serde(default)]
    pub params: NotificationParams,
    /// CV that produced a `CV_MATCH` notification.
    pub cv_id: Option<i64>,
}
