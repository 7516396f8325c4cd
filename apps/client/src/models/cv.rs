use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded CV as listed by `GET /cv/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvEntry {
    pub id: i64,
    pub user_id: i64,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}
