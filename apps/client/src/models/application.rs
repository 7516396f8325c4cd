use serde::{Deserialize, Serialize};

/// Application statuses the service understands. The field itself stays a
/// free string on the wire; this list drives filter UIs and CLI validation.
pub const APPLY_STATUS_OPTIONS: [&str; 7] = [
    "PREPARING",
    "APPLIED",
    "DOCUMENT_REVIEW",
    "CODING_TEST",
    "INTERVIEW",
    "ACCEPTED",
    "REJECTED",
];

/// One tracked job application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: i64,
    pub job_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub apply_due_date: Option<String>,
    pub apply_status: String,
    pub note: Option<String>,
    pub created_at: String,
}

/// Body of `PUT /applications`: the editable subset of an application.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEdit {
    pub apply_status: String,
    pub note: Option<String>,
    pub apply_due_date: Option<String>,
}
