use serde::{Deserialize, Serialize};

/// Administrative region attached to a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: i64,
    pub code: String,
    pub city: String,
    pub district: Option<String>,
}

/// A job posting as returned by search, batch and bookmark endpoints.
/// Ranking fields (`score`, `cosineScore`, `bm25Score`) are present on
/// search/recommendation results and absent elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    #[serde(default)]
    pub regions: Vec<Region>,
    pub company_name: String,
    pub title: String,
    pub department: Option<String>,
    pub require_experience: Option<String>,
    pub job_type: Option<String>,
    pub requirements: Option<String>,
    pub preferred_qualifications: Option<String>,
    pub ideal_candidate: Option<String>,
    pub job_description: Option<String>,
    pub apply_start_date: Option<String>,
    pub apply_end_date: Option<String>,
    pub is_public: bool,
    pub created_at: String,
    pub last_updated_at: Option<String>,
    pub expired_at: Option<String>,
    pub archived_at: Option<String>,
    pub raw_jobs_text: Option<String>,
    pub url: Option<String>,
    pub favicon: Option<String>,
    pub region_text: Option<String>,
    pub score: Option<f64>,
    pub cosine_score: Option<f64>,
    pub bm25_score: Option<f64>,
    #[serde(default)]
    pub is_bookmarked: bool,
}

#[cfg(test)]
pub(crate) fn sample_job(id: i64, company: &str, title: &str) -> Job {
    Job {
        id,
        regions: Vec::new(),
        company_name: company.to_string(),
        title: title.to_string(),
        department: None,
        require_experience: None,
        job_type: None,
        requirements: None,
        preferred_qualifications: None,
        ideal_candidate: None,
        job_description: None,
        apply_start_date: None,
        apply_end_date: None,
        is_public: true,
        created_at: "2025-06-01".to_string(),
        last_updated_at: None,
        expired_at: None,
        archived_at: None,
        raw_jobs_text: None,
        url: None,
        favicon: None,
        region_text: None,
        score: None,
        cosine_score: None,
        bm25_score: None,
        is_bookmarked: false,
    }
}
