//! Job catalogue access: keyword search, batch lookup and click logging.

pub mod search;

use tracing::{debug, error};

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::{Job, Page};

/// Default page size for type-ahead search results.
pub const SEARCH_PAGE_SIZE: u32 = 8;
const SEARCH_SORT: &str = "createdAt,DESC";

#[derive(Clone)]
pub struct JobStore {
    client: ApiClient,
}

impl JobStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Keyword search, newest first.
    pub async fn search(&self, keyword: &str, page: u32, size: u32) -> Result<Vec<Job>, ApiError> {
        let result: Page<Job> = self
            .client
            .get("/jobs/search")
            .query("keyword", keyword)
            .query("page", page)
            .query("size", size)
            .query("sort", SEARCH_SORT)
            .send()
            .await?
            .json()
            .await?;
        debug!("search '{keyword}' returned {} jobs", result.content.len());
        Ok(result.content)
    }

    /// Fetches several postings in one round trip.
    pub async fn batch(&self, ids: &[i64]) -> Result<Vec<Job>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.client
            .get("/jobs/_batch")
            .query("ids", joined)
            .send()
            .await?
            .json()
            .await
    }

    /// Fire-and-forget click event. Failures are logged, never surfaced; a
    /// lost click must not disturb the caller.
    pub fn log_click(&self, job_id: i64) {
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client
                .post("/log/event")
                .query("jobId", job_id)
                .query("event", "click")
                .send()
                .await;
            if let Err(e) = result {
                error!("click event for job {job_id} failed: {e}");
            }
        });
    }
}
