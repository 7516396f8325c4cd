//! CV store — the user's uploaded CVs, the selected one, and cached
//! summaries. Summaries are expensive server-side, so they are requested at
//! most once per CV and kept for the session.

pub mod upload;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::error;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::CvEntry;

#[derive(Default)]
struct CvState {
    list: Vec<CvEntry>,
    selected: Option<i64>,
    summaries: HashMap<i64, String>,
}

#[derive(Clone)]
pub struct CvStore {
    client: ApiClient,
    state: Arc<Mutex<CvState>>,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

impl CvStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(CvState::default())),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<CvEntry>, ApiError> {
        let list: Vec<CvEntry> = self.client.get("/cv/me").send().await?.json().await?;
        self.state.lock().expect("cv cache poisoned").list = list.clone();
        Ok(list)
    }

    pub fn list(&self) -> Vec<CvEntry> {
        self.state.lock().expect("cv cache poisoned").list.clone()
    }

    pub fn selected(&self) -> Option<i64> {
        self.state.lock().expect("cv cache poisoned").selected
    }

    /// Fetches the CV list and selects the most recently uploaded one.
    /// Errors if the user has no CVs.
    pub async fn select_latest(&self) -> Result<i64, ApiError> {
        let list = self.fetch().await?;
        let latest = list
            .iter()
            .max_by_key(|cv| cv.uploaded_at)
            .map(|cv| cv.id)
            .ok_or_else(|| ApiError::Api {
                status: 404,
                message: "no CV uploaded".to_string(),
            })?;
        self.state.lock().expect("cv cache poisoned").selected = Some(latest);
        Ok(latest)
    }

    /// Returns the summary for a CV, serving from cache when available.
    pub async fn summary(&self, cv_id: i64) -> Result<String, ApiError> {
        if let Some(cached) = self
            .state
            .lock()
            .expect("cv cache poisoned")
            .summaries
            .get(&cv_id)
        {
            return Ok(cached.clone());
        }

        let result: Result<SummaryResponse, ApiError> = async {
            self.client
                .post("/cv/summary-cv")
                .query("cvId", cv_id)
                .send()
                .await?
                .json()
                .await
        }
        .await;

        match result {
            Ok(response) => {
                self.state
                    .lock()
                    .expect("cv cache poisoned")
                    .summaries
                    .insert(cv_id, response.summary.clone());
                Ok(response.summary)
            }
            Err(e) => {
                error!("CV summary fetch failed for cv {cv_id}: {e}");
                Err(e)
            }
        }
    }

    pub async fn delete(&self, cv_id: i64) -> Result<StatusCode, ApiError> {
        let response = self
            .client
            .delete("/cv/delete-cv")
            .query("cvId", cv_id)
            .send()
            .await?
            .error_for_status()
            .await?;
        let mut state = self.state.lock().expect("cv cache poisoned");
        state.list.retain(|cv| cv.id != cv_id);
        state.summaries.remove(&cv_id);
        if state.selected == Some(cv_id) {
            state.selected = None;
        }
        Ok(response.status())
    }

    pub async fn delete_all(&self) -> Result<StatusCode, ApiError> {
        let response = self
            .client
            .delete("/cv/delete-all-cvs")
            .send()
            .await?
            .error_for_status()
            .await?;
        *self.state.lock().expect("cv cache poisoned") = CvState::default();
        Ok(response.status())
    }
}
