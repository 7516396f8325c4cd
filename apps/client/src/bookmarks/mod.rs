//! Bookmark store with optimistic add/remove.
//!
//! Every cached entry carries an explicit mark: `Confirmed` (server truth),
//! `PendingAdd` (shown before the add resolves) or `PendingRemove` (hidden
//! before the remove resolves). A failed mutation resyncs the whole list from
//! the server; the post-condition is "local equals server truth", not "local
//! equals pre-call state".

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use tracing::warn;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Confirmed,
    PendingAdd,
    PendingRemove,
}

#[derive(Debug, Clone)]
struct Entry {
    job: Job,
    mark: Mark,
}

#[derive(Clone)]
pub struct BookmarkStore {
    client: ApiClient,
    entries: Arc<Mutex<Option<Vec<Entry>>>>,
}

impl BookmarkStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            entries: Arc::new(Mutex::new(None)),
        }
    }

    /// Authoritative fetch. Replaces the cache wholesale; any pending marks
    /// are dropped in favor of server truth.
    pub async fn fetch(&self) -> Result<Vec<Job>, ApiError> {
        let jobs: Vec<Job> = self.client.get("/bookmark/me").send().await?.json().await?;
        self.replace_confirmed(&jobs);
        Ok(jobs)
    }

    /// The list as the user should see it right now: confirmed entries plus
    /// pending adds, minus pending removes. `None` if never fetched.
    pub fn bookmarks(&self) -> Option<Vec<Job>> {
        let entries = self.entries.lock().expect("bookmark cache poisoned");
        entries.as_ref().map(|list| {
            list.iter()
                .filter(|e| e.mark != Mark::PendingRemove)
                .map(|e| e.job.clone())
                .collect()
        })
    }

    /// Adds a bookmark optimistically: the job appears in the local list
    /// before the call resolves. On failure the list is resynced.
    pub async fn add(&self, job: &Job) -> Result<StatusCode, ApiError> {
        {
            let mut entries = self.entries.lock().expect("bookmark cache poisoned");
            let list = entries.get_or_insert_with(Vec::new);
            if !list.iter().any(|e| e.job.id == job.id) {
                let mut job = job.clone();
                job.is_bookmarked = true;
                list.push(Entry {
                    job,
                    mark: Mark::PendingAdd,
                });
            }
        }

        let result = async {
            self.client
                .post("/bookmark/add")
                .query("JobId", job.id)
                .send()
                .await?
                .error_for_status()
                .await
        }
        .await;

        match result {
            Ok(response) => {
                self.confirm(job.id);
                Ok(response.status())
            }
            Err(e) => {
                warn!("bookmark add failed for job {}: {e}", job.id);
                self.resync().await;
                Err(e)
            }
        }
    }

    /// Removes a bookmark optimistically: the job disappears from the local
    /// list before the call resolves. On failure the list is resynced.
    pub async fn remove(&self, job_id: i64) -> Result<StatusCode, ApiError> {
        {
            let mut entries = self.entries.lock().expect("bookmark cache poisoned");
            if let Some(list) = entries.as_mut() {
                for entry in list.iter_mut().filter(|e| e.job.id == job_id) {
                    entry.mark = Mark::PendingRemove;
                }
            }
        }

        let result = async {
            self.client
                .delete("/bookmark/remove")
                .query("JobId", job_id)
                .send()
                .await?
                .error_for_status()
                .await
        }
        .await;

        match result {
            Ok(response) => {
                let mut entries = self.entries.lock().expect("bookmark cache poisoned");
                if let Some(list) = entries.as_mut() {
                    list.retain(|e| e.job.id != job_id);
                }
                Ok(response.status())
            }
            Err(e) => {
                warn!("bookmark remove failed for job {job_id}: {e}");
                self.resync().await;
                Err(e)
            }
        }
    }

    fn confirm(&self, job_id: i64) {
        let mut entries = self.entries.lock().expect("bookmark cache poisoned");
        if let Some(list) = entries.as_mut() {
            for entry in list.iter_mut().filter(|e| e.job.id == job_id) {
                entry.mark = Mark::Confirmed;
            }
        }
    }

    fn replace_confirmed(&self, jobs: &[Job]) {
        let mut entries = self.entries.lock().expect("bookmark cache poisoned");
        *entries = Some(
            jobs.iter()
                .map(|job| Entry {
                    job: job.clone(),
                    mark: Mark::Confirmed,
                })
                .collect(),
        );
    }

    /// Re-fetch server truth after a failed mutation. A resync failure leaves
    /// the cache as-is; the next successful fetch reconciles it.
    async fn resync(&self) {
        if let Err(e) = self.fetch().await {
            warn!("bookmark resync failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::models::sample_job;
    use crate::session::{MemorySessionStorage, PersistedSession, SessionStorage};

    async fn store(server: &MockServer) -> BookmarkStore {
        let storage = Arc::new(MemorySessionStorage::default());
        storage
            .save(&PersistedSession {
                access_token: Some("tok".into()),
            })
            .unwrap();
        let config = Config {
            api_base_url: server.uri(),
            state_dir: std::env::temp_dir(),
            http_timeout_secs: 5,
            rust_log: "info".into(),
        };
        BookmarkStore::new(ApiClient::new(&config, storage).unwrap())
    }

    #[tokio::test]
    async fn test_add_is_visible_before_the_call_resolves() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        Mock::given(method("POST"))
            .and(path("/bookmark/add"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
            .mount(&server)
            .await;

        let job = sample_job(7, "Acme", "Backend Engineer");
        let pending = {
            let store = store.clone();
            let job = job.clone();
            tokio::spawn(async move { store.add(&job).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Optimistic: present while the request is still in flight.
        let visible = store.bookmarks().unwrap();
        assert!(visible.iter().any(|j| j.id == 7 && j.is_bookmarked));

        let status = pending.await.unwrap().unwrap();
        assert_eq!(status.as_u16(), 200);
    }

    #[tokio::test]
    async fn test_failed_add_resyncs_to_server_truth() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        Mock::given(method("POST"))
            .and(path("/bookmark/add"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let server_truth = vec![sample_job(1, "Nimbus", "Data Engineer")];
        Mock::given(method("GET"))
            .and(path("/bookmark/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&server_truth))
            .mount(&server)
            .await;

        let job = sample_job(7, "Acme", "Backend Engineer");
        let err = store.add(&job).await.unwrap_err();
        assert_eq!(err.status(), Some(500));

        // Post-condition: local list equals server truth, not pre-call state.
        let visible = store.bookmarks().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[tokio::test]
    async fn test_remove_hides_entry_then_drops_it() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        let server_truth = vec![
            sample_job(1, "Nimbus", "Data Engineer"),
            sample_job(2, "Acme", "Backend Engineer"),
        ];
        Mock::given(method("GET"))
            .and(path("/bookmark/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&server_truth))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/bookmark/remove"))
            .and(query_param("JobId", "2"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        store.fetch().await.unwrap();
        let status = store.remove(2).await.unwrap();
        assert_eq!(status.as_u16(), 200);

        let visible = store.bookmarks().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[tokio::test]
    async fn test_duplicate_add_does_not_double_insert() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        Mock::given(method("POST"))
            .and(path("/bookmark/add"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let job = sample_job(7, "Acme", "Backend Engineer");
        store.add(&job).await.unwrap();
        store.add(&job).await.unwrap();

        assert_eq!(store.bookmarks().unwrap().len(), 1);
    }
}
