//! Type-ahead search: a debouncer that collapses keystroke bursts into one
//! request, and the locally persisted search history.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::jobs::{JobStore, SEARCH_PAGE_SIZE};
use crate::models::Job;

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);
/// Queries shorter than this never hit the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Collapses a stream of query edits into at most one in-flight search.
/// Each new input aborts the previous pending one; results arrive on a watch
/// channel so the consumer only ever sees the latest outcome.
pub struct SearchDebouncer {
    jobs: JobStore,
    delay: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
    results_tx: Arc<watch::Sender<Vec<Job>>>,
}

impl SearchDebouncer {
    pub fn new(jobs: JobStore) -> Self {
        Self::with_delay(jobs, DEBOUNCE_DELAY)
    }

    pub fn with_delay(jobs: JobStore, delay: Duration) -> Self {
        let (results_tx, _) = watch::channel(Vec::new());
        Self {
            jobs,
            delay,
            task: Mutex::new(None),
            results_tx: Arc::new(results_tx),
        }
    }

    pub fn results(&self) -> watch::Receiver<Vec<Job>> {
        self.results_tx.subscribe()
    }

    /// Feeds one edit of the query. Too-short queries clear the results and
    /// cancel any pending search.
    pub fn input(&self, query: &str) {
        let mut task = self.task.lock().expect("debounce task poisoned");
        if let Some(previous) = task.take() {
            previous.abort();
        }

        if query.chars().count() < MIN_QUERY_LEN {
            let _ = self.results_tx.send(Vec::new());
            return;
        }

        let jobs = self.jobs.clone();
        let delay = self.delay;
        let query = query.to_string();
        let results_tx = self.results_tx.clone();
        *task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match jobs.search(&query, 0, SEARCH_PAGE_SIZE).await {
                Ok(mut found) => {
                    found.truncate(SEARCH_PAGE_SIZE as usize);
                    let _ = results_tx.send(found);
                }
                // Keep the previous results on error; the next keystroke
                // retries anyway.
                Err(e) => warn!("search '{query}' failed: {e}"),
            }
        }));
    }
}

/// Search history, persisted as a JSON array next to the session record.
/// Most recent first; recording an existing entry moves it to the front.
pub struct SearchHistory {
    path: PathBuf,
}

impl SearchHistory {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join("search-history.json"),
        }
    }

    pub fn entries(&self) -> Vec<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    pub fn record(&self, query: &str) -> io::Result<()> {
        let updated = prepend_dedup(self.entries(), query);
        self.write(&updated)
    }

    pub fn remove(&self, query: &str) -> io::Result<()> {
        let updated: Vec<String> = self
            .entries()
            .into_iter()
            .filter(|entry| entry != query)
            .collect();
        self.write(&updated)
    }

    fn write(&self, entries: &[String]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, raw)
    }
}

fn prepend_dedup(entries: Vec<String>, query: &str) -> Vec<String> {
    let mut updated = vec![query.to_string()];
    updated.extend(entries.into_iter().filter(|entry| entry != query));
    updated
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::http::ApiClient;
    use crate::session::MemorySessionStorage;

    async fn job_store(server: &MockServer) -> JobStore {
        let config = Config {
            api_base_url: server.uri(),
            state_dir: std::env::temp_dir(),
            http_timeout_secs: 5,
            rust_log: "info".into(),
        };
        JobStore::new(ApiClient::new(&config, Arc::new(MemorySessionStorage::default())).unwrap())
    }

    #[tokio::test]
    async fn test_burst_of_edits_fires_one_search() {
        let server = MockServer::start().await;
        let debouncer =
            SearchDebouncer::with_delay(job_store(&server).await, Duration::from_millis(30));

        Mock::given(method("GET"))
            .and(path("/jobs/search"))
            .and(query_param("keyword", "rust engineer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{
                    "id": 1, "companyName": "Acme", "title": "Rust Engineer",
                    "isPublic": true, "createdAt": "2025-06-01",
                    "department": null, "requireExperience": null, "jobType": null,
                    "requirements": null, "preferredQualifications": null,
                    "idealCandidate": null, "jobDescription": null,
                    "applyStartDate": null, "applyEndDate": null,
                    "lastUpdatedAt": null, "expiredAt": null, "archivedAt": null,
                    "rawJobsText": null, "url": null, "favicon": null,
                    "regionText": null, "score": null, "cosineScore": null,
                    "bm25Score": null, "isBookmarked": false
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut results = debouncer.results();
        debouncer.input("ru");
        debouncer.input("rust");
        debouncer.input("rust engineer");

        tokio::time::timeout(Duration::from_secs(2), results.changed())
            .await
            .expect("no result published")
            .unwrap();
        assert_eq!(results.borrow().len(), 1);

        // Only the final query reached the server.
        let hits = server.received_requests().await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_short_query_clears_without_a_request() {
        let server = MockServer::start().await;
        let debouncer =
            SearchDebouncer::with_delay(job_store(&server).await, Duration::from_millis(10));

        debouncer.input("r");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(debouncer.results().borrow().is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_history_prepend_dedup() {
        let entries = vec!["rust".to_string(), "go".to_string()];
        let updated = prepend_dedup(entries, "go");
        assert_eq!(updated, vec!["go".to_string(), "rust".to_string()]);
    }

    #[test]
    fn test_history_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let history = SearchHistory::new(dir.path());

        history.record("rust").unwrap();
        history.record("go").unwrap();
        history.record("rust").unwrap();
        assert_eq!(history.entries(), vec!["rust", "go"]);

        history.remove("go").unwrap();
        assert_eq!(history.entries(), vec!["rust"]);
    }
}
