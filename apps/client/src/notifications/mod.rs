//! Notification store. CV-match and apply-due notifications live in two
//! independent lists; fetching one kind never disturbs the other.

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use tracing::warn;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::{Job, Notification, NotificationJobItem, NotificationType, Page};

/// Page size used for the dropdown fetch; the service pages alarms but the
/// client shows a single page.
const ALARM_PAGE_SIZE: u32 = 100;

#[derive(Default)]
struct Lists {
    cv_match: Vec<Notification>,
    apply_due: Vec<Notification>,
}

#[derive(Clone)]
pub struct NotificationStore {
    client: ApiClient,
    lists: Arc<Mutex<Lists>>,
}

impl NotificationStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            lists: Arc::new(Mutex::new(Lists::default())),
        }
    }

    /// Fetches one kind of notification into its own list.
    pub async fn fetch(
        &self,
        kind: NotificationType,
        unread_only: bool,
    ) -> Result<Vec<Notification>, ApiError> {
        let page: Page<Notification> = self
            .client
            .get("/alarms")
            .query("unreadOnly", unread_only)
            .query("type", kind.as_str())
            .query("page", 0)
            .query("size", ALARM_PAGE_SIZE)
            .send()
            .await?
            .json()
            .await?;

        let mut lists = self.lists.lock().expect("notification cache poisoned");
        match kind {
            NotificationType::CvMatch => lists.cv_match = page.content.clone(),
            NotificationType::ApplyDue => lists.apply_due = page.content.clone(),
            NotificationType::JobPopular => {}
        }
        Ok(page.content)
    }

    pub fn cv_match(&self) -> Vec<Notification> {
        self.lists
            .lock()
            .expect("notification cache poisoned")
            .cv_match
            .clone()
    }

    pub fn apply_due(&self) -> Vec<Notification> {
        self.lists
            .lock()
            .expect("notification cache poisoned")
            .apply_due
            .clone()
    }

    /// Marks a notification as read.
    pub async fn mark_read(&self, id: i64) -> Result<StatusCode, ApiError> {
        let response = self
            .client
            .patch(&format!("/alarms/{id}/read"))
            .send()
            .await?
            .error_for_status()
            .await?;
        Ok(response.status())
    }

    /// Deletes a notification; on 204 both lists are refetched so the badge
    /// count stays honest.
    pub async fn delete(&self, id: i64) -> Result<StatusCode, ApiError> {
        let response = self
            .client
            .delete(&format!("/alarms/{id}"))
            .send()
            .await?
            .error_for_status()
            .await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            if let Err(e) = self.fetch(NotificationType::CvMatch, false).await {
                warn!("refetch after delete failed (CV_MATCH): {e}");
            }
            if let Err(e) = self.fetch(NotificationType::ApplyDue, false).await {
                warn!("refetch after delete failed (APPLY_DUE): {e}");
            }
        }
        Ok(status)
    }

    /// Resolves a notification's job references into full postings via the
    /// batch endpoint. Empty input short-circuits without a request.
    pub async fn hydrate_jobs(&self, items: &[NotificationJobItem]) -> Result<Vec<Job>, ApiError> {
        let ids: Vec<String> = items.iter().map(|item| item.job_id.to_string()).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.client
            .get("/jobs/_batch")
            .query("ids", ids.join(","))
            .send()
            .await?
            .json()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::session::{MemorySessionStorage, PersistedSession, SessionStorage};

    async fn store(server: &MockServer) -> NotificationStore {
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
        NotificationStore::new(ApiClient::new(&config, storage).unwrap())
    }

    fn alarm(id: i64, kind: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "createdAt": "2025-08-01T09:00:00",
            "alarmText": text,
            "userId": 42,
            "read": false,
            "readAt": null,
            "type": kind,
            "dedupeKey": format!("{kind}-{id}"),
            "status": "SENT",
            "sentAt": "2025-08-01T09:00:05",
            "jobs": [],
            "titleCode": null,
            "cvId": null
        })
    }

    #[tokio::test]
    async fn test_two_kinds_populate_independent_lists() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        Mock::given(method("GET"))
            .and(path("/alarms"))
            .and(query_param("type", "CV_MATCH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [alarm(1, "CV_MATCH", "3 new matches")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alarms"))
            .and(query_param("type", "APPLY_DUE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    alarm(2, "APPLY_DUE", "Acme closes tomorrow"),
                    alarm(3, "APPLY_DUE", "Orbit closes Friday")
                ]
            })))
            .mount(&server)
            .await;

        // Issued together on mount, like the dropdown does.
        let (matches, dues) = tokio::join!(
            store.fetch(NotificationType::CvMatch, false),
            store.fetch(NotificationType::ApplyDue, false)
        );
        assert_eq!(matches.unwrap().len(), 1);
        assert_eq!(dues.unwrap().len(), 2);

        // No cross-contamination.
        assert_eq!(store.cv_match().len(), 1);
        assert_eq!(store.apply_due().len(), 2);
        assert_eq!(store.cv_match()[0].id, 1);
    }

    #[tokio::test]
    async fn test_delete_204_refetches_both_lists() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/alarms/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alarms"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "content": [] })),
            )
            .expect(2)
            .mount(&server)
            .await;

        let status = store.delete(9).await.unwrap();
        assert_eq!(status.as_u16(), 204);
    }

    #[tokio::test]
    async fn test_hydrate_jobs_batches_ids_and_skips_empty() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        Mock::given(method("GET"))
            .and(path("/jobs/_batch"))
            .and(query_param("ids", "7,9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let items = vec![
            NotificationJobItem {
                job_id: 7,
                rank: 1,
                clicked: None,
            },
            NotificationJobItem {
                job_id: 9,
                rank: 2,
                clicked: Some(false),
            },
        ];
        store.hydrate_jobs(&items).await.unwrap();
        store.hydrate_jobs(&[]).await.unwrap();
    }
}
