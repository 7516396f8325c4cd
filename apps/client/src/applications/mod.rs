//! Application tracking — the "manage" view's data layer. Server calls plus
//! the pure filter/sort pipeline applied on the client.

pub mod calendar;

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use tracing::error;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::{Application, ApplicationEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CompanyName,
    JobTitle,
    ApplyDueDate,
    ApplyStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Client-side view configuration for the application list.
#[derive(Debug, Clone)]
pub struct ApplicationFilter {
    /// Case-insensitive match against title, company and note.
    pub query: Option<String>,
    /// Empty means "all statuses".
    pub statuses: Vec<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl Default for ApplicationFilter {
    fn default() -> Self {
        Self {
            query: None,
            statuses: Vec::new(),
            sort_field: SortField::ApplyDueDate,
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Clone)]
pub struct ApplicationStore {
    client: ApiClient,
    applications: Arc<Mutex<Option<Vec<Application>>>>,
}

impl ApplicationStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            applications: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Application>, ApiError> {
        let applications: Vec<Application> =
            self.client.get("/applications").send().await?.json().await?;
        *self.applications.lock().expect("application cache poisoned") =
            Some(applications.clone());
        Ok(applications)
    }

    pub fn applications(&self) -> Option<Vec<Application>> {
        self.applications
            .lock()
            .expect("application cache poisoned")
            .clone()
    }

    /// Starts tracking an application for a job.
    pub async fn apply(&self, job_id: i64) -> Result<StatusCode, ApiError> {
        let response = self
            .client
            .post("/applications/apply")
            .query("jobId", job_id)
            .send()
            .await?
            .error_for_status()
            .await?;
        Ok(response.status())
    }

    pub async fn edit(&self, job_id: i64, edit: &ApplicationEdit) -> Result<StatusCode, ApiError> {
        let body = serde_json::to_value(edit)?;
        let result = self
            .client
            .put("/applications")
            .query("jobId", job_id)
            .json(body)
            .send()
            .await?
            .error_for_status()
            .await;
        match result {
            Ok(response) => Ok(response.status()),
            Err(e) => {
                error!("application edit failed for job {job_id}: {e}");
                Err(e)
            }
        }
    }

    pub async fn delete(&self, job_id: i64) -> Result<StatusCode, ApiError> {
        let response = self
            .client
            .delete("/applications")
            .query("jobId", job_id)
            .send()
            .await?
            .error_for_status()
            .await?;
        Ok(response.status())
    }
}

/// Applies search, status filter and sort. Pure; the store's cached list is
/// never reordered in place.
pub fn filter_and_sort(applications: &[Application], filter: &ApplicationFilter) -> Vec<Application> {
    let mut filtered: Vec<Application> = applications
        .iter()
        .filter(|app| matches_query(app, filter.query.as_deref()))
        .filter(|app| filter.statuses.is_empty() || filter.statuses.contains(&app.apply_status))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = match filter.sort_field {
            SortField::CompanyName => a.company_name.cmp(&b.company_name),
            SortField::JobTitle => a.job_title.cmp(&b.job_title),
            SortField::ApplyStatus => a.apply_status.cmp(&b.apply_status),
            // Missing due dates sort first in ascending order, like an
            // epoch-zero date.
            SortField::ApplyDueDate => compare_due_dates(&a.apply_due_date, &b.apply_due_date),
        };
        match filter.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    filtered
}

fn matches_query(app: &Application, query: Option<&str>) -> bool {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return true;
    };
    let query = query.to_lowercase();
    app.job_title.to_lowercase().contains(&query)
        || app.company_name.to_lowercase().contains(&query)
        || app
            .note
            .as_deref()
            .is_some_and(|note| note.to_lowercase().contains(&query))
}

fn compare_due_dates(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
pub(crate) fn sample_application(
    job_id: i64,
    company: &str,
    title: &str,
    status: &str,
    due: Option<&str>,
) -> Application {
    Application {
        application_id: job_id * 10,
        job_id,
        job_title: title.to_string(),
        company_name: company.to_string(),
        apply_due_date: due.map(str::to_string),
        apply_status: status.to_string(),
        note: None,
        created_at: "2025-06-01".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> Vec<Application> {
        vec![
            sample_application(1, "Acme", "Backend Engineer", "APPLIED", Some("2025-08-20")),
            sample_application(2, "Nimbus", "Data Engineer", "INTERVIEW", Some("2025-08-10")),
            sample_application(3, "Orbit", "QA Engineer", "PREPARING", None),
        ]
    }

    #[test]
    fn test_query_matches_title_company_and_note() {
        let mut apps = fixtures();
        apps[2].note = Some("referred by Jamie".to_string());

        let hit = |q: &str| {
            filter_and_sort(
                &apps,
                &ApplicationFilter {
                    query: Some(q.to_string()),
                    ..ApplicationFilter::default()
                },
            )
        };

        assert_eq!(hit("backend").len(), 1);
        assert_eq!(hit("NIMBUS").len(), 1);
        assert_eq!(hit("jamie").len(), 1);
        assert_eq!(hit("nothing").len(), 0);
    }

    #[test]
    fn test_status_filter_is_a_union() {
        let apps = fixtures();
        let filtered = filter_and_sort(
            &apps,
            &ApplicationFilter {
                statuses: vec!["APPLIED".into(), "PREPARING".into()],
                ..ApplicationFilter::default()
            },
        );
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_due_date_desc_puts_missing_dates_last() {
        let apps = fixtures();
        let sorted = filter_and_sort(&apps, &ApplicationFilter::default());
        assert_eq!(sorted[0].job_id, 1); // 2025-08-20
        assert_eq!(sorted[1].job_id, 2); // 2025-08-10
        assert_eq!(sorted[2].job_id, 3); // no due date
    }

    #[test]
    fn test_company_sort_ascending() {
        let apps = fixtures();
        let sorted = filter_and_sort(
            &apps,
            &ApplicationFilter {
                sort_field: SortField::CompanyName,
                sort_order: SortOrder::Asc,
                ..ApplicationFilter::default()
            },
        );
        let companies: Vec<_> = sorted.iter().map(|a| a.company_name.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "Nimbus", "Orbit"]);
    }
}
