//! Calendar projection of the application list: one event per due-dated
//! application, for the calendar view of the manage screen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Application;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub company_name: String,
    pub apply_status: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Projects due-dated applications onto calendar events. Applications with
/// no due date, or an unparseable one, are skipped.
pub fn due_events(applications: &[Application]) -> Vec<CalendarEvent> {
    applications
        .iter()
        .filter_map(|app| {
            let due = app.apply_due_date.as_deref()?;
            let date = parse_due_date(due)?;
            Some(CalendarEvent {
                id: app.job_id,
                title: app.job_title.clone(),
                company_name: app.company_name.clone(),
                apply_status: app.apply_status.clone(),
                start: date,
                end: date,
            })
        })
        .collect()
}

/// Due dates arrive either as plain dates or as datetimes; take the date part.
fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::sample_application;

    #[test]
    fn test_skips_applications_without_due_dates() {
        let apps = vec![
            sample_application(1, "Acme", "Backend Engineer", "APPLIED", Some("2025-08-20")),
            sample_application(2, "Orbit", "QA Engineer", "PREPARING", None),
        ];
        let events = due_events(&apps);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 1);
        assert_eq!(events[0].start, events[0].end);
    }

    #[test]
    fn test_accepts_datetime_due_dates() {
        let apps = vec![sample_application(
            1,
            "Acme",
            "Backend Engineer",
            "APPLIED",
            Some("2025-08-20T23:59:59"),
        )];
        let events = due_events(&apps);
        assert_eq!(
            events[0].start,
            NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
        );
    }

    #[test]
    fn test_garbage_dates_are_dropped() {
        let apps = vec![sample_application(
            1,
            "Acme",
            "Backend Engineer",
            "APPLIED",
            Some("soon"),
        )];
        assert!(due_events(&apps).is_empty());
    }
}
