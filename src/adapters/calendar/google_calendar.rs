//! Google Calendar Oracle - Implementation of SchedulingOracle against
//! the Calendar v3 REST API.
//!
//! Slot search queries free/busy for the configured calendar and scans
//! the busy intervals for the first gap long enough to hold the call.
//! Search starts a few minutes after "now" so a slot is never booked in
//! the immediate past by the time the client joins.
//!
//! Authentication uses a bearer token supplied via configuration; token
//! acquisition (OAuth flows, service accounts) is outside this adapter.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ports::{SchedulingError, SchedulingOracle, Slot};

/// Configuration for the Google Calendar oracle.
#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    /// OAuth bearer token.
    access_token: Secret<String>,
    /// Calendar to query and book against.
    pub calendar_id: String,
    /// Base URL for the API (default: https://www.googleapis.com/calendar/v3).
    pub base_url: String,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// Minutes to skip past "now" before the first candidate slot.
    pub lead_in_minutes: i64,
}

impl GoogleCalendarConfig {
    /// Creates a new configuration with the given bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            calendar_id: "primary".to_string(),
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            timeout: std::time::Duration::from_secs(30),
            lead_in_minutes: 5,
        }
    }

    /// Sets the calendar id.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// Google-Calendar-backed scheduling oracle.
pub struct GoogleCalendarOracle {
    config: GoogleCalendarConfig,
    client: Client,
}

impl GoogleCalendarOracle {
    /// Creates a new oracle with the given configuration.
    pub fn new(config: GoogleCalendarConfig) -> Result<Self, SchedulingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SchedulingError::unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn freebusy_url(&self) -> String {
        format!("{}/freeBusy", self.config.base_url)
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.config.base_url, self.config.calendar_id
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> SchedulingError {
        if e.is_timeout() {
            SchedulingError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if e.is_connect() {
            SchedulingError::network(format!("connection failed: {e}"))
        } else {
            SchedulingError::network(e.to_string())
        }
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, SchedulingError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(SchedulingError::AuthenticationFailed),
            500..=599 => Err(SchedulingError::unavailable(format!(
                "server error {status}: {error_body}"
            ))),
            _ => Err(SchedulingError::network(format!(
                "unexpected status {status}: {error_body}"
            ))),
        }
    }
}

#[async_trait]
impl SchedulingOracle for GoogleCalendarOracle {
    async fn find_slot(
        &self,
        duration_minutes: u32,
        search_window_hours: u32,
    ) -> Result<Option<Slot>, SchedulingError> {
        let now = Utc::now();
        let window_start = now + Duration::minutes(self.config.lead_in_minutes);
        let window_end = now + Duration::hours(i64::from(search_window_hours));

        let request = FreeBusyRequest {
            time_min: rfc3339(window_start),
            time_max: rfc3339(window_end),
            time_zone: "UTC".to_string(),
            items: vec![FreeBusyItem {
                id: self.config.calendar_id.clone(),
            }],
        };

        let response = self
            .client
            .post(self.freebusy_url())
            .bearer_auth(self.config.token())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.handle_response_status(response).await?;

        let body: FreeBusyResponse = response
            .json()
            .await
            .map_err(|e| SchedulingError::parse(format!("malformed freebusy response: {e}")))?;

        let mut busy = body
            .calendars
            .get(&self.config.calendar_id)
            .map(|c| c.busy.clone())
            .unwrap_or_default();
        busy.sort_by_key(|interval| interval.start);

        Ok(first_free_gap(
            &busy,
            window_start,
            window_end,
            Duration::minutes(i64::from(duration_minutes)),
        ))
    }

    async fn create_event(
        &self,
        summary: &str,
        description: &str,
        slot: Slot,
    ) -> Result<String, SchedulingError> {
        let event = EventResource {
            summary: summary.to_string(),
            description: description.to_string(),
            start: EventTime {
                date_time: rfc3339(slot.start),
                time_zone: "UTC".to_string(),
            },
            end: EventTime {
                date_time: rfc3339(slot.end),
                time_zone: "UTC".to_string(),
            },
        };

        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(self.config.token())
            .json(&event)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.handle_response_status(response).await?;

        let created: CreatedEvent = response
            .json()
            .await
            .map_err(|e| SchedulingError::parse(format!("malformed event response: {e}")))?;

        Ok(created.html_link.unwrap_or(created.id))
    }
}

/// Scans sorted busy intervals for the first gap of at least `duration`
/// inside `[window_start, window_end]`.
///
/// Intervals may overlap; the scan tracks the furthest busy end seen so
/// far and moves the candidate start past it.
pub fn first_free_gap(
    busy: &[BusyInterval],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    duration: Duration,
) -> Option<Slot> {
    let mut candidate = window_start;

    for interval in busy {
        if candidate + duration <= interval.start {
            break;
        }
        if interval.end > candidate {
            candidate = interval.end;
        }
    }

    if candidate + duration <= window_end {
        Some(Slot::starting_at(candidate, duration))
    } else {
        None
    }
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest {
    time_min: String,
    time_max: String,
    time_zone: String,
    items: Vec<FreeBusyItem>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    calendars: HashMap<String, CalendarBusy>,
}

#[derive(Debug, Deserialize)]
struct CalendarBusy {
    #[serde(default)]
    busy: Vec<BusyInterval>,
}

/// A busy window reported by the calendar, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct EventResource {
    summary: String,
    description: String,
    start: EventTime,
    end: EventTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: String,
    time_zone: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEvent {
    id: String,
    html_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    fn busy(start: DateTime<Utc>, end: DateTime<Utc>) -> BusyInterval {
        BusyInterval { start, end }
    }

    mod gap_scan {
        use super::*;

        #[test]
        fn empty_calendar_books_at_window_start() {
            let slot = first_free_gap(&[], at(10, 0), at(12, 0), Duration::minutes(15)).unwrap();
            assert_eq!(slot.start, at(10, 0));
            assert_eq!(slot.end, at(10, 15));
        }

        #[test]
        fn gap_before_first_busy_interval_is_used() {
            let intervals = [busy(at(10, 30), at(11, 0))];
            let slot =
                first_free_gap(&intervals, at(10, 0), at(12, 0), Duration::minutes(15)).unwrap();
            assert_eq!(slot.start, at(10, 0));
        }

        #[test]
        fn candidate_moves_past_busy_intervals() {
            let intervals = [busy(at(10, 0), at(10, 30)), busy(at(10, 30), at(11, 0))];
            let slot =
                first_free_gap(&intervals, at(10, 0), at(12, 0), Duration::minutes(15)).unwrap();
            assert_eq!(slot.start, at(11, 0));
        }

        #[test]
        fn too_small_gap_between_intervals_is_skipped() {
            let intervals = [busy(at(10, 0), at(10, 30)), busy(at(10, 40), at(11, 0))];
            let slot =
                first_free_gap(&intervals, at(10, 0), at(12, 0), Duration::minutes(15)).unwrap();
            // Ten minutes between 10:30 and 10:40 cannot hold 15 minutes.
            assert_eq!(slot.start, at(11, 0));
        }

        #[test]
        fn sufficient_gap_between_intervals_is_used() {
            let intervals = [busy(at(10, 0), at(10, 30)), busy(at(11, 0), at(11, 30))];
            let slot =
                first_free_gap(&intervals, at(10, 0), at(12, 0), Duration::minutes(15)).unwrap();
            assert_eq!(slot.start, at(10, 30));
        }

        #[test]
        fn overlapping_intervals_do_not_move_candidate_backwards() {
            let intervals = [busy(at(10, 0), at(11, 0)), busy(at(10, 15), at(10, 45))];
            let slot =
                first_free_gap(&intervals, at(10, 0), at(12, 0), Duration::minutes(15)).unwrap();
            assert_eq!(slot.start, at(11, 0));
        }

        #[test]
        fn fully_booked_window_yields_none() {
            let intervals = [busy(at(9, 0), at(12, 0))];
            assert!(first_free_gap(&intervals, at(10, 0), at(12, 0), Duration::minutes(15)).is_none());
        }

        #[test]
        fn slot_must_end_within_the_window() {
            let intervals = [busy(at(10, 0), at(11, 50))];
            // Only 10 minutes remain before the window closes.
            assert!(first_free_gap(&intervals, at(10, 0), at(12, 0), Duration::minutes(15)).is_none());
        }
    }

    mod wire_format {
        use super::*;

        #[test]
        fn freebusy_request_uses_camel_case_keys() {
            let request = FreeBusyRequest {
                time_min: rfc3339(at(10, 0)),
                time_max: rfc3339(at(12, 0)),
                time_zone: "UTC".to_string(),
                items: vec![FreeBusyItem {
                    id: "primary".to_string(),
                }],
            };
            let json = serde_json::to_value(&request).unwrap();
            assert_eq!(json["timeMin"], "2025-06-02T10:00:00Z");
            assert_eq!(json["items"][0]["id"], "primary");
        }

        #[test]
        fn busy_intervals_parse_from_rfc3339() {
            let body = r#"{
                "calendars": {
                    "primary": {
                        "busy": [
                            {"start": "2025-06-02T10:00:00Z", "end": "2025-06-02T10:30:00Z"}
                        ]
                    }
                }
            }"#;
            let parsed: FreeBusyResponse = serde_json::from_str(body).unwrap();
            let busy = &parsed.calendars["primary"].busy;
            assert_eq!(busy[0].start, at(10, 0));
            assert_eq!(busy[0].end, at(10, 30));
        }

        #[test]
        fn created_event_prefers_html_link() {
            let body = r#"{"id": "evt-1", "htmlLink": "https://calendar.google.com/event?eid=abc"}"#;
            let parsed: CreatedEvent = serde_json::from_str(body).unwrap();
            assert_eq!(
                parsed.html_link.as_deref(),
                Some("https://calendar.google.com/event?eid=abc")
            );
        }
    }
}
