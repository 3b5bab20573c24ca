//! Scheduling Oracle Port - Interface for calendar free/busy lookup and
//! event creation.
//!
//! Implementations talk to a calendar backend. All timestamps are
//! timezone-aware UTC. "No free slot" is a normal result (`Ok(None)`),
//! not an error; errors are reserved for the calendar being unreachable
//! or rejecting the request.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A bookable time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    /// Creates a slot from start and duration.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Length of the slot.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Port for finding free calendar slots and booking calls.
#[async_trait]
pub trait SchedulingOracle: Send + Sync {
    /// Finds the next free slot of `duration_minutes` within the coming
    /// `search_window_hours`. Returns `Ok(None)` when the window is full.
    async fn find_slot(
        &self,
        duration_minutes: u32,
        search_window_hours: u32,
    ) -> Result<Option<Slot>, SchedulingError>;

    /// Creates a calendar event in the given slot and returns a joinable
    /// handle (e.g. a meeting link).
    async fn create_event(
        &self,
        summary: &str,
        description: &str,
        slot: Slot,
    ) -> Result<String, SchedulingError>;
}

/// Scheduling oracle errors.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Request timed out.
    #[error("calendar request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Calendar backend unavailable.
    #[error("calendar unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during request.
    #[error("calendar network error: {0}")]
    Network(String),

    /// Calendar response could not be parsed.
    #[error("calendar parse error: {0}")]
    Parse(String),

    /// Credentials rejected.
    #[error("calendar authentication failed")]
    AuthenticationFailed,
}

impl SchedulingError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn slot_from_start_and_duration() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap();
        let slot = Slot::starting_at(start, Duration::minutes(15));

        assert_eq!(slot.start, start);
        assert_eq!(slot.end, Utc.with_ymd_and_hms(2025, 6, 2, 14, 15, 0).unwrap());
        assert_eq!(slot.duration(), Duration::minutes(15));
    }

    #[test]
    fn error_messages_name_the_calendar() {
        let err = SchedulingError::unavailable("503 from backend");
        assert!(err.to_string().contains("calendar unavailable"));
    }
}
