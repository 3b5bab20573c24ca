//! Scheduling oracle (Google Calendar) configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Calendar configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// OAuth bearer token for the Calendar API
    pub access_token: Option<String>,

    /// Calendar to book against
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Call length in minutes
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,

    /// Free-slot search window in hours
    #[serde(default = "default_search_window_hours")]
    pub search_window_hours: u32,
}

impl CalendarConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a token is configured
    pub fn has_token(&self) -> bool {
        self.access_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Validate calendar configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_token() {
            return Err(ValidationError::MissingRequired("CALENDAR__ACCESS_TOKEN"));
        }
        if self.slot_minutes == 0 {
            return Err(ValidationError::invalid(
                "calendar.slot_minutes",
                "must not be 0",
            ));
        }
        if self.search_window_hours == 0 {
            return Err(ValidationError::invalid(
                "calendar.search_window_hours",
                "must not be 0",
            ));
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            calendar_id: default_calendar_id(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            slot_minutes: default_slot_minutes(),
            search_window_hours: default_search_window_hours(),
        }
    }
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_slot_minutes() -> u32 {
    15
}

fn default_search_window_hours() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_booking_policy() {
        let config = CalendarConfig::default();
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.slot_minutes, 15);
        assert_eq!(config.search_window_hours, 2);
    }

    #[test]
    fn missing_token_fails_validation() {
        assert!(CalendarConfig::default().validate().is_err());
    }

    #[test]
    fn zero_slot_length_fails_validation() {
        let config = CalendarConfig {
            access_token: Some("token".to_string()),
            slot_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn complete_config_passes_validation() {
        let config = CalendarConfig {
            access_token: Some("token".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
