//! Scheduling oracle adapters: Google Calendar and a mock.

mod google_calendar;
mod mock_calendar;

pub use google_calendar::{first_free_gap, BusyInterval, GoogleCalendarConfig, GoogleCalendarOracle};
pub use mock_calendar::{CreatedEventRecord, MockSchedulingError, MockSchedulingOracle};
