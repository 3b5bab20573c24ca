//! Mock Scheduling Oracle for testing.
//!
//! Configurable slot availability, error injection, and recording of
//! created events so tests can assert on the booking side effects.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{SchedulingError, SchedulingOracle, Slot};

/// Clonable error stand-ins for scripting failures.
#[derive(Debug, Clone)]
pub enum MockSchedulingError {
    Timeout { timeout_secs: u32 },
    Unavailable { message: String },
    Network { message: String },
}

impl From<MockSchedulingError> for SchedulingError {
    fn from(err: MockSchedulingError) -> Self {
        match err {
            MockSchedulingError::Timeout { timeout_secs } => {
                SchedulingError::Timeout { timeout_secs }
            }
            MockSchedulingError::Unavailable { message } => SchedulingError::unavailable(message),
            MockSchedulingError::Network { message } => SchedulingError::network(message),
        }
    }
}

/// An event booked through the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEventRecord {
    pub summary: String,
    pub description: String,
    pub slot: Slot,
}

/// Mock scheduling oracle with scripted slot availability.
#[derive(Debug, Clone)]
pub struct MockSchedulingOracle {
    finds: Arc<Mutex<VecDeque<Result<Option<Slot>, MockSchedulingError>>>>,
    handle: String,
    created: Arc<Mutex<Vec<CreatedEventRecord>>>,
    find_calls: Arc<Mutex<usize>>,
}

impl Default for MockSchedulingOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSchedulingOracle {
    /// Creates a mock that finds a slot shortly after "now" by default.
    pub fn new() -> Self {
        Self {
            finds: Arc::new(Mutex::new(VecDeque::new())),
            handle: "https://meet.example.com/mock-call".to_string(),
            created: Arc::new(Mutex::new(Vec::new())),
            find_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Queues a specific slot to be found.
    pub fn with_slot(self, slot: Slot) -> Self {
        self.finds.lock().unwrap().push_back(Ok(Some(slot)));
        self
    }

    /// Queues a fully-booked search window.
    pub fn with_no_slot(self) -> Self {
        self.finds.lock().unwrap().push_back(Ok(None));
        self
    }

    /// Queues a slot lookup failure.
    pub fn with_find_error(self, error: MockSchedulingError) -> Self {
        self.finds.lock().unwrap().push_back(Err(error));
        self
    }

    /// Sets the handle returned for created events.
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    /// Events booked through this mock, in order.
    pub fn created_events(&self) -> Vec<CreatedEventRecord> {
        self.created.lock().unwrap().clone()
    }

    /// Number of `find_slot` calls made.
    pub fn find_call_count(&self) -> usize {
        *self.find_calls.lock().unwrap()
    }

    /// Number of `create_event` calls made.
    pub fn create_call_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl SchedulingOracle for MockSchedulingOracle {
    async fn find_slot(
        &self,
        duration_minutes: u32,
        _search_window_hours: u32,
    ) -> Result<Option<Slot>, SchedulingError> {
        *self.find_calls.lock().unwrap() += 1;

        match self.finds.lock().unwrap().pop_front() {
            Some(Ok(slot)) => Ok(slot),
            Some(Err(err)) => Err(err.into()),
            None => Ok(Some(Slot::starting_at(
                Utc::now() + Duration::minutes(5),
                Duration::minutes(i64::from(duration_minutes)),
            ))),
        }
    }

    async fn create_event(
        &self,
        summary: &str,
        description: &str,
        slot: Slot,
    ) -> Result<String, SchedulingError> {
        self.created.lock().unwrap().push(CreatedEventRecord {
            summary: summary.to_string(),
            description: description.to_string(),
            slot,
        });
        Ok(self.handle.clone())
    }
}
