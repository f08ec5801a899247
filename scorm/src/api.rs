//! The SCORM 1.2 runtime API as seen from the lesson.

use std::sync::{Mutex, PoisonError};

use lesson::CompletionStatus;

/// Error types for host API calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScormError {
    /// The host answered `"false"`
    #[error("LMS rejected {call}")]
    Rejected { call: &'static str },

    /// No API found in the host's frame hierarchy
    #[error("No SCORM API found")]
    NotFound,
}

/// SCORM 1.2 runtime calls used by the lesson.
///
/// Each call reports whether the host accepted it (the API's `"true"`).
pub trait ScormApi: Send + Sync {
    /// `LMSInitialize("")`
    fn lms_initialize(&self) -> bool;

    /// `LMSSetValue(element, value)`
    fn lms_set_value(&self, element: &str, value: &str) -> bool;

    /// `LMSCommit("")`
    fn lms_commit(&self) -> bool;

    /// `LMSFinish("")`
    fn lms_finish(&self) -> bool;
}

pub(crate) fn check(accepted: bool, call: &'static str) -> Result<(), ScormError> {
    if accepted {
        Ok(())
    } else {
        Err(ScormError::Rejected { call })
    }
}

/// Data model value for a completion status.
pub fn cmi_status(status: CompletionStatus) -> &'static str {
    match status {
        CompletionStatus::Completed => "completed",
        CompletionStatus::Passed => "passed",
        CompletionStatus::Failed => "failed",
        CompletionStatus::Incomplete => "incomplete",
    }
}

/// A call received by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Initialize,
    SetValue { element: String, value: String },
    Commit,
    Finish,
}

/// In-memory API that records every call.
///
/// Stands in for a host LMS in tests and local runs.
#[derive(Debug)]
pub struct RecordingApi {
    accept_initialize: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            accept_initialize: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `LMSInitialize` with `accepted`.
    pub fn with_initialize_result(mut self, accepted: bool) -> Self {
        self.accept_initialize = accepted;
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent value set for `element`.
    pub fn value(&self, element: &str) -> Option<String> {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                RecordedCall::SetValue { element: e, value } if e == element => Some(value),
                _ => None,
            })
    }

    pub fn count(&self, call: &RecordedCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: RecordedCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Default for RecordingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScormApi for RecordingApi {
    fn lms_initialize(&self) -> bool {
        self.record(RecordedCall::Initialize);
        self.accept_initialize
    }

    fn lms_set_value(&self, element: &str, value: &str) -> bool {
        self.record(RecordedCall::SetValue {
            element: element.to_string(),
            value: value.to_string(),
        });
        true
    }

    fn lms_commit(&self) -> bool {
        self.record(RecordedCall::Commit);
        true
    }

    fn lms_finish(&self) -> bool {
        self.record(RecordedCall::Finish);
        true
    }
}
