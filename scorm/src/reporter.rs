//! LmsReporter - fire-and-forget reporting to the host LMS.
//!
//! Nothing here fails loudly. A missing API or a rejected call is logged
//! and the lesson carries on.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use lesson::CompletionStatus;

use crate::api::{check, cmi_status, ScormApi, ScormError};
use crate::config::LmsConfig;
use crate::locator::{locate, HostFrame};

const LESSON_STATUS: &str = "cmi.core.lesson_status";
const SCORE_RAW: &str = "cmi.core.score.raw";
const SCORE_MAX: &str = "cmi.core.score.max";
const SCORE_MIN: &str = "cmi.core.score.min";

/// Reports lesson status and score to the host LMS.
pub struct LmsReporter {
    config: LmsConfig,
    host: Option<Box<dyn HostFrame>>,
    /// Discovered API, kept once found
    api: Mutex<Option<Arc<dyn ScormApi>>>,
}

impl LmsReporter {
    /// Reporter that discovers the API in `host` on first use.
    pub fn new(host: Box<dyn HostFrame>, config: LmsConfig) -> Self {
        Self {
            config,
            host: Some(host),
            api: Mutex::new(None),
        }
    }

    /// Reporter bound directly to an API.
    pub fn with_api(api: Arc<dyn ScormApi>, config: LmsConfig) -> Self {
        Self {
            config,
            host: None,
            api: Mutex::new(Some(api)),
        }
    }

    /// Reporter with no host. Every call is a no-op.
    pub fn detached() -> Self {
        Self {
            config: LmsConfig::default(),
            host: None,
            api: Mutex::new(None),
        }
    }

    /// Whether an API is reachable.
    pub fn is_connected(&self) -> bool {
        self.api().is_some()
    }

    /// Open the session and mark the lesson incomplete.
    pub fn initialize(&self) {
        self.run("initialize", |api| {
            check(api.lms_initialize(), "LMSInitialize")?;
            info!("LMS session initialized");
            check(
                api.lms_set_value(LESSON_STATUS, cmi_status(CompletionStatus::Incomplete)),
                "LMSSetValue",
            )?;
            check(api.lms_commit(), "LMSCommit")
        });
    }

    /// Report a score and commit.
    pub fn report_score(&self, raw: u32, max: u32, min: u32) {
        self.run("report_score", |api| {
            check(api.lms_set_value(SCORE_RAW, &raw.to_string()), "LMSSetValue")?;
            check(api.lms_set_value(SCORE_MAX, &max.to_string()), "LMSSetValue")?;
            check(api.lms_set_value(SCORE_MIN, &min.to_string()), "LMSSetValue")?;
            check(api.lms_commit(), "LMSCommit")?;
            info!(raw, max, min, "LMS score reported");
            Ok(())
        });
    }

    /// Report a completion status and commit.
    pub fn report_status(&self, status: CompletionStatus) {
        self.run("report_status", |api| {
            check(
                api.lms_set_value(LESSON_STATUS, cmi_status(status)),
                "LMSSetValue",
            )?;
            check(api.lms_commit(), "LMSCommit")?;
            info!(status = ?status, "LMS status reported");
            Ok(())
        });
    }

    /// Close the session.
    pub fn terminate(&self) {
        self.run("terminate", |api| {
            check(api.lms_finish(), "LMSFinish")?;
            info!("LMS session terminated");
            Ok(())
        });
    }

    fn run<F>(&self, operation: &'static str, op: F)
    where
        F: FnOnce(&dyn ScormApi) -> Result<(), ScormError>,
    {
        if !self.config.enabled {
            return;
        }
        let result = self
            .api()
            .ok_or(ScormError::NotFound)
            .and_then(|api| op(api.as_ref()));

        match result {
            Ok(()) => {}
            // Local preview without an LMS
            Err(ScormError::NotFound) => debug!(operation, "No SCORM API, skipping"),
            Err(e) => warn!(operation, error = %e, "LMS call rejected"),
        }
    }

    /// Cached API, discovering it if not yet found.
    fn api(&self) -> Option<Arc<dyn ScormApi>> {
        let mut cached = self.api.lock().unwrap_or_else(PoisonError::into_inner);
        if cached.is_none() {
            *cached = self
                .host
                .as_deref()
                .and_then(|host| locate(host, self.config.max_parent_depth));
        }
        cached.clone()
    }
}
