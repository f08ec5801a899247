//! SCORM 1.2 reporting.
//!
//! The lesson reports its completion status and score to a host LMS
//! through the SCORM runtime API. The API lives somewhere in the host's
//! frame hierarchy and may be missing entirely (local preview); every
//! reporter call is then a silent no-op.

pub mod api;
pub mod config;
pub mod locator;
pub mod reporter;

pub use api::{RecordedCall, RecordingApi, ScormApi, ScormError};
pub use config::LmsConfig;
pub use locator::{find_api, locate, HostFrame, StaticFrame};
pub use reporter::LmsReporter;
