//! Mailcraft - interactive e-mail etiquette lesson
//!
//! Ties the pure lesson core to its collaborators:
//!
//! - [`LessonSession`]: owns the lesson state, runs stage checks and
//!   carries out the side effects they request (AI tutor calls, LMS
//!   reporting, transient notices)
//! - [`CertificateExporter`]: writes the printable certificate
//! - [`MailcraftConfig`]: YAML configuration for all of the above
//!
//! The `mailcraft` binary drives a session from a terminal.

pub mod certificate;
pub mod command;
pub mod config;
pub mod notice;
pub mod session;

pub use certificate::{
    Certificate, CertificateExporter, CertificateRenderer, ExportError, HtmlCertificateRenderer,
};
pub use command::Command;
pub use config::{Args, ConfigError, MailcraftConfig};
pub use notice::Notice;
pub use session::LessonSession;
