//! LMS reporting configuration.

use serde::{Deserialize, Serialize};

/// How far discovery walks up the host's frame chain before giving up.
pub const DEFAULT_MAX_PARENT_DEPTH: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LmsConfig {
    /// Report to the host LMS at all
    pub enabled: bool,
    /// Parents checked above the current frame
    pub max_parent_depth: usize,
}

impl Default for LmsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_parent_depth: DEFAULT_MAX_PARENT_DEPTH,
        }
    }
}
