//! Discovery of the SCORM API in the host's frame hierarchy.
//!
//! The API is looked up on the current frame, then on up to
//! `max_depth` parents, then along the opener's chain.

use std::sync::Arc;

use crate::api::ScormApi;

/// A frame in the host environment.
pub trait HostFrame: Send + Sync {
    /// The API object exposed by this frame, if any
    fn api(&self) -> Option<Arc<dyn ScormApi>>;

    /// Enclosing frame. `None` at the top.
    fn parent(&self) -> Option<&dyn HostFrame>;

    /// Frame that opened this one, if any
    fn opener(&self) -> Option<&dyn HostFrame>;
}

/// Walk up from `frame` looking for an API.
///
/// Gives up after `max_depth` parents.
pub fn find_api(frame: &dyn HostFrame, max_depth: usize) -> Option<Arc<dyn ScormApi>> {
    let mut current = frame;
    let mut attempts = 0;

    loop {
        if let Some(api) = current.api() {
            return Some(api);
        }
        let parent = current.parent()?;
        attempts += 1;
        if attempts > max_depth {
            return None;
        }
        current = parent;
    }
}

/// Full discovery: the frame's own chain, then the opener's chain.
pub fn locate(frame: &dyn HostFrame, max_depth: usize) -> Option<Arc<dyn ScormApi>> {
    find_api(frame, max_depth)
        .or_else(|| frame.opener().and_then(|opener| find_api(opener, max_depth)))
}

/// Fixed frame tree built up front.
#[derive(Default)]
pub struct StaticFrame {
    api: Option<Arc<dyn ScormApi>>,
    parent: Option<Box<StaticFrame>>,
    opener: Option<Box<StaticFrame>>,
}

impl StaticFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api(mut self, api: Arc<dyn ScormApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_parent(mut self, parent: StaticFrame) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn with_opener(mut self, opener: StaticFrame) -> Self {
        self.opener = Some(Box::new(opener));
        self
    }

    /// `depth` empty frames stacked under `top`.
    pub fn nested_under(top: StaticFrame, depth: usize) -> Self {
        (0..depth).fold(top, |parent, _| StaticFrame::new().with_parent(parent))
    }
}

impl HostFrame for StaticFrame {
    fn api(&self) -> Option<Arc<dyn ScormApi>> {
        self.api.clone()
    }

    fn parent(&self) -> Option<&dyn HostFrame> {
        self.parent.as_deref().map(|p| p as &dyn HostFrame)
    }

    fn opener(&self) -> Option<&dyn HostFrame> {
        self.opener.as_deref().map(|o| o as &dyn HostFrame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordingApi;

    fn lms_frame() -> StaticFrame {
        StaticFrame::new().with_api(Arc::new(RecordingApi::new()))
    }

    #[test]
    fn test_api_on_current_frame() {
        assert!(find_api(&lms_frame(), 7).is_some());
    }

    #[test]
    fn test_api_seven_parents_up() {
        let frame = StaticFrame::nested_under(lms_frame(), 7);
        assert!(find_api(&frame, 7).is_some());
    }

    #[test]
    fn test_api_beyond_depth_not_found() {
        let frame = StaticFrame::nested_under(lms_frame(), 8);
        assert!(find_api(&frame, 7).is_none());
    }

    #[test]
    fn test_opener_chain_searched() {
        let opener = StaticFrame::nested_under(lms_frame(), 2);
        let frame = StaticFrame::nested_under(StaticFrame::new(), 3).with_opener(opener);
        assert!(find_api(&frame, 7).is_none());
        assert!(locate(&frame, 7).is_some());
    }

    #[test]
    fn test_no_api_anywhere() {
        let frame = StaticFrame::nested_under(StaticFrame::new(), 2);
        assert!(locate(&frame, 7).is_none());
    }
}
