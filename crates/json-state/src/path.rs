//! Watched paths.
//!
//! A binding watches an ordered list of segments. Literal keys and the
//! wildcard may be capture-wrapped, which switches the binding into capture
//! mode and passes the matched value to the callback. The final segment may
//! instead be a custom change detector.

use json_state_update::DetectorTree;

/// One segment of a watched path.
#[derive(Debug, Clone)]
pub enum PathSegment {
    /// A literal object key or decimal array index.
    Key(String),
    /// Every key at this level; the binding fires once per matched key.
    All,
    /// Capture-wrapped literal key.
    CaptureKey(String),
    /// Capture-wrapped wildcard.
    CaptureAll,
    /// Custom change detector, terminal position only.
    Changed(DetectorTree),
}

/// A watched path.
pub type Path = Vec<PathSegment>;

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    pub fn all() -> Self {
        PathSegment::All
    }

    pub fn capture(key: impl Into<String>) -> Self {
        PathSegment::CaptureKey(key.into())
    }

    pub fn capture_all() -> Self {
        PathSegment::CaptureAll
    }

    pub fn changed(tree: impl Into<DetectorTree>) -> Self {
        PathSegment::Changed(tree.into())
    }

    pub fn is_capture(&self) -> bool {
        matches!(self, PathSegment::CaptureKey(_) | PathSegment::CaptureAll)
    }
}

/// A path is in capture mode when any segment is capture-wrapped.
pub fn is_capture_path(path: &[PathSegment]) -> bool {
    path.iter().any(PathSegment::is_capture)
}
